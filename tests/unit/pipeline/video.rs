use std::io::Cursor;

use rand::SeedableRng;
use rand::rngs::StdRng;

use super::*;
use crate::foundation::core::{Fps, FrameIndex, PixelBuffer, Size};
use crate::foundation::error::GlitchError;
use crate::media::sink::InMemorySink;
use crate::media::source::RawFrameReader;
use crate::schedule::state::WARMUP_FRAMES;

fn info(width: u32, height: u32) -> VideoInfo {
    VideoInfo {
        width,
        height,
        fps: Fps::default(),
    }
}

fn synthetic_stream(width: u32, height: u32, frames: usize) -> Vec<u8> {
    let len = (width * height * 3) as usize;
    (0..frames)
        .flat_map(|f| (0..len).map(move |i| ((i * 7 + f * 31) % 251) as u8))
        .collect()
}

#[test]
fn disabled_options_copy_frames_verbatim() {
    let frames = WARMUP_FRAMES as usize * 4;
    let bytes = synthetic_stream(6, 4, frames);
    let mut source = RawFrameReader::new(Cursor::new(bytes.clone()), Size::new(6, 4)).unwrap();
    let mut sink = InMemorySink::new();
    let mut rng = StdRng::seed_from_u64(1);

    let stats = glitch_stream(
        &mut source,
        &mut sink,
        &info(6, 4),
        &GlitchOptions::disabled(),
        &mut rng,
    )
    .unwrap();

    assert_eq!(stats.frames, frames as u64);
    assert_eq!(stats.noisy_frames, 0);
    assert!(sink.is_ended());
    let out: Vec<u8> = sink
        .frames
        .iter()
        .flat_map(|(_, f)| f.data().iter().copied())
        .collect();
    assert_eq!(out, bytes);
}

#[test]
fn frames_arrive_in_order_with_sink_config() {
    let mut source =
        RawFrameReader::new(Cursor::new(synthetic_stream(8, 8, 12)), Size::new(8, 8)).unwrap();
    let mut sink = InMemorySink::new();
    let mut rng = StdRng::seed_from_u64(2);

    let stats = glitch_stream(
        &mut source,
        &mut sink,
        &info(8, 8),
        &GlitchOptions::default(),
        &mut rng,
    )
    .unwrap();

    assert_eq!(stats.frames, 12);
    assert!(stats.rolls >= 1 && stats.rolls <= 12);
    let cfg = sink.config().unwrap();
    assert_eq!(cfg.size(), Size::new(8, 8));
    let idx: Vec<FrameIndex> = sink.frames.iter().map(|(i, _)| *i).collect();
    assert_eq!(idx, (0..12).map(FrameIndex).collect::<Vec<_>>());
}

#[test]
fn warmup_frames_are_untouched_then_noise_kicks_in() {
    let opts = GlitchOptions {
        noise_intensity: 1.0,
        noise_amount: 1.0,
        seed: Some(4),
        ..GlitchOptions::disabled()
    };
    let frame = PixelBuffer::filled(4, 4, &[90, 120, 150]).unwrap();
    let bytes: Vec<u8> = (0..40).flat_map(|_| frame.data().to_vec()).collect();
    let mut source = RawFrameReader::new(Cursor::new(bytes), Size::new(4, 4)).unwrap();
    let mut sink = InMemorySink::new();

    let mut rng = opts.rng();
    let stats = glitch_stream(&mut source, &mut sink, &info(4, 4), &opts, &mut rng).unwrap();

    for (_, out) in &sink.frames[..5] {
        assert_eq!(out, &frame);
    }
    assert!(stats.noisy_frames > 5, "{stats:?}");
    let noisy = sink.frames[5..].iter().filter(|(_, f)| f != &frame).count() as u64;
    assert_eq!(noisy, stats.noisy_frames);
}

#[test]
fn truncated_stream_fails_without_ending_sink() {
    let mut bytes = synthetic_stream(4, 4, 2);
    bytes.truncate(bytes.len() - 5);
    let mut source = RawFrameReader::new(Cursor::new(bytes), Size::new(4, 4)).unwrap();
    let mut sink = InMemorySink::new();
    let mut rng = StdRng::seed_from_u64(0);

    let err = glitch_stream(
        &mut source,
        &mut sink,
        &info(4, 4),
        &GlitchOptions::default(),
        &mut rng,
    )
    .unwrap_err();
    assert!(matches!(err, GlitchError::Stream(_)));
    assert_eq!(sink.frames.len(), 1);
    assert!(!sink.is_ended());
}

#[test]
fn empty_stream_still_begins_and_ends_sink() {
    let mut source = RawFrameReader::new(Cursor::new(Vec::new()), Size::new(2, 2)).unwrap();
    let mut sink = InMemorySink::new();
    let mut rng = StdRng::seed_from_u64(0);
    let stats = glitch_stream(
        &mut source,
        &mut sink,
        &info(2, 2),
        &GlitchOptions::default(),
        &mut rng,
    )
    .unwrap();
    assert_eq!(stats, StreamStats::default());
    assert!(sink.config().is_some() && sink.is_ended());
}

#[test]
fn oversized_scanline_bands_do_not_abort_the_stream() {
    let frames = WARMUP_FRAMES as usize + 10;
    let mut source =
        RawFrameReader::new(Cursor::new(synthetic_stream(8, 6, frames)), Size::new(8, 6)).unwrap();
    let mut sink = InMemorySink::new();
    let mut rng = StdRng::seed_from_u64(4);
    let opts = GlitchOptions {
        scanlines_intensity: 0.5,
        scanlines_size: u32::MAX,
        ..GlitchOptions::default()
    };
    opts.validate().unwrap();

    let stats = glitch_stream(&mut source, &mut sink, &info(8, 6), &opts, &mut rng).unwrap();
    assert_eq!(stats.frames, frames as u64);
    assert!(sink.is_ended());
}
