use std::path::Path;

use rand::Rng;

use crate::foundation::error::GlitchResult;
use crate::media::ffmpeg::{FfmpegSink, FfmpegSinkOpts};
use crate::media::probe::{VideoInfo, probe_video};
use crate::media::sink::{FrameSink, SinkConfig};
use crate::media::source::{FfmpegSource, FrameSource};
use crate::options::GlitchOptions;
use crate::schedule::scheduler::{Scheduler, SchedulerConfig};
use crate::schedule::state::EffectState;

/// Counters from one [`glitch_stream`] run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StreamStats {
    /// Frames read, processed and written.
    pub frames: u64,
    /// Effect rolls, the warm-up included.
    pub rolls: u64,
    /// Frames that received salt-and-pepper noise.
    pub noisy_frames: u64,
}

/// Pull every frame from `source`, run it through the scheduler and push it to `sink`.
///
/// Frames are handled strictly in order, one at a time. The sink is begun before the first
/// read and ended after the source finishes cleanly; on error the sink is left unfinished.
pub fn glitch_stream<R: Rng + ?Sized>(
    source: &mut dyn FrameSource,
    sink: &mut dyn FrameSink,
    info: &VideoInfo,
    options: &GlitchOptions,
    rng: &mut R,
) -> GlitchResult<StreamStats> {
    let size = info.size();
    let scheduler = Scheduler::new(SchedulerConfig::from_options(options, size), size, 3)?;
    sink.begin(SinkConfig {
        width: info.width,
        height: info.height,
        fps: info.fps,
    })?;

    let mut state = EffectState::new();
    let mut stats = StreamStats::default();
    while let Some(frame_orig) = source.next_frame()? {
        let mut frame = frame_orig.clone();
        let idx = state.frame_idx;
        if state.needs_roll() {
            stats.rolls += 1;
        }
        state = scheduler.step(state, &frame_orig, &mut frame, rng)?;
        sink.push_frame(idx, &frame)?;

        stats.frames += 1;
        stats.noisy_frames += u64::from(state.noise_applied);
    }

    source.finish()?;
    sink.end()?;
    Ok(stats)
}

/// Glitch a video file: probe, decode with `ffmpeg`, schedule effects per frame and encode.
///
/// A fatal stream error may leave a truncated file at `output`.
#[tracing::instrument(
    skip_all,
    fields(input = %input.display(), output = %output.display())
)]
pub fn process_video(
    input: &Path,
    output: &Path,
    options: &GlitchOptions,
) -> GlitchResult<StreamStats> {
    options.validate()?;
    let info = probe_video(input)?;
    tracing::info!(
        width = info.width,
        height = info.height,
        fps = info.fps.as_f64(),
        "glitching video"
    );

    let mut source = FfmpegSource::spawn(input, info.size())?;
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(output));
    let mut rng = options.rng();
    let stats = glitch_stream(&mut source, &mut sink, &info, options, &mut rng)?;

    tracing::info!(
        frames = stats.frames,
        rolls = stats.rolls,
        noisy_frames = stats.noisy_frames,
        "video written"
    );
    Ok(stats)
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/video.rs"]
mod tests;
