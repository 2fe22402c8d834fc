use rand::Rng;

use crate::foundation::core::PixelBuffer;
use crate::foundation::error::GlitchResult;
use crate::foundation::math::shifted_rects;

/// Per-channel displacement in pixels (`dx` right, `dy` down).
pub type ChannelOffset = (i32, i32);

/// Slide one channel's plane by `(dx, dy)` pixels, clipping at the buffer edges.
///
/// Only the destination sub-rectangle (the shifted footprint intersected with the bounds) is
/// overwritten; the uncovered strip keeps its previous samples. Source samples are captured
/// before any write, so overlapping source/destination rectangles are well defined.
///
/// Fails with [`GlitchError::InvalidChannel`](crate::GlitchError::InvalidChannel) when
/// `channel >= buffer.channels()`.
pub fn move_channel(
    buffer: &mut PixelBuffer,
    channel: usize,
    dx: i32,
    dy: i32,
) -> GlitchResult<()> {
    buffer.check_channel(channel)?;
    if dx == 0 && dy == 0 {
        return Ok(());
    }
    let Some(rects) = shifted_rects(buffer.size(), i64::from(dx), i64::from(dy)) else {
        return Ok(());
    };

    let ch = buffer.channels();
    let stride = buffer.stride();
    let (xs, ys) = (rects.x, rects.y);
    let data = buffer.data_mut();

    let mut plane = Vec::with_capacity(xs.len as usize * ys.len as usize);
    for row in 0..ys.len as usize {
        let base = (ys.src as usize + row) * stride + xs.src as usize * ch + channel;
        plane.extend((0..xs.len as usize).map(|col| data[base + col * ch]));
    }

    let mut samples = plane.into_iter();
    for row in 0..ys.len as usize {
        let base = (ys.dst as usize + row) * stride + xs.dst as usize * ch + channel;
        for col in 0..xs.len as usize {
            if let Some(v) = samples.next() {
                data[base + col * ch] = v;
            }
        }
    }
    Ok(())
}

/// Draw an independent `(dx, dy)` in `[-max_delta, max_delta]` for each of `channels`.
pub fn random_channel_offsets<R: Rng + ?Sized>(
    channels: usize,
    max_delta: u32,
    rng: &mut R,
) -> Vec<ChannelOffset> {
    let m = max_delta.min(i32::MAX as u32) as i32;
    (0..channels)
        .map(|_| (rng.gen_range(-m..=m), rng.gen_range(-m..=m)))
        .collect()
}

/// Apply one offset per channel with [`move_channel`]. Extra offsets are ignored.
pub fn move_channels(buffer: &mut PixelBuffer, offsets: &[ChannelOffset]) -> GlitchResult<()> {
    for (channel, &(dx, dy)) in offsets.iter().enumerate().take(buffer.channels()) {
        move_channel(buffer, channel, dx, dy)?;
    }
    Ok(())
}

/// Shift every channel by its own random offset bounded by `max_delta`.
pub fn move_channels_random<R: Rng + ?Sized>(
    buffer: &mut PixelBuffer,
    max_delta: u32,
    rng: &mut R,
) -> GlitchResult<()> {
    let offsets = random_channel_offsets(buffer.channels(), max_delta, rng);
    move_channels(buffer, &offsets)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/channel.rs"]
mod tests;
