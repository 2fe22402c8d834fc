use std::path::Path;

use rand::Rng;

use crate::effects::block::move_random_blocks;
use crate::effects::channel::move_channels_random;
use crate::effects::noise::salt_and_pepper;
use crate::foundation::core::{PixelBuffer, Size};
use crate::foundation::error::GlitchResult;
use crate::media::ffmpeg::ensure_parent_dir;
use crate::media::image_io::{decode_image, encode_image};
use crate::options::GlitchOptions;

/// Block aspect ratios `(width, height)` drawn per pass.
const BLOCK_ASPECTS: [(u32, u32); 3] = [(1, 1), (1, 4), (4, 1)];
/// Upper bound on swaps in a single pass.
const MAX_BLOCKS_PER_PASS: u32 = 3;
/// Pixels of channel shift at `channels_movement == 1`.
const IMAGE_SHIFT_SCALE_PX: f64 = 20.0;

/// Apply the still-image sequence: block passes, channel shifts, then salt-and-pepper.
///
/// Each block pass picks an aspect from 1:1, 1:4 and 4:1 and swaps up to three per-channel
/// blocks until `block_count` swaps are spent. Blocks are skipped when `block_size` is zero.
pub fn glitch_image<R: Rng + ?Sized>(
    image: &PixelBuffer,
    options: &GlitchOptions,
    rng: &mut R,
) -> GlitchResult<PixelBuffer> {
    let mut out = image.clone();

    if options.block_size > 0.0 {
        let base = (options.block_size * f64::from(image.size().min_side()) * 0.25)
            .round()
            .max(1.0) as u32;
        let mut remaining = options.block_count;
        while remaining > 0 {
            let (aw, ah) = BLOCK_ASPECTS[rng.gen_range(0..BLOCK_ASPECTS.len())];
            let count = rng.gen_range(1..=MAX_BLOCKS_PER_PASS).min(remaining);
            let max_block = Size::new(base.saturating_mul(aw), base.saturating_mul(ah));
            tracing::debug!(?max_block, count, "block pass");
            out = move_random_blocks(&out, max_block, count as usize, true, rng)?;
            remaining -= count;
        }
    }

    let shift = (options.channels_movement * IMAGE_SHIFT_SCALE_PX).round() as u32;
    if shift > 0 {
        move_channels_random(&mut out, shift, rng)?;
    }

    salt_and_pepper(&mut out, options.noise_intensity, options.noise_amount, rng)?;
    Ok(out)
}

/// Glitch one image file and write the result; the output format follows its extension.
///
/// Either the output is fully written or nothing appears at `output`.
#[tracing::instrument(
    skip_all,
    fields(input = %input.display(), output = %output.display())
)]
pub fn process_image(input: &Path, output: &Path, options: &GlitchOptions) -> GlitchResult<()> {
    options.validate()?;
    let image = decode_image(input)?;
    tracing::info!(
        width = image.width(),
        height = image.height(),
        channels = image.channels(),
        "glitching image"
    );

    let mut rng = options.rng();
    let glitched = glitch_image(&image, options, &mut rng)?;

    ensure_parent_dir(output)?;
    encode_image(&glitched, output)?;
    tracing::info!("image written");
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/image.rs"]
mod tests;
