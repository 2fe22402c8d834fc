use rand::Rng;

use crate::foundation::core::PixelBuffer;
use crate::foundation::error::{GlitchResult, check_unit};
use crate::foundation::math::scale_u8;

/// Horizontal band overlay parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScanlineParams {
    /// Darkening strength in `[0, 1]`.
    pub intensity: f64,
    /// Band height in rows (0 is treated as 1).
    pub band_size: u32,
    /// Distance between band starts in rows (0 is treated as 1).
    pub band_spacing: u32,
    /// Multiply band samples by random bytes instead of darkening.
    pub noisy: bool,
}

impl Default for ScanlineParams {
    fn default() -> Self {
        Self {
            intensity: 0.5,
            band_size: 5,
            band_spacing: 15,
            noisy: false,
        }
    }
}

/// Overlay analog-style scanlines, then dim the whole buffer once.
///
/// Band `i` starts at `band_spacing * i` plus a jitter of 0 or 1 row; processing stops at the
/// first band reaching the last row. Darkened bands scale by
/// `1 - (start % 10) / 40 * intensity`; noisy bands multiply each sample by a random byte,
/// wrapping at 256. Afterwards every sample scales by `1 - U/5`, `U` uniform in `[0, 1)`.
/// Alpha is left untouched.
pub fn scanlines<R: Rng + ?Sized>(
    buffer: &mut PixelBuffer,
    params: &ScanlineParams,
    rng: &mut R,
) -> GlitchResult<()> {
    let intensity = check_unit("scanlines intensity", params.intensity)?;
    let band_size = params.band_size.max(1);
    let spacing = params.band_spacing.max(1);
    let height = buffer.height();
    let ch = buffer.channels();
    let color = buffer.color_channels();
    let stride = buffer.stride();

    for i in 0..height / spacing {
        let start = spacing * i + rng.gen_range(0..=1);
        let end = start.saturating_add(band_size);
        if end >= height {
            break;
        }

        let factor = 1.0 - f64::from(start % 10) / 40.0 * intensity;
        let rows = &mut buffer.data_mut()[start as usize * stride..end as usize * stride];
        for px in rows.chunks_exact_mut(ch) {
            for v in &mut px[..color] {
                *v = if params.noisy {
                    v.wrapping_mul(rng.r#gen::<u8>())
                } else {
                    scale_u8(*v, factor)
                };
            }
        }
    }

    let dip = 1.0 - rng.r#gen::<f64>() / 5.0;
    for px in buffer.data_mut().chunks_exact_mut(ch) {
        for v in &mut px[..color] {
            *v = scale_u8(*v, dip);
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/effects/scanlines.rs"]
mod tests;
