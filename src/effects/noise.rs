use rand::Rng;

use crate::foundation::core::PixelBuffer;
use crate::foundation::error::{GlitchResult, check_unit};
use crate::foundation::math::blend_u8;

/// Replace a random `noise_frac` share of pixels with white or black, blended by `intensity`.
///
/// Each pixel is picked independently with probability `noise_frac`; a picked pixel becomes
/// `noise * intensity + original * (1 - intensity)` (truncated) with `noise` 0 or 255 at even
/// odds. Alpha is never replaced. Fails with
/// [`GlitchError::Range`](crate::GlitchError::Range) when either argument is outside `[0, 1]`.
pub fn salt_and_pepper<R: Rng + ?Sized>(
    buffer: &mut PixelBuffer,
    intensity: f64,
    noise_frac: f64,
    rng: &mut R,
) -> GlitchResult<()> {
    let intensity = check_unit("noise intensity", intensity)?;
    let noise_frac = check_unit("noise fraction", noise_frac)?;
    let ch = buffer.channels();
    let color = buffer.color_channels();

    for px in buffer.data_mut().chunks_exact_mut(ch) {
        if rng.r#gen::<f64>() >= noise_frac {
            continue;
        }
        let noise = if rng.gen_bool(0.5) { 255 } else { 0 };
        for v in &mut px[..color] {
            *v = blend_u8(noise, *v, intensity);
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/effects/noise.rs"]
mod tests;
