use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::effects::scanlines::ScanlineParams;
use crate::foundation::error::{GlitchError, GlitchResult, check_unit};

/// Knobs consumed by [`process_image`](crate::process_image) and
/// [`process_video`](crate::process_video).
///
/// Fractions live in `[0, 1]`. The `*_effect_length` and `scanlines_*` fields only affect
/// video. Missing JSON fields fall back to [`GlitchOptions::default`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlitchOptions {
    /// Blend strength of salt-and-pepper noise.
    pub noise_intensity: f64,
    /// Fraction of pixels hit by salt-and-pepper noise.
    pub noise_amount: f64,
    /// Scale of per-channel displacement.
    pub channels_movement: f64,
    /// Scale of displaced blocks relative to the frame.
    pub block_size: f64,
    /// Number of block swaps per application.
    pub block_count: u32,
    /// Shortest effect run, in frames (video).
    pub min_effect_length: u32,
    /// Exclusive upper bound of an effect run, in frames (video).
    pub max_effect_length: u32,
    /// Scanline darkening strength; 0 disables scanlines (video).
    pub scanlines_intensity: f64,
    /// Scanline band height in rows (video).
    pub scanlines_size: u32,
    /// Rows between scanline band starts (video).
    pub scanlines_spacing: u32,
    /// Use random-byte bands instead of darkened ones (video).
    pub scanlines_noisy: bool,
    /// Seed for a reproducible effect sequence; entropy when absent.
    pub seed: Option<u64>,
}

impl Default for GlitchOptions {
    fn default() -> Self {
        Self {
            noise_intensity: 0.5,
            noise_amount: 0.02,
            channels_movement: 0.5,
            block_size: 0.5,
            block_count: 3,
            min_effect_length: 1,
            max_effect_length: 15,
            scanlines_intensity: 0.0,
            scanlines_size: 5,
            scanlines_spacing: 15,
            scanlines_noisy: false,
            seed: None,
        }
    }
}

impl GlitchOptions {
    /// Options with every effect knob at zero; the pipelines pass frames through unchanged.
    pub fn disabled() -> Self {
        Self {
            noise_intensity: 0.0,
            noise_amount: 0.0,
            channels_movement: 0.0,
            block_size: 0.0,
            block_count: 0,
            scanlines_intensity: 0.0,
            ..Self::default()
        }
    }

    /// Parse options from JSON text.
    pub fn from_json_str(s: &str) -> GlitchResult<Self> {
        serde_json::from_str(s)
            .map_err(|e| GlitchError::validation(format!("parse options JSON: {e}")))
    }

    /// Parse options from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> GlitchResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            GlitchError::validation(format!("open options JSON '{}': {e}", path.display()))
        })?;
        serde_json::from_reader(BufReader::new(f)).map_err(|e| {
            GlitchError::validation(format!("parse options JSON '{}': {e}", path.display()))
        })
    }

    /// Check ranges before any work starts.
    pub fn validate(&self) -> GlitchResult<()> {
        check_unit("noise_intensity", self.noise_intensity)?;
        check_unit("noise_amount", self.noise_amount)?;
        check_unit("channels_movement", self.channels_movement)?;
        check_unit("block_size", self.block_size)?;
        check_unit("scanlines_intensity", self.scanlines_intensity)?;
        if self.min_effect_length == 0 {
            return Err(GlitchError::validation("min_effect_length must be >= 1"));
        }
        if self.min_effect_length > self.max_effect_length {
            return Err(GlitchError::validation(format!(
                "min_effect_length ({}) must be <= max_effect_length ({})",
                self.min_effect_length, self.max_effect_length
            )));
        }
        Ok(())
    }

    /// Random source for one run: seeded when `seed` is set.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Scanline overlay settings, or `None` when scanlines are off.
    pub fn scanline_params(&self) -> Option<ScanlineParams> {
        (self.scanlines_intensity > 0.0).then_some(ScanlineParams {
            intensity: self.scanlines_intensity,
            band_size: self.scanlines_size,
            band_spacing: self.scanlines_spacing,
            noisy: self.scanlines_noisy,
        })
    }
}

#[cfg(test)]
#[path = "../tests/unit/options.rs"]
mod tests;
