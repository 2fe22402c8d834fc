use rand::Rng;

use crate::effects::block::{BlockSwap, random_block_swaps};
use crate::effects::channel::{ChannelOffset, move_channels, move_channels_random};
use crate::effects::noise::salt_and_pepper;
use crate::effects::scanlines::{ScanlineParams, scanlines};
use crate::foundation::core::{FrameIndex, PixelBuffer, Size};
use crate::foundation::error::{GlitchError, GlitchResult, check_unit};
use crate::options::GlitchOptions;
use crate::schedule::state::{ActiveEffect, EffectState, WARMUP_FRAMES};
use crate::schedule::table::{EffectKind, EffectTable};

/// Pixels of channel shift at `channels_movement == 1`.
pub const CHANNEL_SHIFT_SCALE_PX: f64 = 30.0;
/// Progressive drift speed in px/frame at `channels_movement == 1`.
pub const PROGRESSIVE_SPEED_PX: f64 = 4.0;

/// Bounds for the largest block side drawn at each roll: `[min, max)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockRange {
    /// Inclusive lower bound, at least 1.
    pub min: u32,
    /// Exclusive upper bound, always above `min`.
    pub max: u32,
}

impl BlockRange {
    /// Scale the range from the frame and `block_size`. `None` means blocks are off.
    ///
    /// A degenerate range is widened to the smallest viable one rather than rejected.
    pub fn resolve(frame: Size, block_size: f64) -> Option<Self> {
        let max = (f64::from(frame.max_side()) * 0.5 * block_size).floor() as u32;
        if max == 0 {
            return None;
        }
        let min = (f64::from(frame.min_side()) * 0.1 * block_size).floor() as u32;
        let range = Self {
            min: min.max(1),
            max: max.max(min.max(1) + 1),
        };
        if range.min != min || range.max != max {
            tracing::warn!(
                min,
                max,
                clamped_min = range.min,
                clamped_max = range.max,
                "block size range clamped"
            );
        }
        Some(range)
    }
}

/// Resolved knobs the scheduler draws from.
#[derive(Clone, Debug, PartialEq)]
pub struct SchedulerConfig {
    /// Shortest run in frames (at least 1).
    pub min_effect_length: u32,
    /// Exclusive upper bound of a run; `<= min_effect_length` pins runs to the minimum.
    pub max_effect_length: u32,
    /// Bound on per-channel shift in pixels; 0 disables channel effects.
    pub max_channel_shift: u32,
    /// Bound on per-channel drift speed in px/frame.
    pub max_channel_velocity: f64,
    /// Block size bounds; `None` disables block effects.
    pub block_range: Option<BlockRange>,
    /// Swaps per block application; 0 disables block effects.
    pub block_count: usize,
    /// Salt-and-pepper blend strength.
    pub noise_intensity: f64,
    /// Salt-and-pepper pixel fraction.
    pub noise_amount: f64,
    /// Per-frame scanline overlay, when enabled.
    pub scanlines: Option<ScanlineParams>,
}

impl SchedulerConfig {
    /// Derive the scheduler knobs for frames of `frame` size.
    pub fn from_options(opts: &GlitchOptions, frame: Size) -> Self {
        let block_range = if opts.block_count == 0 {
            None
        } else {
            BlockRange::resolve(frame, opts.block_size)
        };
        Self {
            min_effect_length: opts.min_effect_length.max(1),
            max_effect_length: opts.max_effect_length,
            max_channel_shift: (opts.channels_movement * CHANNEL_SHIFT_SCALE_PX).round() as u32,
            max_channel_velocity: opts.channels_movement * PROGRESSIVE_SPEED_PX,
            block_range,
            block_count: opts.block_count as usize,
            noise_intensity: opts.noise_intensity,
            noise_amount: opts.noise_amount,
            scanlines: opts.scanline_params(),
        }
    }

    fn channels_enabled(&self) -> bool {
        self.max_channel_shift > 0
    }

    fn blocks_enabled(&self) -> bool {
        self.block_count > 0 && self.block_range.is_some()
    }
}

/// Per-frame effect state machine for one video run.
///
/// The scheduler itself is immutable; all run state lives in [`EffectState`], which
/// [`Scheduler::step`] consumes and returns once per frame, in frame order.
#[derive(Clone, Debug)]
pub struct Scheduler {
    cfg: SchedulerConfig,
    table: EffectTable,
    frame: Size,
    channels: usize,
}

impl Scheduler {
    /// Build a scheduler for frames of `frame` size with `channels` samples per pixel.
    pub fn new(cfg: SchedulerConfig, frame: Size, channels: usize) -> GlitchResult<Self> {
        if channels == 0 || frame.width == 0 || frame.height == 0 {
            return Err(GlitchError::validation(format!(
                "scheduler frame must be non-empty, got {}x{}x{channels}",
                frame.width, frame.height
            )));
        }
        if !(cfg.max_channel_velocity.is_finite() && cfg.max_channel_velocity >= 0.0) {
            return Err(GlitchError::validation(format!(
                "max_channel_velocity must be finite and >= 0, got {}",
                cfg.max_channel_velocity
            )));
        }
        check_unit("noise_intensity", cfg.noise_intensity)?;
        check_unit("noise_amount", cfg.noise_amount)?;
        if let Some(params) = &cfg.scanlines {
            check_unit("scanlines_intensity", params.intensity)?;
        }

        let table = EffectTable::new(cfg.channels_enabled(), cfg.blocks_enabled())?;
        tracing::debug!(kinds = ?table.kinds(), ?cfg, "scheduler ready");
        Ok(Self {
            cfg,
            table,
            frame,
            channels,
        })
    }

    /// Scheduler knobs.
    pub fn config(&self) -> &SchedulerConfig {
        &self.cfg
    }

    /// Categories this scheduler can roll.
    pub fn table(&self) -> &EffectTable {
        &self.table
    }

    /// Draw a run-length in `[min_effect_length, max_effect_length)`.
    pub fn draw_run_length<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        let min = self.cfg.min_effect_length.max(1);
        if self.cfg.max_effect_length <= min {
            min
        } else {
            rng.gen_range(min..self.cfg.max_effect_length)
        }
    }

    /// Choose the effect and run-length starting at `frame_idx`.
    ///
    /// Inside the warm-up the effect is always [`ActiveEffect::Nothing`] and the run ends no
    /// later than the warm-up does.
    pub fn roll<R: Rng + ?Sized>(
        &self,
        frame_idx: FrameIndex,
        rng: &mut R,
    ) -> (ActiveEffect, u32) {
        let length = self.draw_run_length(rng);
        if frame_idx.0 < WARMUP_FRAMES {
            let left = (WARMUP_FRAMES - frame_idx.0) as u32;
            return (ActiveEffect::Nothing, length.min(left));
        }

        let effect = match self.table.sample(rng) {
            EffectKind::Nothing => ActiveEffect::Nothing,
            EffectKind::Vibrate => ActiveEffect::Vibrate,
            EffectKind::ChannelProgressive => {
                let v = self.cfg.max_channel_velocity;
                let velocities = (0..self.channels)
                    .map(|_| (rng.gen_range(-v..=v), rng.gen_range(-v..=v)))
                    .collect();
                ActiveEffect::ChannelProgressive { velocities }
            }
            EffectKind::ChannelConstant => ActiveEffect::ChannelConstant,
            EffectKind::BlockStatic => {
                let max_block = self.draw_max_block(rng);
                ActiveEffect::BlockStatic {
                    swaps: self.draw_swaps(max_block, rng),
                }
            }
            EffectKind::BlockRandom => ActiveEffect::BlockRandom {
                max_block: self.draw_max_block(rng),
            },
            EffectKind::Combined => ActiveEffect::Combined {
                max_block: self.draw_max_block(rng),
            },
        };
        (effect, length)
    }

    /// Process one frame.
    ///
    /// `frame_orig` is the decoded frame and `frame` its working copy, which receives the
    /// output. Rolls first when the previous run has expired, then applies the active effect
    /// and the per-frame overlays (skipped during warm-up, though the noise coin is still
    /// drawn).
    pub fn step<R: Rng + ?Sized>(
        &self,
        state: EffectState,
        frame_orig: &PixelBuffer,
        frame: &mut PixelBuffer,
        rng: &mut R,
    ) -> GlitchResult<EffectState> {
        if !frame.same_shape(frame_orig)
            || frame.size() != self.frame
            || frame.channels() != self.channels
        {
            return Err(GlitchError::validation(format!(
                "frame {}x{}x{} doesn't match scheduler {}x{}x{}",
                frame.width(),
                frame.height(),
                frame.channels(),
                self.frame.width,
                self.frame.height,
                self.channels
            )));
        }

        let mut state = state;
        if state.needs_roll() {
            let (effect, remaining) = self.roll(state.frame_idx, rng);
            tracing::debug!(
                frame = state.frame_idx.0,
                kind = ?effect.kind(),
                remaining,
                "roll"
            );
            state.effect = effect;
            state.remaining = remaining;
            state.age = 0;
        }

        state.age += 1;
        self.apply(&state.effect, state.age, frame_orig, frame, rng)?;
        state.noise_applied = self.overlay(frame, state.in_warmup(), rng)?;

        state.remaining = state.remaining.saturating_sub(1);
        state.frame_idx = state.frame_idx.next();
        Ok(state)
    }

    fn apply<R: Rng + ?Sized>(
        &self,
        effect: &ActiveEffect,
        age: u32,
        frame_orig: &PixelBuffer,
        frame: &mut PixelBuffer,
        rng: &mut R,
    ) -> GlitchResult<()> {
        match effect {
            ActiveEffect::Nothing => Ok(()),
            ActiveEffect::Vibrate | ActiveEffect::ChannelConstant => {
                move_channels_random(frame, self.cfg.max_channel_shift, rng)
            }
            ActiveEffect::ChannelProgressive { velocities } => {
                let age = f64::from(age);
                let offsets: Vec<ChannelOffset> = velocities
                    .iter()
                    .map(|&(vx, vy)| ((vx * age).round() as i32, (vy * age).round() as i32))
                    .collect();
                move_channels(frame, &offsets)
            }
            ActiveEffect::BlockStatic { swaps } => apply_swaps(swaps, frame_orig, frame),
            ActiveEffect::BlockRandom { max_block } => {
                let swaps = self.draw_swaps(*max_block, rng);
                apply_swaps(&swaps, frame_orig, frame)
            }
            ActiveEffect::Combined { max_block } => {
                let swaps = self.draw_swaps(*max_block, rng);
                apply_swaps(&swaps, frame_orig, frame)?;
                move_channels_random(frame, self.cfg.max_channel_shift, rng)
            }
        }
    }

    /// Salt-and-pepper on a fair coin, then scanlines. Returns whether noise was applied.
    ///
    /// The coin is drawn on every frame; warm-up frames discard it and get no overlay.
    fn overlay<R: Rng + ?Sized>(
        &self,
        frame: &mut PixelBuffer,
        warmup: bool,
        rng: &mut R,
    ) -> GlitchResult<bool> {
        let coin = rng.gen_bool(0.5);
        if warmup {
            return Ok(false);
        }
        let noisy = coin && self.cfg.noise_intensity > 0.0 && self.cfg.noise_amount > 0.0;
        if noisy {
            salt_and_pepper(frame, self.cfg.noise_intensity, self.cfg.noise_amount, rng)?;
        }
        if let Some(params) = &self.cfg.scanlines {
            scanlines(frame, params, rng)?;
        }
        Ok(noisy)
    }

    fn draw_max_block<R: Rng + ?Sized>(&self, rng: &mut R) -> Size {
        match self.cfg.block_range {
            Some(BlockRange { min, max }) => {
                Size::new(rng.gen_range(min..max), rng.gen_range(min..max))
            }
            None => Size::new(1, 1),
        }
    }

    fn draw_swaps<R: Rng + ?Sized>(&self, max_block: Size, rng: &mut R) -> Vec<BlockSwap> {
        random_block_swaps(
            self.frame,
            self.channels,
            max_block,
            self.cfg.block_count,
            true,
            rng,
        )
    }
}

fn apply_swaps(
    swaps: &[BlockSwap],
    frame_orig: &PixelBuffer,
    frame: &mut PixelBuffer,
) -> GlitchResult<()> {
    for swap in swaps {
        swap.apply(frame_orig, frame)?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/scheduler.rs"]
mod tests;
