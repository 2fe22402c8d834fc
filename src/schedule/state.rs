use crate::effects::block::BlockSwap;
use crate::foundation::core::{FrameIndex, Size};
use crate::schedule::table::EffectKind;

/// Frames at the start of a run that never receive effects.
pub const WARMUP_FRAMES: u64 = 5;

/// The active category together with the parameters drawn for it at the roll.
#[derive(Clone, Debug, PartialEq)]
pub enum ActiveEffect {
    /// No effect.
    Nothing,
    /// Offsets redrawn every frame.
    Vibrate,
    /// Per-channel velocity in px/frame; displacement grows with the run's age.
    ChannelProgressive {
        /// `(vx, vy)` per channel.
        velocities: Vec<(f64, f64)>,
    },
    /// Same per-frame redraw as [`ActiveEffect::Vibrate`], rolled under its own weight.
    ChannelConstant,
    /// Swaps drawn once and replayed every frame.
    BlockStatic {
        /// Swaps applied from the pre-effect frame into the output frame.
        swaps: Vec<BlockSwap>,
    },
    /// Swaps redrawn every frame with a block size bound fixed for the run.
    BlockRandom {
        /// Largest block drawn this run.
        max_block: Size,
    },
    /// Vibrate plus per-frame random blocks.
    Combined {
        /// Largest block drawn this run.
        max_block: Size,
    },
}

impl ActiveEffect {
    /// Category tag of this effect.
    pub fn kind(&self) -> EffectKind {
        match self {
            Self::Nothing => EffectKind::Nothing,
            Self::Vibrate => EffectKind::Vibrate,
            Self::ChannelProgressive { .. } => EffectKind::ChannelProgressive,
            Self::ChannelConstant => EffectKind::ChannelConstant,
            Self::BlockStatic { .. } => EffectKind::BlockStatic,
            Self::BlockRandom { .. } => EffectKind::BlockRandom,
            Self::Combined { .. } => EffectKind::Combined,
        }
    }
}

/// Scheduling state carried from one frame to the next within a single video run.
///
/// A fresh state has `remaining == 0`, so the first [`Scheduler::step`](crate::Scheduler::step)
/// rolls before touching frame 0.
#[derive(Clone, Debug, PartialEq)]
pub struct EffectState {
    /// Current effect and its parameters.
    pub effect: ActiveEffect,
    /// Frames left in the current run.
    pub remaining: u32,
    /// Frames processed since the run began (1 on the run's first frame).
    pub age: u32,
    /// Index of the next frame to process.
    pub frame_idx: FrameIndex,
    /// Whether salt-and-pepper noise hit the last processed frame.
    pub noise_applied: bool,
}

impl Default for EffectState {
    fn default() -> Self {
        Self::new()
    }
}

impl EffectState {
    /// State before the first frame.
    pub fn new() -> Self {
        Self {
            effect: ActiveEffect::Nothing,
            remaining: 0,
            age: 0,
            frame_idx: FrameIndex(0),
            noise_applied: false,
        }
    }

    /// The run is over and a new effect must be rolled.
    pub fn needs_roll(&self) -> bool {
        self.remaining == 0
    }

    /// `frame_idx` still falls within the quiet warm-up.
    pub fn in_warmup(&self) -> bool {
        self.frame_idx.0 < WARMUP_FRAMES
    }
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/state.rs"]
mod tests;
