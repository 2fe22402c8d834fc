use rand::Rng;
use rand::distributions::{Distribution, WeightedIndex};

use crate::foundation::error::{GlitchError, GlitchResult};

/// Effect category chosen at each roll.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EffectKind {
    /// Frame passes through untouched.
    Nothing,
    /// Fresh random per-channel offsets every frame.
    Vibrate,
    /// Channels drift with a fixed velocity for the whole run.
    ChannelProgressive,
    /// Same per-frame redraw as `Vibrate`, under its own weight.
    ChannelConstant,
    /// Block swaps drawn once per run.
    BlockStatic,
    /// Block swaps redrawn every frame.
    BlockRandom,
    /// Vibrate plus random blocks.
    Combined,
}

impl EffectKind {
    /// Every category, in table order.
    pub const ALL: [EffectKind; 7] = [
        EffectKind::Nothing,
        EffectKind::Vibrate,
        EffectKind::ChannelProgressive,
        EffectKind::ChannelConstant,
        EffectKind::BlockStatic,
        EffectKind::BlockRandom,
        EffectKind::Combined,
    ];

    /// Relative weight in the roll.
    pub fn weight(self) -> u32 {
        match self {
            Self::Nothing => 6,
            Self::Combined => 2,
            _ => 1,
        }
    }

    /// Whether the category shifts channels.
    pub fn uses_channels(self) -> bool {
        matches!(
            self,
            Self::Vibrate | Self::ChannelProgressive | Self::ChannelConstant | Self::Combined
        )
    }

    /// Whether the category swaps blocks.
    pub fn uses_blocks(self) -> bool {
        matches!(self, Self::BlockStatic | Self::BlockRandom | Self::Combined)
    }
}

/// Weighted choice over the categories whose knobs are enabled.
#[derive(Clone, Debug)]
pub struct EffectTable {
    kinds: Vec<EffectKind>,
    dist: WeightedIndex<u32>,
}

impl EffectTable {
    /// Build the table. Channel kinds need `channels`, block kinds need `blocks`; `Combined`
    /// needs both. `Nothing` is always present.
    pub fn new(channels: bool, blocks: bool) -> GlitchResult<Self> {
        let kinds: Vec<EffectKind> = EffectKind::ALL
            .into_iter()
            .filter(|k| (!k.uses_channels() || channels) && (!k.uses_blocks() || blocks))
            .collect();
        let dist = WeightedIndex::new(kinds.iter().map(|k| k.weight()))
            .map_err(|e| GlitchError::validation(format!("effect table: {e}")))?;
        Ok(Self { kinds, dist })
    }

    /// Categories in the support of the draw.
    pub fn kinds(&self) -> &[EffectKind] {
        &self.kinds
    }

    /// Whether `kind` can be drawn.
    pub fn contains(&self, kind: EffectKind) -> bool {
        self.kinds.contains(&kind)
    }

    /// Draw one category.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> EffectKind {
        self.kinds[self.dist.sample(rng)]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/table.rs"]
mod tests;
