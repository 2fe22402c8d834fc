//! glitchfx applies deliberate visual corruption to still images and video streams.
//!
//! The engine has three layers:
//!
//! - Stateless primitives over a [`PixelBuffer`]: [`move_channel`], [`swap_block`],
//!   [`move_random_blocks`], [`scanlines`] and [`salt_and_pepper`]
//! - A per-frame [`Scheduler`] that rolls a weighted [`EffectKind`] and holds it for a run of
//!   frames, carrying everything in an explicit [`EffectState`]
//! - Pipelines: [`process_image`] for one-shot stills, and [`process_video`] which streams raw
//!   frames from an `ffmpeg` decoder through the scheduler into an `ffmpeg` encoder
//!
//! Every random draw goes through a caller-supplied [`rand::Rng`], so a seeded run is fully
//! reproducible.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub(crate) mod effects;
pub(crate) mod media;
pub(crate) mod options;
pub(crate) mod pipeline;
pub(crate) mod schedule;

pub use crate::foundation::core::{BlockSpec, ChannelSel, Fps, FrameIndex, PixelBuffer, Size};
pub use crate::foundation::error::{GlitchError, GlitchResult};

pub use crate::effects::block::{
    BlockSwap, flip_block, move_random_blocks, random_block_swaps, swap_block,
    swap_block_in_place,
};
pub use crate::effects::channel::{
    ChannelOffset, move_channel, move_channels, move_channels_random, random_channel_offsets,
};
pub use crate::effects::noise::salt_and_pepper;
pub use crate::effects::scanlines::{ScanlineParams, scanlines};
pub use crate::media::ffmpeg::{FfmpegSink, FfmpegSinkOpts, ensure_parent_dir, is_ffmpeg_on_path};
pub use crate::media::image_io::{decode_image, encode_image};
pub use crate::media::probe::{VideoInfo, probe_video};
pub use crate::media::sink::{FrameSink, InMemorySink, SinkConfig};
pub use crate::media::source::{FfmpegSource, FrameSource, RawFrameReader};
pub use crate::options::GlitchOptions;
pub use crate::pipeline::image::{glitch_image, process_image};
pub use crate::pipeline::video::{StreamStats, glitch_stream, process_video};
pub use crate::schedule::scheduler::{
    BlockRange, CHANNEL_SHIFT_SCALE_PX, PROGRESSIVE_SPEED_PX, Scheduler, SchedulerConfig,
};
pub use crate::schedule::state::{ActiveEffect, EffectState, WARMUP_FRAMES};
pub use crate::schedule::table::{EffectKind, EffectTable};
