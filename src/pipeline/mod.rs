//! Entry points: the one-shot still-image sequence and the streaming video loop.

pub(crate) mod image;
pub(crate) mod video;
