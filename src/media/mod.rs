//! Decode/encode collaborators: `ffprobe`/`ffmpeg` child processes for video and the `image`
//! crate for stills.

pub(crate) mod ffmpeg;
pub(crate) mod image_io;
pub(crate) mod probe;
pub(crate) mod sink;
pub(crate) mod source;
