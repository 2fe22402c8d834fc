use std::io::{ErrorKind, Read};
use std::path::Path;
use std::process::{Child, ChildStdout, Command, Stdio};

use crate::foundation::core::{PixelBuffer, Size};
use crate::foundation::error::{GlitchError, GlitchResult};
use crate::media::ffmpeg::{StderrDrain, is_ffmpeg_on_path, wait_for_exit};

/// Producer of decoded frames in stream order.
pub trait FrameSource {
    /// Next frame, or `None` at a clean end of stream.
    fn next_frame(&mut self) -> GlitchResult<Option<PixelBuffer>>;
    /// Release the producer once the stream is drained; reports decoder failures.
    fn finish(&mut self) -> GlitchResult<()> {
        Ok(())
    }
}

/// Splits a byte stream of interleaved RGB24 samples into fixed-size frames.
///
/// Zero bytes before a frame is the end of the stream. A frame cut short is a
/// [`GlitchError::Stream`] error.
#[derive(Debug)]
pub struct RawFrameReader<R> {
    reader: R,
    size: Size,
    frame_len: usize,
}

impl<R: Read> RawFrameReader<R> {
    /// Read `size` RGB24 frames from `reader`.
    pub fn new(reader: R, size: Size) -> GlitchResult<Self> {
        let frame_len = (size.width as usize)
            .checked_mul(size.height as usize)
            .and_then(|n| n.checked_mul(3))
            .filter(|n| *n > 0)
            .ok_or_else(|| {
                GlitchError::validation(format!(
                    "invalid raw frame size {}x{}",
                    size.width, size.height
                ))
            })?;
        Ok(Self {
            reader,
            size,
            frame_len,
        })
    }

    /// Bytes per frame.
    pub fn frame_len(&self) -> usize {
        self.frame_len
    }

    /// Read one full frame.
    pub fn read_frame(&mut self) -> GlitchResult<Option<PixelBuffer>> {
        let mut buf = vec![0u8; self.frame_len];
        let mut filled = 0;
        while filled < buf.len() {
            match self.reader.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    return Err(GlitchError::stream(format!("failed to read raw frame: {e}")));
                }
            }
        }
        if filled == 0 {
            return Ok(None);
        }
        if filled < buf.len() {
            return Err(GlitchError::stream(format!(
                "short frame read: got {filled} of {} bytes",
                self.frame_len
            )));
        }
        PixelBuffer::from_raw(self.size.width, self.size.height, 3, buf).map(Some)
    }

    /// Give back the wrapped reader.
    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: Read> FrameSource for RawFrameReader<R> {
    fn next_frame(&mut self) -> GlitchResult<Option<PixelBuffer>> {
        self.read_frame()
    }
}

/// Source that spawns the system `ffmpeg` and decodes a container to raw RGB24 on stdout.
pub struct FfmpegSource {
    child: Option<Child>,
    frames: RawFrameReader<ChildStdout>,
    stderr_drain: Option<StderrDrain>,
}

impl FfmpegSource {
    /// Start decoding `path`, whose frames are `size` (see
    /// [`probe_video`](crate::probe_video)).
    pub fn spawn(path: &Path, size: Size) -> GlitchResult<Self> {
        if !is_ffmpeg_on_path() {
            return Err(GlitchError::stream(
                "ffmpeg is required for video decoding, but was not found on PATH",
            ));
        }

        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd.args(["-loglevel", "error", "-noautorotate", "-i"])
            .arg(path)
            .args(["-an", "-f", "rawvideo", "-pix_fmt", "rgb24", "pipe:1"]);

        let mut child = cmd.spawn().map_err(|e| {
            GlitchError::stream(format!(
                "failed to spawn ffmpeg decoder (is it installed and on PATH?): {e}"
            ))
        })?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| GlitchError::stream("failed to open ffmpeg stdout (unexpected)"))?;
        let stderr_drain = StderrDrain::spawn(&mut child)?;
        tracing::debug!(input = %path.display(), "ffmpeg decoder started");

        Ok(Self {
            child: Some(child),
            frames: RawFrameReader::new(stdout, size)?,
            stderr_drain: Some(stderr_drain),
        })
    }
}

impl FrameSource for FfmpegSource {
    fn next_frame(&mut self) -> GlitchResult<Option<PixelBuffer>> {
        self.frames.read_frame()
    }

    fn finish(&mut self) -> GlitchResult<()> {
        let mut child = self
            .child
            .take()
            .ok_or_else(|| GlitchError::stream("ffmpeg decoder already finished"))?;
        wait_for_exit(&mut child, self.stderr_drain.take(), "ffmpeg decoder")
    }
}

#[cfg(test)]
#[path = "../../tests/unit/media/source.rs"]
mod tests;
