use crate::foundation::core::{Fps, FrameIndex, PixelBuffer, Size};
use crate::foundation::error::{GlitchError, GlitchResult};

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkConfig {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Output frame rate.
    pub fps: Fps,
}

impl SinkConfig {
    /// Frame dimensions.
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// Consumer of processed frames.
///
/// Ordering contract: `push_frame` is called in strictly increasing [`FrameIndex`] order
/// between one `begin` and one `end`.
pub trait FrameSink {
    /// Prepare for a stream of `cfg`-shaped frames.
    fn begin(&mut self, cfg: SinkConfig) -> GlitchResult<()>;
    /// Accept the next frame.
    fn push_frame(&mut self, idx: FrameIndex, frame: &PixelBuffer) -> GlitchResult<()>;
    /// Flush and close the output.
    fn end(&mut self) -> GlitchResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    ended: bool,
    /// Frames in stream order.
    pub frames: Vec<(FrameIndex, PixelBuffer)>,
}

impl InMemorySink {
    /// Empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration passed to the last `begin`.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// `end` was called after the last `begin`.
    pub fn is_ended(&self) -> bool {
        self.ended
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> GlitchResult<()> {
        self.cfg = Some(cfg);
        self.ended = false;
        self.frames.clear();
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &PixelBuffer) -> GlitchResult<()> {
        if self.cfg.is_none() {
            return Err(GlitchError::stream("in-memory sink not started"));
        }
        if let Some((last, _)) = self.frames.last()
            && idx <= *last
        {
            return Err(GlitchError::stream(format!(
                "in-memory sink received out-of-order frame index {} after {}",
                idx.0, last.0
            )));
        }
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> GlitchResult<()> {
        self.ended = true;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/media/sink.rs"]
mod tests;
