use crate::foundation::error::{GlitchError, GlitchResult};

/// Position of a frame within one video pipeline run.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

impl FrameIndex {
    /// The index following `self`.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

/// Width/height pair in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Size {
    /// Horizontal extent.
    pub width: u32,
    /// Vertical extent.
    pub height: u32,
}

impl Size {
    /// Build a size from its extents.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Smaller of the two extents.
    pub fn min_side(self) -> u32 {
        self.width.min(self.height)
    }

    /// Larger of the two extents.
    pub fn max_side(self) -> u32 {
        self.width.max(self.height)
    }
}

/// Frames-per-second as a rational number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be non-zero.
    pub den: u32,
}

impl Fps {
    /// Create a validated FPS value.
    pub fn new(num: u32, den: u32) -> GlitchResult<Self> {
        if num == 0 || den == 0 {
            return Err(GlitchError::validation(format!(
                "fps must be a positive ratio, got {num}/{den}"
            )));
        }
        Ok(Self { num, den })
    }

    /// Parse an ffmpeg-style ratio such as `30000/1001` or a bare integer.
    pub fn parse_ratio(s: &str) -> Option<Self> {
        let (num, den) = match s.trim().split_once('/') {
            Some((n, d)) => (n.parse().ok()?, d.parse().ok()?),
            None => (s.trim().parse().ok()?, 1),
        };
        Self::new(num, den).ok()
    }

    /// Convert to floating-point FPS.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }
}

impl Default for Fps {
    fn default() -> Self {
        Self { num: 25, den: 1 }
    }
}

/// Which channels an operation touches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChannelSel {
    /// Every channel of the pixel, alpha included.
    All,
    /// A single channel by index.
    Channel(usize),
}

impl ChannelSel {
    /// Whether channel `c` is selected.
    pub fn includes(self, c: usize) -> bool {
        match self {
            Self::All => true,
            Self::Channel(i) => i == c,
        }
    }
}

/// A rectangular region of a [`PixelBuffer`], optionally restricted to one channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BlockSpec {
    /// Left column.
    pub x: u32,
    /// Top row.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Channel selector.
    pub channel: ChannelSel,
}

impl BlockSpec {
    /// Build a block covering all channels.
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            channel: ChannelSel::All,
        }
    }

    /// Restrict the block to `channel`.
    pub fn with_channel(mut self, channel: ChannelSel) -> Self {
        self.channel = channel;
        self
    }

    /// Block size.
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Clamp origin and size so the block lies inside a `width`x`height` buffer and is at
    /// least 1x1.
    pub fn clamped(self, width: u32, height: u32) -> Self {
        let x = self.x.min(width.saturating_sub(1));
        let y = self.y.min(height.saturating_sub(1));
        Self {
            x,
            y,
            width: self.width.clamp(1, (width - x).max(1)),
            height: self.height.clamp(1, (height - y).max(1)),
            channel: self.channel,
        }
    }

    /// Whether the two blocks share at least one pixel position.
    pub fn overlaps(&self, other: &BlockSpec) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }
}

/// Row-major, interleaved 8-bit pixel grid with 3 (RGB) or 4 (RGBA) channels.
///
/// Primitives preserve width, height and channel count; only sample content changes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    channels: usize,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Create a zero-filled buffer.
    pub fn new(width: u32, height: u32, channels: usize) -> GlitchResult<Self> {
        let len = checked_len(width, height, channels)?;
        Ok(Self {
            width,
            height,
            channels,
            data: vec![0u8; len],
        })
    }

    /// Wrap existing interleaved samples. Fails if `data.len() != width*height*channels`.
    pub fn from_raw(
        width: u32,
        height: u32,
        channels: usize,
        data: Vec<u8>,
    ) -> GlitchResult<Self> {
        let len = checked_len(width, height, channels)?;
        if data.len() != len {
            return Err(GlitchError::validation(format!(
                "pixel data length {} doesn't match {width}x{height}x{channels}={len}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    /// Create a buffer where every pixel equals `pixel`; its length sets the channel count.
    pub fn filled(width: u32, height: u32, pixel: &[u8]) -> GlitchResult<Self> {
        let mut buf = Self::new(width, height, pixel.len())?;
        for px in buf.data.chunks_exact_mut(pixel.len()) {
            px.copy_from_slice(pixel);
        }
        Ok(buf)
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Buffer dimensions.
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Channels per pixel (3 or 4).
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Whether the last channel is alpha.
    pub fn has_alpha(&self) -> bool {
        self.channels == 4
    }

    /// Number of leading color channels (alpha excluded).
    pub fn color_channels(&self) -> usize {
        self.channels.min(3)
    }

    /// Interleaved samples.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable interleaved samples.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Consume the buffer and return its samples.
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Bytes per row.
    pub fn stride(&self) -> usize {
        self.width as usize * self.channels
    }

    /// Whether `other` has the same width, height and channel count.
    pub fn same_shape(&self, other: &PixelBuffer) -> bool {
        self.width == other.width && self.height == other.height && self.channels == other.channels
    }

    /// Fail with [`GlitchError::InvalidChannel`] if `channel` is out of range.
    pub fn check_channel(&self, channel: usize) -> GlitchResult<()> {
        if channel >= self.channels {
            return Err(GlitchError::InvalidChannel {
                channel,
                channels: self.channels,
            });
        }
        Ok(())
    }

    /// Sample at column `x`, row `y`, channel `c`. Panics if out of bounds.
    pub fn sample(&self, x: u32, y: u32, c: usize) -> u8 {
        self.data[self.index(x, y, c)]
    }

    /// Overwrite one sample. Panics if out of bounds.
    pub fn set_sample(&mut self, x: u32, y: u32, c: usize, value: u8) {
        let idx = self.index(x, y, c);
        self.data[idx] = value;
    }

    /// Samples of the pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        let idx = self.index(x, y, 0);
        &self.data[idx..idx + self.channels]
    }

    pub(crate) fn index(&self, x: u32, y: u32, c: usize) -> usize {
        y as usize * self.stride() + x as usize * self.channels + c
    }
}

fn checked_len(width: u32, height: u32, channels: usize) -> GlitchResult<usize> {
    if !(3..=4).contains(&channels) {
        return Err(GlitchError::validation(format!(
            "channel count must be 3 or 4, got {channels}"
        )));
    }
    if width == 0 || height == 0 {
        return Err(GlitchError::validation(
            "pixel buffer width/height must be non-zero",
        ));
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(channels))
        .ok_or_else(|| GlitchError::validation("pixel buffer size overflow"))
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
