use std::path::Path;
use std::process::Command;

use crate::foundation::core::{Fps, Size};
use crate::foundation::error::{GlitchError, GlitchResult};

/// Geometry and rate of the first video stream in a container.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VideoInfo {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Source frame rate; 25 fps when ffprobe reports none.
    pub fps: Fps,
}

impl VideoInfo {
    /// Frame dimensions.
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Byte length of one raw RGB24 frame.
    pub fn frame_len(&self) -> usize {
        self.width as usize * self.height as usize * 3
    }
}

#[derive(serde::Deserialize)]
struct ProbeStream {
    codec_type: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    r_frame_rate: Option<String>,
}

#[derive(serde::Deserialize)]
struct ProbeOut {
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

/// Ask `ffprobe` for the size and frame rate of `path`'s video stream.
#[tracing::instrument(level = "debug")]
pub fn probe_video(path: &Path) -> GlitchResult<VideoInfo> {
    let out = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-print_format",
            "json",
            "-show_streams",
        ])
        .arg(path)
        .output()
        .map_err(|e| GlitchError::stream(format!("failed to run ffprobe: {e}")))?;
    if !out.status.success() {
        return Err(GlitchError::stream(format!(
            "ffprobe failed for '{}': {}",
            path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }
    parse_probe_json(&out.stdout)
}

pub(crate) fn parse_probe_json(json: &[u8]) -> GlitchResult<VideoInfo> {
    let parsed: ProbeOut = serde_json::from_slice(json)
        .map_err(|e| GlitchError::stream(format!("ffprobe json parse failed: {e}")))?;
    let stream = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| GlitchError::stream("no video stream found"))?;
    let width = stream
        .width
        .filter(|w| *w > 0)
        .ok_or_else(|| GlitchError::stream("missing video width from ffprobe"))?;
    let height = stream
        .height
        .filter(|h| *h > 0)
        .ok_or_else(|| GlitchError::stream("missing video height from ffprobe"))?;
    let fps = stream
        .r_frame_rate
        .as_deref()
        .and_then(Fps::parse_ratio)
        .unwrap_or_default();

    Ok(VideoInfo { width, height, fps })
}

#[cfg(test)]
#[path = "../../tests/unit/media/probe.rs"]
mod tests;
