use std::io::{Read, Write as _};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::thread::JoinHandle;

use crate::foundation::core::{FrameIndex, PixelBuffer};
use crate::foundation::error::{GlitchError, GlitchResult};
use crate::media::sink::{FrameSink, SinkConfig};

/// Options for [`FfmpegSink`] output.
#[derive(Clone, Debug)]
pub struct FfmpegSinkOpts {
    /// Output container path; the extension picks the format.
    pub out_path: PathBuf,
    /// Overwrite output file if it already exists.
    pub overwrite: bool,
}

impl FfmpegSinkOpts {
    /// Create options for writing to `out_path`, overwriting any existing file.
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: true,
        }
    }
}

/// Sink that spawns the system `ffmpeg` and streams raw RGB24 frames to its stdin.
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,

    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stderr_drain: Option<StderrDrain>,

    scratch: Vec<u8>,
    cfg: Option<SinkConfig>,
    last_idx: Option<FrameIndex>,
}

impl FfmpegSink {
    /// Create a sink; `ffmpeg` is spawned on [`FrameSink::begin`].
    pub fn new(opts: FfmpegSinkOpts) -> Self {
        Self {
            opts,
            child: None,
            stdin: None,
            stderr_drain: None,
            scratch: Vec::new(),
            cfg: None,
            last_idx: None,
        }
    }
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> GlitchResult<()> {
        if cfg.width == 0 || cfg.height == 0 {
            return Err(GlitchError::validation(
                "ffmpeg sink width/height must be non-zero",
            ));
        }

        ensure_parent_dir(&self.opts.out_path)?;
        if !self.opts.overwrite && self.opts.out_path.exists() {
            return Err(GlitchError::validation(format!(
                "output file '{}' already exists",
                self.opts.out_path.display()
            )));
        }
        if !is_ffmpeg_on_path() {
            return Err(GlitchError::stream(
                "ffmpeg is required for video encoding, but was not found on PATH",
            ));
        }

        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        cmd.arg(if self.opts.overwrite { "-y" } else { "-n" });
        cmd.args([
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgb24",
            "-s",
            &format!("{}x{}", cfg.width, cfg.height),
            "-r",
            &format!("{}/{}", cfg.fps.num, cfg.fps.den),
            "-i",
            "pipe:0",
            "-an",
            // yuv420p needs even dimensions; odd frames lose their last row/column.
            "-vf",
            "crop=trunc(iw/2)*2:trunc(ih/2)*2",
            "-pix_fmt",
            "yuv420p",
        ])
        .arg(&self.opts.out_path);

        let mut child = cmd.spawn().map_err(|e| {
            GlitchError::stream(format!(
                "failed to spawn ffmpeg encoder (is it installed and on PATH?): {e}"
            ))
        })?;
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| GlitchError::stream("failed to open ffmpeg stdin (unexpected)"))?;
        let stderr_drain = StderrDrain::spawn(&mut child)?;
        tracing::debug!(out = %self.opts.out_path.display(), ?cfg, "ffmpeg encoder started");

        self.scratch = Vec::with_capacity(cfg.width as usize * cfg.height as usize * 3);
        self.child = Some(child);
        self.stdin = Some(stdin);
        self.stderr_drain = Some(stderr_drain);
        self.cfg = Some(cfg);
        self.last_idx = None;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &PixelBuffer) -> GlitchResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| GlitchError::stream("ffmpeg sink not started"))?;
        if let Some(last) = self.last_idx
            && idx <= last
        {
            return Err(GlitchError::stream(format!(
                "ffmpeg sink received out-of-order frame index {} after {}",
                idx.0, last.0
            )));
        }
        self.last_idx = Some(idx);

        if frame.width() != cfg.width || frame.height() != cfg.height {
            return Err(GlitchError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width(),
                frame.height(),
                cfg.width,
                cfg.height
            )));
        }

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(GlitchError::stream("ffmpeg sink is already finalized"));
        };
        let bytes = if frame.has_alpha() {
            self.scratch.clear();
            for px in frame.data().chunks_exact(frame.channels()) {
                self.scratch.extend_from_slice(&px[..3]);
            }
            &self.scratch[..]
        } else {
            frame.data()
        };
        stdin.write_all(bytes).map_err(|e| {
            GlitchError::stream(format!("failed to write frame to ffmpeg stdin: {e}"))
        })?;
        Ok(())
    }

    fn end(&mut self) -> GlitchResult<()> {
        drop(self.stdin.take());
        let mut child = self
            .child
            .take()
            .ok_or_else(|| GlitchError::stream("ffmpeg sink not started"))?;
        wait_for_exit(&mut child, self.stderr_drain.take(), "ffmpeg encoder")?;
        self.cfg = None;
        Ok(())
    }
}

/// Collects a child's stderr on a background thread so a chatty process never blocks on a
/// full pipe.
pub(crate) struct StderrDrain(JoinHandle<std::io::Result<Vec<u8>>>);

impl StderrDrain {
    pub(crate) fn spawn(child: &mut Child) -> GlitchResult<Self> {
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| GlitchError::stream("failed to open ffmpeg stderr (unexpected)"))?;
        Ok(Self(std::thread::spawn(move || {
            let mut bytes = Vec::new();
            stderr.read_to_end(&mut bytes)?;
            Ok(bytes)
        })))
    }

    fn join(self) -> GlitchResult<Vec<u8>> {
        self.0
            .join()
            .map_err(|_| GlitchError::stream("ffmpeg stderr drain thread panicked"))?
            .map_err(|e| GlitchError::stream(format!("ffmpeg stderr read failed: {e}")))
    }
}

/// Wait for `child` and turn a non-zero exit into a stream error carrying its stderr.
pub(crate) fn wait_for_exit(
    child: &mut Child,
    drain: Option<StderrDrain>,
    what: &str,
) -> GlitchResult<()> {
    let status = child
        .wait()
        .map_err(|e| GlitchError::stream(format!("failed to wait for {what}: {e}")))?;
    let stderr = match drain {
        Some(drain) => drain.join()?,
        None => Vec::new(),
    };
    if !status.success() {
        return Err(GlitchError::stream(format!(
            "{what} exited with status {status}: {}",
            String::from_utf8_lossy(&stderr).trim()
        )));
    }
    tracing::debug!(%status, "{what} finished");
    Ok(())
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> GlitchResult<()> {
    if let Some(parent) = path.parent() {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/media/ffmpeg.rs"]
mod tests;
