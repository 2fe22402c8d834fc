use std::borrow::Cow;
use std::io::{BufWriter, Write as _};
use std::path::Path;

use anyhow::Context as _;
use image::{ColorType, ImageFormat};

use crate::foundation::core::PixelBuffer;
use crate::foundation::error::{GlitchError, GlitchResult};

/// Decode an image file. Sources with alpha become RGBA buffers, everything else RGB.
pub fn decode_image(path: &Path) -> GlitchResult<PixelBuffer> {
    let img = image::ImageReader::open(path)
        .with_context(|| format!("open image '{}'", path.display()))?
        .with_guessed_format()
        .with_context(|| format!("detect image format of '{}'", path.display()))?
        .decode()
        .with_context(|| format!("decode image '{}'", path.display()))?;

    if img.color().has_alpha() {
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        PixelBuffer::from_raw(width, height, 4, rgba.into_raw())
    } else {
        let rgb = img.to_rgb8();
        let (width, height) = rgb.dimensions();
        PixelBuffer::from_raw(width, height, 3, rgb.into_raw())
    }
}

/// Encode `buffer` to `path`, picking the format from the extension.
///
/// Alpha is dropped for formats that cannot store it. The file is written to a temporary
/// sibling and renamed into place, so a failure never leaves a partial image at `path`.
pub fn encode_image(buffer: &PixelBuffer, path: &Path) -> GlitchResult<()> {
    let format = ImageFormat::from_path(path).map_err(|_| {
        GlitchError::validation(format!(
            "unsupported image extension for output '{}'",
            path.display()
        ))
    })?;

    let (samples, color) = match (buffer.has_alpha(), format) {
        (true, ImageFormat::Jpeg) => (Cow::Owned(strip_alpha(buffer)), ColorType::Rgb8),
        (true, _) => (Cow::Borrowed(buffer.data()), ColorType::Rgba8),
        (false, _) => (Cow::Borrowed(buffer.data()), ColorType::Rgb8),
    };

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("create temporary file in '{}'", dir.display()))?;
    {
        let mut out = BufWriter::new(tmp.as_file_mut());
        image::write_buffer_with_format(
            &mut out,
            &samples,
            buffer.width(),
            buffer.height(),
            color,
            format,
        )
        .with_context(|| format!("encode {format:?} image for '{}'", path.display()))?;
        out.flush()
            .with_context(|| format!("flush image for '{}'", path.display()))?;
    }
    tmp.persist(path)
        .with_context(|| format!("write image '{}'", path.display()))?;
    tracing::debug!(out = %path.display(), ?format, "image written");
    Ok(())
}

fn strip_alpha(buffer: &PixelBuffer) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(buffer.width() as usize * buffer.height() as usize * 3);
    for px in buffer.data().chunks_exact(buffer.channels()) {
        rgb.extend_from_slice(&px[..3]);
    }
    rgb
}

#[cfg(test)]
#[path = "../../tests/unit/media/image_io.rs"]
mod tests;
