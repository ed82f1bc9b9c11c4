use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::{
    filters::source::PixelSource,
    foundation::{
        core::PixelBuffer,
        error::{FilterError, FilterResult},
    },
};

/// Decode encoded image bytes (PNG, JPEG, ...) into straight RGBA8.
pub fn decode_image(bytes: &[u8]) -> FilterResult<PixelBuffer> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    Ok(PixelBuffer::from(dyn_img.to_rgba8()))
}

/// Read and decode an image file into straight RGBA8.
#[tracing::instrument]
pub fn load_image(path: &Path) -> FilterResult<PixelBuffer> {
    let bytes = std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
    let buf = decode_image(&bytes)
        .map_err(|err| FilterError::Other(anyhow::anyhow!("'{}': {err}", path.display())))?;
    tracing::debug!(width = buf.width(), height = buf.height(), "loaded image");
    Ok(buf)
}

/// Encode a buffer as PNG, creating parent directories as needed.
pub fn save_png(path: &Path, buf: &PixelBuffer) -> FilterResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        path,
        buf.data(),
        buf.width(),
        buf.height(),
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

/// A map or mask backed by an image file, read only when a filter first needs it.
///
/// A missing or undecodable file surfaces as [`FilterError::BufferAccess`]
/// from the filter's `apply`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageFileSource {
    path: PathBuf,
}

impl ImageFileSource {
    /// Source reading from `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PixelSource for ImageFileSource {
    fn decode(&self) -> FilterResult<PixelBuffer> {
        load_image(&self.path).map_err(|err| FilterError::buffer_access(err.to_string()))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
