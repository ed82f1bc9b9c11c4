use std::{
    fmt,
    sync::{Arc, OnceLock},
};

use crate::foundation::{
    core::PixelBuffer,
    error::{FilterError, FilterResult},
};

/// An externally supplied image (alpha map, mask) that can be decoded into
/// RGBA pixels.
///
/// Decoding may fail, e.g. when the backing file is unreadable; filters turn
/// that into [`FilterError::BufferAccess`].
pub trait PixelSource: fmt::Debug + Send + Sync {
    /// Decode the full image into straight (non-premultiplied) RGBA8.
    fn decode(&self) -> FilterResult<PixelBuffer>;
}

impl PixelSource for PixelBuffer {
    fn decode(&self) -> FilterResult<PixelBuffer> {
        Ok(self.clone())
    }
}

/// A source reference plus its lazily decoded pixels.
///
/// The cache belongs to the reference it was decoded from: replacing the
/// source drops it. Clones share the source `Arc` and any pixels decoded so
/// far.
#[derive(Clone)]
pub(crate) struct CachedSource {
    source: Arc<dyn PixelSource>,
    decoded: OnceLock<Arc<PixelBuffer>>,
}

impl fmt::Debug for CachedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedSource")
            .field("source", &self.source)
            .field("decoded", &self.decoded.get().is_some())
            .finish()
    }
}

impl CachedSource {
    pub(crate) fn new(source: Arc<dyn PixelSource>) -> Self {
        Self {
            source,
            decoded: OnceLock::new(),
        }
    }

    pub(crate) fn source(&self) -> &Arc<dyn PixelSource> {
        &self.source
    }

    pub(crate) fn is_decoded(&self) -> bool {
        self.decoded.get().is_some()
    }

    /// Swap the source; a different reference invalidates the decoded pixels.
    pub(crate) fn replace(&mut self, source: Arc<dyn PixelSource>) {
        if Arc::ptr_eq(&self.source, &source) {
            return;
        }
        self.source = source;
        self.decoded = OnceLock::new();
    }

    /// Decoded pixels, decoding on first use.
    ///
    /// Concurrent first uses may both decode; only one result is kept.
    pub(crate) fn pixels(&self) -> FilterResult<Arc<PixelBuffer>> {
        if let Some(px) = self.decoded.get() {
            return Ok(Arc::clone(px));
        }
        let decoded = self.source.decode().map_err(|err| match err {
            FilterError::BufferAccess(_) => err,
            other => FilterError::buffer_access(format!("decode pixel source: {other}")),
        })?;
        tracing::debug!(
            width = decoded.width(),
            height = decoded.height(),
            "decoded pixel source"
        );
        Ok(Arc::clone(self.decoded.get_or_init(|| Arc::new(decoded))))
    }
}
