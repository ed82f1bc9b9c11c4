use crate::foundation::error::{FilterError, FilterResult};

/// Bytes per pixel. Channel order is fixed as R, G, B, A.
pub const CHANNELS: usize = 4;
/// Offset of the red channel inside a pixel.
pub const R: usize = 0;
/// Offset of the green channel inside a pixel.
pub const G: usize = 1;
/// Offset of the blue channel inside a pixel.
pub const B: usize = 2;
/// Offset of the alpha channel inside a pixel.
pub const A: usize = 3;

/// Integer rectangle in buffer-local coordinates.
///
/// Used both as a region (`x`, `y` is the top-left corner) and as a filter
/// margin, where it reads "extend left by `-x`, top by `-y`, right by
/// `width + x`, bottom by `height + y`".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rect {
    /// Left edge (or left margin offset).
    pub x: i32,
    /// Top edge (or top margin offset).
    pub y: i32,
    /// Width of the region (or total horizontal growth).
    pub width: i32,
    /// Height of the region (or total vertical growth).
    pub height: i32,
}

impl Rect {
    /// The zero rectangle; also the margin of a filter that needs no extra space.
    pub const ZERO: Self = Self {
        x: 0,
        y: 0,
        width: 0,
        height: 0,
    };

    /// Build a rectangle from its components.
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle covering a whole `width x height` buffer.
    pub fn of_size(width: u32, height: u32) -> Self {
        Self::new(0, 0, saturating_i32(width), saturating_i32(height))
    }

    /// `true` when the rectangle covers no pixels.
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Add a margin component-wise.
    ///
    /// On a margin this accumulates sequential filters (a blur after a blur
    /// needs the spread of both); on nominal bounds it gives the filtered
    /// bounds.
    pub fn pad(self, margin: Rect) -> Self {
        Self {
            x: self.x.saturating_add(margin.x),
            y: self.y.saturating_add(margin.y),
            width: self.width.saturating_add(margin.width),
            height: self.height.saturating_add(margin.height),
        }
    }

    /// Exclusive right edge.
    pub fn right(self) -> i64 {
        i64::from(self.x) + i64::from(self.width)
    }

    /// Exclusive bottom edge.
    pub fn bottom(self) -> i64 {
        i64::from(self.y) + i64::from(self.height)
    }
}

fn saturating_i32(v: u32) -> i32 {
    i32::try_from(v).unwrap_or(i32::MAX)
}

/// Owned, row-major RGBA8 pixel buffer.
///
/// The byte length is always `4 * width * height`; nothing in this crate
/// resizes a buffer it is handed.
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl std::fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("len", &self.data.len())
            .finish()
    }
}

impl PixelBuffer {
    /// Fully transparent black buffer.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; byte_len(width, height)],
        }
    }

    /// Buffer where every pixel equals `px`.
    pub fn filled(width: u32, height: u32, px: [u8; 4]) -> Self {
        let count = (width as usize) * (height as usize);
        Self {
            width,
            height,
            data: px.repeat(count),
        }
    }

    /// Wrap raw RGBA bytes; the length must be exactly `4 * width * height`.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> FilterResult<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(CHANNELS))
            .ok_or_else(|| FilterError::validation("pixel buffer size overflow"))?;
        if data.len() != expected {
            return Err(FilterError::validation(format!(
                "pixel buffer of {width}x{height} expects {expected} bytes, got {}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw channel bytes, row-major RGBA.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable raw channel bytes. The slice cannot change length.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Consume the buffer and return its bytes.
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Rectangle covering the whole buffer.
    pub fn rect(&self) -> Rect {
        Rect::of_size(self.width, self.height)
    }

    /// Pixel at `(x, y)`, or `None` outside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let idx = self.index_of(x, y)?;
        let px = &self.data[idx..idx + CHANNELS];
        Some([px[R], px[G], px[B], px[A]])
    }

    /// Overwrite the pixel at `(x, y)`; returns `false` outside the buffer.
    pub fn set_pixel(&mut self, x: u32, y: u32, px: [u8; 4]) -> bool {
        match self.index_of(x, y) {
            Some(idx) => {
                self.data[idx..idx + CHANNELS].copy_from_slice(&px);
                true
            }
            None => false,
        }
    }

    /// `true` when `rect` lies entirely inside the buffer (with non-negative size).
    pub fn contains(&self, rect: Rect) -> bool {
        rect.x >= 0
            && rect.y >= 0
            && rect.width >= 0
            && rect.height >= 0
            && rect.right() <= i64::from(self.width)
            && rect.bottom() <= i64::from(self.height)
    }

    /// Fail with [`FilterError::BufferAccess`] unless `rect` fits inside the buffer.
    pub fn check_region(&self, rect: Rect) -> FilterResult<()> {
        if self.contains(rect) {
            return Ok(());
        }
        Err(FilterError::buffer_access(format!(
            "region ({}, {}, {}x{}) is outside the {}x{} buffer",
            rect.x, rect.y, rect.width, rect.height, self.width, self.height
        )))
    }

    /// Copy a region out into a new buffer of the region's size.
    pub fn read_region(&self, rect: Rect) -> FilterResult<PixelBuffer> {
        self.check_region(rect)?;
        let (x, y) = (rect.x as usize, rect.y as usize);
        let (w, h) = (rect.width as u32, rect.height as u32);
        let mut out = PixelBuffer::new(w, h);
        let row_bytes = (w as usize) * CHANNELS;
        let stride = (self.width as usize) * CHANNELS;
        for row in 0..h as usize {
            let src_start = (y + row) * stride + x * CHANNELS;
            let dst_start = row * row_bytes;
            out.data[dst_start..dst_start + row_bytes]
                .copy_from_slice(&self.data[src_start..src_start + row_bytes]);
        }
        Ok(out)
    }

    /// Paste `src` with its top-left corner at `(x, y)`.
    ///
    /// The destination region is validated before any byte is written.
    pub fn write_region(&mut self, x: i32, y: i32, src: &PixelBuffer) -> FilterResult<()> {
        let rect = Rect::new(x, y, saturating_i32(src.width), saturating_i32(src.height));
        self.check_region(rect)?;
        let (x, y) = (x as usize, y as usize);
        let row_bytes = (src.width as usize) * CHANNELS;
        let stride = (self.width as usize) * CHANNELS;
        for row in 0..src.height as usize {
            let dst_start = (y + row) * stride + x * CHANNELS;
            let src_start = row * row_bytes;
            self.data[dst_start..dst_start + row_bytes]
                .copy_from_slice(&src.data[src_start..src_start + row_bytes]);
        }
        Ok(())
    }

    fn index_of(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(((y as usize) * (self.width as usize) + x as usize) * CHANNELS)
    }
}

fn byte_len(width: u32, height: u32) -> usize {
    (width as usize) * (height as usize) * CHANNELS
}

impl From<image::RgbaImage> for PixelBuffer {
    fn from(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            data: img.into_raw(),
        }
    }
}

impl From<PixelBuffer> for image::RgbaImage {
    fn from(buf: PixelBuffer) -> Self {
        let PixelBuffer {
            width,
            height,
            data,
        } = buf;
        // Length invariant holds for every PixelBuffer, so this cannot fail.
        image::RgbaImage::from_raw(width, height, data)
            .unwrap_or_else(|| image::RgbaImage::new(width, height))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
