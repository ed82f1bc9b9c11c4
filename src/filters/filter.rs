use std::fmt;

use crate::foundation::{
    core::{PixelBuffer, Rect},
    error::{FilterError, FilterResult},
};

/// Where a filter writes its output.
#[derive(Debug)]
pub enum Target<'a> {
    /// Back into the source buffer, over the source region.
    InPlace,
    /// Into the source buffer with the output's top-left corner at `(x, y)`.
    At {
        /// Left edge of the output region.
        x: i32,
        /// Top edge of the output region.
        y: i32,
    },
    /// Into a different buffer with the output's top-left corner at `(x, y)`.
    Buffer {
        /// Destination buffer.
        buffer: &'a mut PixelBuffer,
        /// Left edge of the output region.
        x: i32,
        /// Top edge of the output region.
        y: i32,
    },
}

/// Result of a successful [`Filter::apply`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum Outcome {
    /// Pixels were transformed and written to the target.
    Applied,
    /// The filter had nothing to do; the target was not written.
    Unchanged,
}

/// Common contract of every pixel operator.
///
/// Filters carry immutable configuration and may be applied any number of
/// times to any buffer. The provided [`Filter::apply`] reads the whole source
/// region before anything is written, so in-place and overlapping targets are
/// safe and a failure never leaves a half-written region behind.
pub trait Filter: fmt::Debug + Send + Sync {
    /// Short type name, e.g. `"BoxBlurFilter"`.
    fn name(&self) -> &'static str;

    /// Margin this filter adds around an object's nominal bounds.
    fn bounds(&self) -> Rect {
        Rect::ZERO
    }

    /// Transform a scratch copy of the source region in place.
    ///
    /// `region` is exactly the size of the rectangle passed to
    /// [`Filter::apply`]; its top-left pixel is the rectangle's origin.
    fn filter_pixels(&self, region: &mut PixelBuffer) -> FilterResult<Outcome>;

    /// Read `rect` from `buffer`, filter it, and write the result to `target`.
    fn apply(
        &self,
        buffer: &mut PixelBuffer,
        rect: Rect,
        target: Target<'_>,
    ) -> FilterResult<Outcome> {
        apply_region(self, buffer, rect, target)
    }

    /// `true` when the output may only replace the source region itself.
    ///
    /// Such filters reject [`Target::Buffer`] and displaced [`Target::At`]
    /// targets, both on their own and inside a chain.
    fn requires_in_place(&self) -> bool {
        false
    }

    /// Independent copy with identical configuration.
    fn box_clone(&self) -> Box<dyn Filter>;

    /// Human-readable description, e.g. `[ColorFilter]`.
    fn describe(&self) -> String {
        format!("[{}]", self.name())
    }
}

impl Clone for Box<dyn Filter> {
    fn clone(&self) -> Self {
        self.box_clone()
    }
}

/// Shared apply path: validate, copy out, filter, write back.
pub(crate) fn apply_region<F: Filter + ?Sized>(
    filter: &F,
    buffer: &mut PixelBuffer,
    rect: Rect,
    target: Target<'_>,
) -> FilterResult<Outcome> {
    if rect.width < 0 || rect.height < 0 {
        return Err(FilterError::buffer_access(format!(
            "{} region has negative size {}x{}",
            filter.name(),
            rect.width,
            rect.height
        )));
    }
    if rect.is_empty() {
        return Ok(Outcome::Unchanged);
    }

    let mut region = buffer.read_region(rect)?;

    let (dst, tx, ty) = match target {
        Target::InPlace => (buffer, rect.x, rect.y),
        Target::At { x, y } => (buffer, x, y),
        Target::Buffer { buffer, x, y } => (buffer, x, y),
    };
    dst.check_region(Rect::new(tx, ty, rect.width, rect.height))?;

    match filter.filter_pixels(&mut region)? {
        Outcome::Unchanged => Ok(Outcome::Unchanged),
        Outcome::Applied => {
            dst.write_region(tx, ty, &region)?;
            Ok(Outcome::Applied)
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/filters/filter.rs"]
mod tests;
