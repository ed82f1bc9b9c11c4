use std::sync::Arc;

use crate::{
    filters::{
        filter::{Filter, Outcome, Target, apply_region},
        source::{CachedSource, PixelSource},
    },
    foundation::{
        core::{A, CHANNELS, PixelBuffer, Rect},
        error::{FilterError, FilterResult},
    },
};

/// Keeps the target only where the mask is opaque.
///
/// For each pixel, `alpha = min(target alpha, mask alpha)`; color channels are
/// untouched. The mask's top-left pixel lines up with the region's origin and
/// region pixels outside the mask count as fully transparent.
///
/// Output always goes back over the source region: a distinct target buffer
/// or origin is rejected with [`FilterError::Configuration`], including when
/// the filter is a stage of a chain applied to such a target.
#[derive(Clone, Debug)]
pub struct AlphaMaskFilter {
    mask: CachedSource,
}

impl AlphaMaskFilter {
    /// Filter masking with `mask`.
    pub fn new(mask: Arc<dyn PixelSource>) -> Self {
        Self {
            mask: CachedSource::new(mask),
        }
    }

    /// Current mask reference.
    pub fn mask(&self) -> &Arc<dyn PixelSource> {
        self.mask.source()
    }

    /// Point the filter at another mask; a new reference drops the decoded cache.
    pub fn set_mask(&mut self, mask: Arc<dyn PixelSource>) {
        self.mask.replace(mask);
    }
}

impl Filter for AlphaMaskFilter {
    fn name(&self) -> &'static str {
        "AlphaMaskFilter"
    }

    fn filter_pixels(&self, region: &mut PixelBuffer) -> FilterResult<Outcome> {
        let mask = self.mask.pixels()?;
        let width = region.width();
        for (i, px) in region.data_mut().chunks_exact_mut(CHANNELS).enumerate() {
            let (x, y) = ((i as u32) % width, (i as u32) / width);
            let mask_a = mask.pixel(x, y).map_or(0, |m| m[A]);
            px[A] = px[A].min(mask_a);
        }
        Ok(Outcome::Applied)
    }

    fn apply(
        &self,
        buffer: &mut PixelBuffer,
        rect: Rect,
        target: Target<'_>,
    ) -> FilterResult<Outcome> {
        match target {
            Target::InPlace => {}
            Target::At { x, y } if x == rect.x && y == rect.y => {}
            Target::At { .. } => {
                return Err(FilterError::configuration(
                    "AlphaMaskFilter cannot write to a different target origin",
                ));
            }
            Target::Buffer { .. } => {
                return Err(FilterError::configuration(
                    "AlphaMaskFilter cannot write to a separate target buffer",
                ));
            }
        }
        apply_region(self, buffer, rect, Target::InPlace)
    }

    fn requires_in_place(&self) -> bool {
        true
    }

    fn box_clone(&self) -> Box<dyn Filter> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/filters/alpha_mask.rs"]
mod tests;
