use std::sync::Arc;

use crate::{
    filters::{
        filter::{Filter, Outcome},
        source::{CachedSource, PixelSource},
    },
    foundation::{
        core::{A, CHANNELS, PixelBuffer, R},
        error::FilterResult,
    },
};

/// Replaces the alpha channel with the red channel of a grayscale map.
///
/// The map is matched to the filtered region by flat pixel offset, so it
/// should have the region's dimensions. Map bytes past the end of the map
/// read as 0.
#[derive(Clone, Debug)]
pub struct AlphaMapFilter {
    map: CachedSource,
}

impl AlphaMapFilter {
    /// Filter reading alpha from `map`.
    pub fn new(map: Arc<dyn PixelSource>) -> Self {
        Self {
            map: CachedSource::new(map),
        }
    }

    /// Current map reference.
    pub fn map(&self) -> &Arc<dyn PixelSource> {
        self.map.source()
    }

    /// Point the filter at another map; a new reference drops the decoded cache.
    pub fn set_map(&mut self, map: Arc<dyn PixelSource>) {
        self.map.replace(map);
    }

    /// Whether the current map has already been decoded.
    pub fn is_map_decoded(&self) -> bool {
        self.map.is_decoded()
    }
}

impl Filter for AlphaMapFilter {
    fn name(&self) -> &'static str {
        "AlphaMapFilter"
    }

    fn filter_pixels(&self, region: &mut PixelBuffer) -> FilterResult<Outcome> {
        let map = self.map.pixels()?;
        let map = map.data();
        for (i, px) in region.data_mut().chunks_exact_mut(CHANNELS).enumerate() {
            px[A] = map.get(i * CHANNELS + R).copied().unwrap_or(0);
        }
        Ok(Outcome::Applied)
    }

    fn box_clone(&self) -> Box<dyn Filter> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/filters/alpha_map.rs"]
mod tests;
