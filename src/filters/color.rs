use crate::{
    filters::{
        channel::Overflow,
        filter::{Filter, Outcome},
    },
    foundation::{
        core::{CHANNELS, PixelBuffer},
        error::FilterResult,
    },
};

/// Per-channel affine transform: `out[c] = in[c] * multiplier[c] + offset[c]`.
///
/// Channels are ordered R, G, B, A. Results outside `[0, 255]` are stored per
/// the filter's [`Overflow`] policy (wrapping by default).
#[derive(Clone, Debug, PartialEq)]
pub struct ColorFilter {
    multipliers: [f64; 4],
    offsets: [f64; 4],
    overflow: Overflow,
}

impl Default for ColorFilter {
    fn default() -> Self {
        Self {
            multipliers: [1.0; 4],
            offsets: [0.0; 4],
            overflow: Overflow::Wrap,
        }
    }
}

impl ColorFilter {
    /// Filter with the given R, G, B, A multipliers and offsets.
    pub fn new(multipliers: [f64; 4], offsets: [f64; 4]) -> Self {
        Self {
            multipliers,
            offsets,
            overflow: Overflow::Wrap,
        }
    }

    /// Same filter with a different overflow policy.
    pub fn with_overflow(mut self, overflow: Overflow) -> Self {
        self.overflow = overflow;
        self
    }

    /// R, G, B, A multipliers.
    pub fn multipliers(&self) -> [f64; 4] {
        self.multipliers
    }

    /// R, G, B, A offsets.
    pub fn offsets(&self) -> [f64; 4] {
        self.offsets
    }

    /// Overflow policy used when storing results.
    pub fn overflow(&self) -> Overflow {
        self.overflow
    }
}

impl Filter for ColorFilter {
    fn name(&self) -> &'static str {
        "ColorFilter"
    }

    fn filter_pixels(&self, region: &mut PixelBuffer) -> FilterResult<Outcome> {
        let (m, o, overflow) = (self.multipliers, self.offsets, self.overflow);
        for px in region.data_mut().chunks_exact_mut(CHANNELS) {
            for c in 0..CHANNELS {
                px[c] = overflow.store(f64::from(px[c]) * m[c] + o[c]);
            }
        }
        Ok(Outcome::Applied)
    }

    fn box_clone(&self) -> Box<dyn Filter> {
        Box::new(self.clone())
    }

    fn describe(&self) -> String {
        let [rm, gm, bm, am] = self.multipliers;
        let [ro, go, bo, ao] = self.offsets;
        format!("[ColorFilter mul=({rm}, {gm}, {bm}, {am}) off=({ro}, {go}, {bo}, {ao})]")
    }
}

#[cfg(test)]
#[path = "../../tests/unit/filters/color.rs"]
mod tests;
