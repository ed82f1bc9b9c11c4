use std::ops::Index;

use crate::{
    filters::{
        channel::Overflow,
        filter::{Filter, Outcome},
    },
    foundation::{
        core::{A, B, CHANNELS, G, PixelBuffer, R},
        error::FilterResult,
    },
};

/// Number of coefficients consumed by [`ColorMatrixFilter`] (4 rows x 5 columns).
pub const FILTER_COEFFICIENTS: usize = 20;

const LENGTH: usize = 25;

#[rustfmt::skip]
const IDENTITY: [f64; LENGTH] = [
    1.0, 0.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0, 0.0,
    0.0, 0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.0, 1.0, 0.0,
    0.0, 0.0, 0.0, 0.0, 1.0,
];

// Contrast curve for positive adjustments, indexed by contrast 0..=100.
#[rustfmt::skip]
const DELTA_INDEX: [f64; 101] = [
    0.0,  0.01, 0.02, 0.04, 0.05, 0.06, 0.07, 0.08, 0.1,  0.11,
    0.12, 0.14, 0.15, 0.16, 0.17, 0.18, 0.20, 0.21, 0.22, 0.24,
    0.25, 0.27, 0.28, 0.30, 0.32, 0.34, 0.36, 0.38, 0.40, 0.42,
    0.44, 0.46, 0.48, 0.5,  0.53, 0.56, 0.59, 0.62, 0.65, 0.68,
    0.71, 0.74, 0.77, 0.80, 0.83, 0.86, 0.89, 0.92, 0.95, 0.98,
    1.0,  1.06, 1.12, 1.18, 1.24, 1.30, 1.36, 1.42, 1.48, 1.54,
    1.60, 1.66, 1.72, 1.78, 1.84, 1.90, 1.96, 2.0,  2.12, 2.25,
    2.37, 2.50, 2.62, 2.75, 2.87, 3.0,  3.2,  3.4,  3.6,  3.8,
    4.0,  4.3,  4.7,  4.9,  5.0,  5.5,  6.0,  6.5,  6.8,  7.0,
    7.3,  7.5,  7.8,  8.0,  8.4,  8.7,  9.0,  9.4,  9.6,  9.8,
    10.0,
];

/// 5x5 color transform builder with common photo adjustments.
///
/// Stored row-major; rows are output R, G, B, A, 1 and columns input
/// R, G, B, A, 1. Each adjustment multiplies the current matrix on the right.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorMatrix {
    m: [f64; LENGTH],
}

impl Default for ColorMatrix {
    fn default() -> Self {
        Self::identity()
    }
}

impl Index<usize> for ColorMatrix {
    type Output = f64;

    fn index(&self, idx: usize) -> &f64 {
        &self.m[idx]
    }
}

impl ColorMatrix {
    /// The identity matrix.
    pub fn identity() -> Self {
        Self { m: IDENTITY }
    }

    /// Matrix from up to 25 row-major values.
    ///
    /// Missing trailing values are taken from the identity matrix; extra values
    /// are ignored.
    pub fn from_slice(values: &[f64]) -> Self {
        let mut m = IDENTITY;
        let n = values.len().min(LENGTH);
        m[..n].copy_from_slice(&values[..n]);
        Self { m }
    }

    /// Build from brightness, contrast, saturation and hue in one go.
    pub fn with_adjustments(brightness: f64, contrast: f64, saturation: f64, hue: f64) -> Self {
        let mut cm = Self::identity();
        cm.adjust_color(brightness, contrast, saturation, hue);
        cm
    }

    /// Back to identity.
    pub fn reset(&mut self) -> &mut Self {
        self.m = IDENTITY;
        self
    }

    /// Add `value` (clamped to `[-255, 255]`) to the R, G and B channels.
    pub fn adjust_brightness(&mut self, value: f64) -> &mut Self {
        if value == 0.0 || value.is_nan() {
            return self;
        }
        let v = clean_value(value, 255.0);
        #[rustfmt::skip]
        let adj = [
            1.0, 0.0, 0.0, 0.0, v,
            0.0, 1.0, 0.0, 0.0, v,
            0.0, 0.0, 1.0, 0.0, v,
            0.0, 0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 0.0, 1.0,
        ];
        self.multiply(&adj);
        self
    }

    /// Scale contrast around mid-gray; `value` is clamped to `[-100, 100]`.
    pub fn adjust_contrast(&mut self, value: f64) -> &mut Self {
        if value == 0.0 || value.is_nan() {
            return self;
        }
        let v = clean_value(value, 100.0);
        let x = if v < 0.0 {
            127.0 + v / 100.0 * 127.0
        } else {
            let base = v.trunc() as usize;
            let frac = v.fract();
            let delta = if frac == 0.0 {
                DELTA_INDEX[base]
            } else {
                DELTA_INDEX[base] * (1.0 - frac) + DELTA_INDEX[base + 1] * frac
            };
            delta * 127.0 + 127.0
        };
        let s = x / 127.0;
        let o = 0.5 * (127.0 - x);
        #[rustfmt::skip]
        let adj = [
            s,   0.0, 0.0, 0.0, o,
            0.0, s,   0.0, 0.0, o,
            0.0, 0.0, s,   0.0, o,
            0.0, 0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 0.0, 1.0,
        ];
        self.multiply(&adj);
        self
    }

    /// Change saturation; `value` is clamped to `[-100, 100]`, `-100` is grayscale.
    pub fn adjust_saturation(&mut self, value: f64) -> &mut Self {
        if value == 0.0 || value.is_nan() {
            return self;
        }
        let v = clean_value(value, 100.0);
        let x = 1.0 + if v > 0.0 { 3.0 * v / 100.0 } else { v / 100.0 };
        let (lr, lg, lb) = (0.3086, 0.6094, 0.0820);
        #[rustfmt::skip]
        let adj = [
            lr * (1.0 - x) + x, lg * (1.0 - x),     lb * (1.0 - x),     0.0, 0.0,
            lr * (1.0 - x),     lg * (1.0 - x) + x, lb * (1.0 - x),     0.0, 0.0,
            lr * (1.0 - x),     lg * (1.0 - x),     lb * (1.0 - x) + x, 0.0, 0.0,
            0.0,                0.0,                0.0,                1.0, 0.0,
            0.0,                0.0,                0.0,                0.0, 1.0,
        ];
        self.multiply(&adj);
        self
    }

    /// Rotate hue by `degrees` (clamped to `[-180, 180]`).
    pub fn adjust_hue(&mut self, degrees: f64) -> &mut Self {
        if degrees == 0.0 || degrees.is_nan() {
            return self;
        }
        let rad = clean_value(degrees, 180.0).to_radians();
        let (sin, cos) = rad.sin_cos();
        let (lr, lg, lb) = (0.213, 0.715, 0.072);
        #[rustfmt::skip]
        let adj = [
            lr + cos * (1.0 - lr) + sin * -lr,
            lg + cos * -lg + sin * -lg,
            lb + cos * -lb + sin * (1.0 - lb),
            0.0, 0.0,
            lr + cos * -lr + sin * 0.143,
            lg + cos * (1.0 - lg) + sin * 0.140,
            lb + cos * -lb + sin * -0.283,
            0.0, 0.0,
            lr + cos * -lr + sin * -(1.0 - lr),
            lg + cos * -lg + sin * lg,
            lb + cos * (1.0 - lb) + sin * lb,
            0.0, 0.0,
            0.0, 0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 0.0, 1.0,
        ];
        self.multiply(&adj);
        self
    }

    /// Hue, then contrast, then brightness, then saturation.
    pub fn adjust_color(
        &mut self,
        brightness: f64,
        contrast: f64,
        saturation: f64,
        hue: f64,
    ) -> &mut Self {
        self.adjust_hue(hue)
            .adjust_contrast(contrast)
            .adjust_brightness(brightness)
            .adjust_saturation(saturation)
    }

    /// Multiply by another matrix (`self = self x other`).
    pub fn concat(&mut self, other: &ColorMatrix) -> &mut Self {
        self.multiply(&other.m);
        self
    }

    /// All 25 values, row-major.
    pub fn to_array(&self) -> [f64; LENGTH] {
        self.m
    }

    /// The top four rows, as consumed by [`ColorMatrixFilter`].
    pub fn filter_coefficients(&self) -> [f64; FILTER_COEFFICIENTS] {
        let mut out = [0.0; FILTER_COEFFICIENTS];
        out.copy_from_slice(&self.m[..FILTER_COEFFICIENTS]);
        out
    }

    fn multiply(&mut self, other: &[f64; LENGTH]) {
        for row in 0..5 {
            let mut current = [0.0; 5];
            current.copy_from_slice(&self.m[row * 5..row * 5 + 5]);
            for col in 0..5 {
                self.m[row * 5 + col] = (0..5).map(|k| current[k] * other[k * 5 + col]).sum();
            }
        }
    }
}

fn clean_value(value: f64, limit: f64) -> f64 {
    value.clamp(-limit, limit)
}

/// General linear color transform across all four channels.
///
/// Output channel `k` is the dot product of row `k` of a 4x5 matrix with
/// `(r, g, b, a, 1)`.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorMatrixFilter {
    matrix: [f64; FILTER_COEFFICIENTS],
    overflow: Overflow,
}

impl Default for ColorMatrixFilter {
    fn default() -> Self {
        Self::from_matrix(&ColorMatrix::identity())
    }
}

impl ColorMatrixFilter {
    /// Filter from 20 row-major coefficients.
    pub fn new(matrix: [f64; FILTER_COEFFICIENTS]) -> Self {
        Self {
            matrix,
            overflow: Overflow::Wrap,
        }
    }

    /// Filter from an arbitrary-length coefficient list (identity-completed).
    pub fn from_slice(values: &[f64]) -> Self {
        Self::from_matrix(&ColorMatrix::from_slice(values))
    }

    /// Filter from the top four rows of a [`ColorMatrix`].
    pub fn from_matrix(matrix: &ColorMatrix) -> Self {
        Self::new(matrix.filter_coefficients())
    }

    /// Same filter with a different overflow policy.
    pub fn with_overflow(mut self, overflow: Overflow) -> Self {
        self.overflow = overflow;
        self
    }

    /// The 20 coefficients, row-major.
    pub fn matrix(&self) -> &[f64; FILTER_COEFFICIENTS] {
        &self.matrix
    }

    /// Overflow policy used when storing results.
    pub fn overflow(&self) -> Overflow {
        self.overflow
    }
}

impl Filter for ColorMatrixFilter {
    fn name(&self) -> &'static str {
        "ColorMatrixFilter"
    }

    fn filter_pixels(&self, region: &mut PixelBuffer) -> FilterResult<Outcome> {
        let m = &self.matrix;
        let overflow = self.overflow;
        for px in region.data_mut().chunks_exact_mut(CHANNELS) {
            let (r, g, b, a) = (
                f64::from(px[R]),
                f64::from(px[G]),
                f64::from(px[B]),
                f64::from(px[A]),
            );
            for (k, out) in px.iter_mut().enumerate() {
                let row = &m[k * 5..k * 5 + 5];
                *out = overflow.store(r * row[0] + g * row[1] + b * row[2] + a * row[3] + row[4]);
            }
        }
        Ok(Outcome::Applied)
    }

    fn box_clone(&self) -> Box<dyn Filter> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/filters/color_matrix.rs"]
mod tests;
