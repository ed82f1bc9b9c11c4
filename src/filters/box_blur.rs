use crate::{
    filters::filter::{Filter, Outcome},
    foundation::{
        core::{CHANNELS, PixelBuffer, Rect},
        error::FilterResult,
    },
};

/// Largest accepted radius; keeps `2 * radius` representable in a [`Rect`].
pub const MAX_RADIUS: u32 = (i32::MAX / 2) as u32;
/// Lowest blur quality (one iteration).
pub const MIN_QUALITY: u32 = 1;
/// Highest blur quality (three iterations).
pub const MAX_QUALITY: u32 = 3;

/// Separable box blur with edge clamping, iterated `quality` times.
///
/// Each iteration runs a horizontal then a vertical moving sum (two linear
/// scans, independent of the radius) and normalizes the combined sum once by
/// the full window area. Pixels outside the region read as the nearest edge
/// pixel, so flat input stays flat.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoxBlurFilter {
    blur_x: u32,
    blur_y: u32,
    quality: u32,
}

impl Default for BoxBlurFilter {
    fn default() -> Self {
        Self {
            blur_x: 0,
            blur_y: 0,
            quality: MIN_QUALITY,
        }
    }
}

impl BoxBlurFilter {
    /// Blur with radii `blur_x`/`blur_y` and `quality` iterations.
    ///
    /// Negative radii become 0; quality is clamped to `1..=3`.
    pub fn new(blur_x: i64, blur_y: i64, quality: i64) -> Self {
        Self {
            blur_x: clamp_radius(blur_x),
            blur_y: clamp_radius(blur_y),
            quality: quality.clamp(i64::from(MIN_QUALITY), i64::from(MAX_QUALITY)) as u32,
        }
    }

    /// Like [`BoxBlurFilter::new`] for loosely typed numbers.
    ///
    /// Fractions truncate toward zero; NaN radii become 0 and NaN quality 1.
    pub fn from_f64(blur_x: f64, blur_y: f64, quality: f64) -> Self {
        let quality = if quality.is_nan() {
            i64::from(MIN_QUALITY)
        } else {
            quality as i64
        };
        Self::new(blur_x as i64, blur_y as i64, quality)
    }

    /// Horizontal radius in pixels.
    pub fn blur_x(&self) -> u32 {
        self.blur_x
    }

    /// Vertical radius in pixels.
    pub fn blur_y(&self) -> u32 {
        self.blur_y
    }

    /// Number of blur iterations.
    pub fn quality(&self) -> u32 {
        self.quality
    }
}

fn clamp_radius(v: i64) -> u32 {
    v.clamp(0, i64::from(MAX_RADIUS)) as u32
}

impl Filter for BoxBlurFilter {
    fn name(&self) -> &'static str {
        "BoxBlurFilter"
    }

    fn bounds(&self) -> Rect {
        let (bx, by) = (self.blur_x as i32, self.blur_y as i32);
        Rect::new(-bx, -by, 2 * bx, 2 * by)
    }

    fn filter_pixels(&self, region: &mut PixelBuffer) -> FilterResult<Outcome> {
        if self.blur_x == 0 && self.blur_y == 0 {
            return Ok(Outcome::Unchanged);
        }
        let (width, height) = (region.width() as usize, region.height() as usize);
        if width == 0 || height == 0 {
            return Ok(Outcome::Unchanged);
        }

        let mut blur = BlurPasses::new(width, height, self.blur_x as usize, self.blur_y as usize);
        let data = region.data_mut();
        let mut scratch = vec![0u8; data.len()];
        for _ in 0..self.quality {
            blur.run(data, &mut scratch);
            data.copy_from_slice(&scratch);
        }
        Ok(Outcome::Applied)
    }

    fn box_clone(&self) -> Box<dyn Filter> {
        Box::new(*self)
    }

    fn describe(&self) -> String {
        format!(
            "[BoxBlurFilter blur_x={} blur_y={} quality={}]",
            self.blur_x, self.blur_y, self.quality
        )
    }
}

/// Working state reused across iterations.
struct BlurPasses {
    width: usize,
    height: usize,
    radius_x: usize,
    radius_y: usize,
    steps_x: Vec<(usize, usize)>,
    steps_y: Vec<(usize, usize)>,
    row_sums: Vec<u64>,
    col_sums: Vec<u128>,
    area: u128,
}

impl BlurPasses {
    fn new(width: usize, height: usize, radius_x: usize, radius_y: usize) -> Self {
        let area = (2 * radius_x as u128 + 1) * (2 * radius_y as u128 + 1);
        Self {
            width,
            height,
            radius_x,
            radius_y,
            steps_x: window_steps(width, radius_x),
            steps_y: window_steps(height, radius_y),
            row_sums: vec![0; width * height * CHANNELS],
            col_sums: vec![0; width * CHANNELS],
            area,
        }
    }

    /// One blur iteration from `src` into `dst`.
    fn run(&mut self, src: &[u8], dst: &mut [u8]) {
        self.horizontal(src);
        self.vertical(dst);
    }

    /// Per-row moving sums over `2 * radius_x + 1` columns, unnormalized.
    fn horizontal(&mut self, src: &[u8]) {
        let stride = self.width * CHANNELS;
        let start = initial_window(self.width, self.radius_x);
        for (src_row, sum_row) in src
            .chunks_exact(stride)
            .zip(self.row_sums.chunks_exact_mut(stride))
        {
            let mut acc = [0u64; CHANNELS];
            for &(x, weight) in &start {
                for c in 0..CHANNELS {
                    acc[c] += weight * u64::from(src_row[x * CHANNELS + c]);
                }
            }
            sum_row[..CHANNELS].copy_from_slice(&acc);

            for (x, &(enter, exit)) in self.steps_x.iter().enumerate() {
                let (enter, exit) = (enter * CHANNELS, exit * CHANNELS);
                let out = (x + 1) * CHANNELS;
                for c in 0..CHANNELS {
                    acc[c] += u64::from(src_row[enter + c]);
                    acc[c] -= u64::from(src_row[exit + c]);
                    sum_row[out + c] = acc[c];
                }
            }
        }
    }

    /// Moving sums of the row sums over `2 * radius_y + 1` rows, normalized
    /// once by the whole window area.
    fn vertical(&mut self, dst: &mut [u8]) {
        let stride = self.width * CHANNELS;
        let sums = &self.row_sums;
        let acc = &mut self.col_sums;

        acc.fill(0);
        for (y, weight) in initial_window(self.height, self.radius_y) {
            let row = &sums[y * stride..(y + 1) * stride];
            for (a, &s) in acc.iter_mut().zip(row) {
                *a += u128::from(weight) * u128::from(s);
            }
        }

        let half = self.area / 2;
        for (y, out_row) in dst.chunks_exact_mut(stride).enumerate() {
            for (o, &a) in out_row.iter_mut().zip(acc.iter()) {
                *o = ((a + half) / self.area) as u8;
            }
            let Some(&(enter, exit)) = self.steps_y.get(y) else {
                break;
            };
            let enter_row = &sums[enter * stride..(enter + 1) * stride];
            let exit_row = &sums[exit * stride..(exit + 1) * stride];
            for ((a, &e), &x) in acc.iter_mut().zip(enter_row).zip(exit_row) {
                *a += u128::from(e);
                *a -= u128::from(x);
            }
        }
    }
}

/// Clamped sample indices (with multiplicity) of the window centered on 0.
fn initial_window(len: usize, radius: usize) -> Vec<(usize, u64)> {
    let last = len - 1;
    let reach = radius.min(last);
    let mut window = Vec::with_capacity(reach + 2);
    window.push((0, radius as u64 + 1));
    window.extend((1..=reach).map(|i| (i, 1)));
    let past_end = radius - reach;
    if past_end > 0 {
        window.push((last, past_end as u64));
    }
    window
}

/// For positions `1..len`, the clamped index entering and leaving the window.
fn window_steps(len: usize, radius: usize) -> Vec<(usize, usize)> {
    let last = len - 1;
    (1..len)
        .map(|pos| {
            let enter = (pos + radius).min(last);
            let exit = pos.saturating_sub(radius + 1);
            (enter, exit)
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/filters/box_blur.rs"]
mod tests;
