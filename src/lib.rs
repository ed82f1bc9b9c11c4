//! Composable CPU filters over raw RGBA8 pixel buffers.
//!
//! A [`PixelBuffer`] is a row-major, straight-alpha RGBA8 image. Filters read
//! a rectangular region of one buffer and write the transformed pixels to a
//! region of the same or another buffer:
//!
//! - [`ColorFilter`]: per-channel multiply + offset
//! - [`ColorMatrixFilter`]: 4x5 linear transform (build presets with [`ColorMatrix`])
//! - [`AlphaMapFilter`]: alpha from the red channel of a grayscale map
//! - [`AlphaMaskFilter`]: alpha limited by a mask's alpha
//! - [`BoxBlurFilter`]: iterated separable box blur with edge clamping
//!
//! [`FilterChain`] applies several filters in order and reports per-stage
//! results; [`ChainConfig`] builds a chain from JSON.
//!
//! Failures are ordinary values ([`FilterError`]). Every filter validates its
//! source and target regions before writing, so a failed filter leaves the
//! pixels as they were.
//!
//! ```
//! use pixel_filters::{BoxBlurFilter, Filter, PixelBuffer, Target};
//!
//! let mut buf = PixelBuffer::filled(4, 4, [255, 0, 0, 255]);
//! let blur = BoxBlurFilter::new(1, 1, 1);
//! let rect = buf.rect();
//! blur.apply(&mut buf, rect, Target::InPlace).unwrap();
//! assert_eq!(buf.pixel(0, 0), Some([255, 0, 0, 255]));
//! ```
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod config;
mod filters;
mod foundation;
mod pipeline;

pub use assets::decode::{ImageFileSource, decode_image, load_image, save_png};
pub use config::chain::{ChainConfig, FilterInstance, parse_filter};
pub use filters::alpha_map::AlphaMapFilter;
pub use filters::alpha_mask::AlphaMaskFilter;
pub use filters::box_blur::{BoxBlurFilter, MAX_QUALITY, MAX_RADIUS, MIN_QUALITY};
pub use filters::channel::Overflow;
pub use filters::color::ColorFilter;
pub use filters::color_matrix::{ColorMatrix, ColorMatrixFilter, FILTER_COEFFICIENTS};
pub use filters::filter::{Filter, Outcome, Target};
pub use filters::source::PixelSource;
pub use foundation::core::{A, B, CHANNELS, G, PixelBuffer, R, Rect};
pub use foundation::error::{FilterError, FilterResult};
pub use pipeline::chain::{ChainReport, ErrorPolicy, FilterChain, StageReport, StageStatus};
