pub mod alpha_map;
pub mod alpha_mask;
pub mod box_blur;
pub mod channel;
pub mod color;
pub mod color_matrix;
pub mod filter;
pub mod source;
