use super::*;
use crate::{filters::filter::Target, foundation::core::Rect};

fn sample() -> PixelBuffer {
    let data = vec![
        0, 64, 128, 255, //
        10, 20, 30, 40, //
        255, 254, 1, 0, //
        99, 100, 101, 102,
    ];
    PixelBuffer::from_raw(2, 2, data).unwrap()
}

fn run(filter: &ColorMatrixFilter, px: [u8; 4]) -> [u8; 4] {
    let mut buf = PixelBuffer::filled(1, 1, px);
    filter
        .apply(&mut buf, Rect::new(0, 0, 1, 1), Target::InPlace)
        .unwrap();
    buf.pixel(0, 0).unwrap()
}

#[test]
fn identity_matrix_is_identity() {
    let mut buf = sample();
    let before = buf.clone();
    #[rustfmt::skip]
    let f = ColorMatrixFilter::new([
        1.0, 0.0, 0.0, 0.0, 0.0,
        0.0, 1.0, 0.0, 0.0, 0.0,
        0.0, 0.0, 1.0, 0.0, 0.0,
        0.0, 0.0, 0.0, 1.0, 0.0,
    ]);
    let rect = buf.rect();
    f.apply(&mut buf, rect, Target::InPlace).unwrap();
    assert_eq!(buf, before);
    assert_eq!(f, ColorMatrixFilter::default());
}

#[test]
fn rows_mix_channels_and_add_offset() {
    #[rustfmt::skip]
    let f = ColorMatrixFilter::new([
        0.0, 0.0, 1.0, 0.0, 0.0,   // r <- b
        0.5, 0.5, 0.0, 0.0, 0.0,   // g <- avg(r, g)
        0.0, 0.0, 0.0, 0.0, 42.0,  // b <- 42
        0.0, 0.0, 0.0, 1.0, -5.0,  // a <- a - 5
    ]);
    assert_eq!(run(&f, [10, 30, 200, 100]), [200, 20, 42, 95]);
}

#[test]
fn overflow_wraps_unless_clamped() {
    #[rustfmt::skip]
    let coeffs = [
        2.0, 0.0, 0.0, 0.0, 0.0,
        0.0, 1.0, 0.0, 0.0, -10.0,
        0.0, 0.0, 1.0, 0.0, 0.0,
        0.0, 0.0, 0.0, 1.0, 0.0,
    ];
    let wrap = ColorMatrixFilter::new(coeffs);
    assert_eq!(run(&wrap, [200, 0, 7, 255]), [144, 246, 7, 255]);
    let clamp = ColorMatrixFilter::new(coeffs).with_overflow(Overflow::Clamp);
    assert_eq!(run(&clamp, [200, 0, 7, 255]), [255, 0, 7, 255]);
}

#[test]
fn short_slices_complete_with_identity() {
    let f = ColorMatrixFilter::from_slice(&[0.0]);
    // only the r<-r coefficient is replaced
    assert_eq!(run(&f, [90, 80, 70, 60]), [0, 80, 70, 60]);
    let long = vec![0.0; 40];
    assert_eq!(ColorMatrix::from_slice(&long).to_array(), [0.0; 25]);
}

#[test]
fn zero_adjustments_leave_identity() {
    let cm = ColorMatrix::with_adjustments(0.0, 0.0, 0.0, 0.0);
    assert_eq!(cm, ColorMatrix::identity());
    let mut cm = ColorMatrix::identity();
    cm.adjust_brightness(f64::NAN).adjust_hue(f64::NAN);
    assert_eq!(cm, ColorMatrix::identity());
}

#[test]
fn brightness_adds_clamped_offset() {
    let mut cm = ColorMatrix::identity();
    cm.adjust_brightness(400.0);
    assert_eq!(cm[4], 255.0);
    assert_eq!(cm[9], 255.0);
    assert_eq!(cm[14], 255.0);
    assert_eq!(cm[19], 0.0);
    let f = ColorMatrixFilter::from_matrix(ColorMatrix::identity().adjust_brightness(20.0));
    assert_eq!(run(&f, [10, 20, 30, 40]), [30, 40, 50, 40]);
}

#[test]
fn contrast_uses_delta_table() {
    let mut cm = ColorMatrix::identity();
    cm.adjust_contrast(50.0);
    // delta 1.0 -> x = 254, scale 2, offset -63.5
    assert!((cm[0] - 2.0).abs() < 1e-12);
    assert!((cm[4] + 63.5).abs() < 1e-12);

    let mut low = ColorMatrix::identity();
    low.adjust_contrast(-100.0);
    assert_eq!(low[0], 0.0);
    assert_eq!(low[4], 63.5);
}

#[test]
fn full_desaturation_makes_gray() {
    let f = ColorMatrixFilter::from_matrix(ColorMatrix::identity().adjust_saturation(-100.0))
        .with_overflow(Overflow::Clamp);
    let [r, g, b, a] = run(&f, [200, 50, 10, 255]);
    assert_eq!(r, g);
    assert_eq!(g, b);
    assert_eq!(a, 255);
}

#[test]
fn hue_rotation_keeps_gray_gray() {
    let f = ColorMatrixFilter::from_matrix(ColorMatrix::identity().adjust_hue(90.0))
        .with_overflow(Overflow::Clamp);
    assert_eq!(run(&f, [128, 128, 128, 255]), [128, 128, 128, 255]);
}

#[test]
fn concat_and_reset() {
    let mut a = ColorMatrix::identity();
    a.adjust_brightness(10.0);
    let mut b = ColorMatrix::identity();
    b.adjust_brightness(5.0);
    a.concat(&b);
    assert_eq!(a[4], 15.0);
    a.reset();
    assert_eq!(a, ColorMatrix::default());
}
