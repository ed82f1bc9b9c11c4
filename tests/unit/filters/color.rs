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

#[test]
fn unit_multipliers_zero_offsets_is_identity() {
    let mut buf = sample();
    let before = buf.clone();
    let f = ColorFilter::new([1.0, 1.0, 1.0, 1.0], [0.0, 0.0, 0.0, 0.0]);
    let rect = buf.rect();
    f.apply(&mut buf, rect, Target::InPlace).unwrap();
    assert_eq!(buf, before);
    assert_eq!(ColorFilter::default(), f);
}

#[test]
fn multiplies_then_offsets_per_channel() {
    let mut buf = PixelBuffer::filled(1, 1, [100, 100, 100, 100]);
    let f = ColorFilter::new([0.5, 1.0, 2.0, 1.0], [0.0, 10.0, -50.0, 0.0]);
    f.apply(&mut buf, Rect::new(0, 0, 1, 1), Target::InPlace)
        .unwrap();
    assert_eq!(buf.pixel(0, 0), Some([50, 110, 150, 100]));
}

#[test]
fn out_of_range_wraps_by_default() {
    let mut buf = PixelBuffer::filled(1, 1, [200, 10, 0, 255]);
    let f = ColorFilter::new([2.0, 1.0, 1.0, 1.0], [0.0, -20.0, 0.0, 1.0]);
    f.apply(&mut buf, Rect::new(0, 0, 1, 1), Target::InPlace)
        .unwrap();
    // 400 -> 144, -10 -> 246, 256 -> 0
    assert_eq!(buf.pixel(0, 0), Some([144, 246, 0, 0]));
}

#[test]
fn clamp_policy_saturates() {
    let mut buf = PixelBuffer::filled(1, 1, [200, 10, 0, 255]);
    let f = ColorFilter::new([2.0, 1.0, 1.0, 1.0], [0.0, -20.0, 0.0, 1.0])
        .with_overflow(Overflow::Clamp);
    f.apply(&mut buf, Rect::new(0, 0, 1, 1), Target::InPlace)
        .unwrap();
    assert_eq!(buf.pixel(0, 0), Some([255, 0, 0, 255]));
}

#[test]
fn bounds_are_zero_and_clone_is_equal() {
    let f = ColorFilter::new([0.2, 0.3, 0.4, 1.0], [1.0, 2.0, 3.0, 0.0]);
    assert_eq!(f.bounds(), Rect::ZERO);
    assert!(f.describe().starts_with("[ColorFilter"));
    let boxed = f.box_clone();
    assert_eq!(boxed.describe(), f.describe());
}
