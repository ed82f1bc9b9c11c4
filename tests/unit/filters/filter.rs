use super::*;

#[derive(Clone, Debug)]
struct Invert;

impl Filter for Invert {
    fn name(&self) -> &'static str {
        "Invert"
    }

    fn filter_pixels(&self, region: &mut PixelBuffer) -> FilterResult<Outcome> {
        for v in region.data_mut() {
            *v = 255 - *v;
        }
        Ok(Outcome::Applied)
    }

    fn box_clone(&self) -> Box<dyn Filter> {
        Box::new(self.clone())
    }
}

fn gradient(width: u32, height: u32) -> PixelBuffer {
    let mut buf = PixelBuffer::new(width, height);
    for y in 0..height {
        for x in 0..width {
            buf.set_pixel(x, y, [(x * 10) as u8, (y * 10) as u8, 5, 255]);
        }
    }
    buf
}

#[test]
fn default_bounds_and_describe() {
    assert!(!Invert.requires_in_place());
    assert_eq!(Invert.bounds(), Rect::ZERO);
    assert_eq!(Invert.describe(), "[Invert]");
}

#[test]
fn in_place_touches_only_region() {
    let mut buf = gradient(4, 4);
    let before = buf.clone();
    let out = Invert
        .apply(&mut buf, Rect::new(1, 1, 2, 2), Target::InPlace)
        .unwrap();
    assert_eq!(out, Outcome::Applied);
    assert_eq!(buf.pixel(0, 0), before.pixel(0, 0));
    assert_eq!(buf.pixel(3, 3), before.pixel(3, 3));
    assert_eq!(buf.pixel(1, 1), Some([245, 245, 250, 0]));
}

#[test]
fn overlapping_target_reads_source_first() {
    let mut buf = gradient(4, 1);
    let before = buf.clone();
    Invert
        .apply(&mut buf, Rect::new(0, 0, 3, 1), Target::At { x: 1, y: 0 })
        .unwrap();
    for x in 0..3 {
        let [r, g, b, a] = before.pixel(x, 0).unwrap();
        assert_eq!(buf.pixel(x + 1, 0), Some([255 - r, 255 - g, 255 - b, 255 - a]));
    }
    assert_eq!(buf.pixel(0, 0), before.pixel(0, 0));
}

#[test]
fn separate_target_buffer_receives_output() {
    let mut src = gradient(2, 2);
    let before = src.clone();
    let mut dst = PixelBuffer::new(4, 4);
    Invert
        .apply(
            &mut src,
            Rect::new(0, 0, 2, 2),
            Target::Buffer {
                buffer: &mut dst,
                x: 2,
                y: 2,
            },
        )
        .unwrap();
    assert_eq!(src, before);
    assert_eq!(dst.pixel(2, 2), Some([255, 255, 250, 0]));
    assert_eq!(dst.pixel(0, 0), Some([0, 0, 0, 0]));
}

#[test]
fn zero_area_is_unchanged_success() {
    let mut buf = gradient(3, 3);
    let before = buf.clone();
    for rect in [Rect::new(0, 0, 0, 3), Rect::new(1, 1, 2, 0)] {
        let out = Invert.apply(&mut buf, rect, Target::InPlace).unwrap();
        assert_eq!(out, Outcome::Unchanged);
    }
    assert_eq!(buf, before);
}

#[test]
fn negative_size_is_buffer_access() {
    let mut buf = gradient(3, 3);
    let err = Invert
        .apply(&mut buf, Rect::new(2, 2, -1, 1), Target::InPlace)
        .unwrap_err();
    assert!(matches!(err, FilterError::BufferAccess(_)));
}

#[test]
fn out_of_range_target_fails_before_writing() {
    let mut buf = gradient(3, 3);
    let before = buf.clone();
    let err = Invert
        .apply(&mut buf, Rect::new(0, 0, 2, 2), Target::At { x: 2, y: 0 })
        .unwrap_err();
    assert!(matches!(err, FilterError::BufferAccess(_)));
    assert_eq!(buf, before);
}

#[test]
fn boxed_filters_clone() {
    let boxed: Box<dyn Filter> = Box::new(Invert);
    let copy = boxed.clone();
    assert_eq!(copy.name(), "Invert");
}
