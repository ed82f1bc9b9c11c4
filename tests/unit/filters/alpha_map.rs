use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;
use crate::{
    filters::filter::Target,
    foundation::{core::Rect, error::FilterError},
};

#[derive(Debug, Default)]
struct CountingSource {
    decodes: AtomicUsize,
    red: u8,
}

impl PixelSource for CountingSource {
    fn decode(&self) -> FilterResult<PixelBuffer> {
        self.decodes.fetch_add(1, Ordering::SeqCst);
        Ok(PixelBuffer::filled(2, 2, [self.red, 0, 0, 255]))
    }
}

#[derive(Debug)]
struct Unreadable;

impl PixelSource for Unreadable {
    fn decode(&self) -> FilterResult<PixelBuffer> {
        Err(FilterError::Other(anyhow::anyhow!("pixels are not readable")))
    }
}

fn colored() -> PixelBuffer {
    let data = vec![
        1, 2, 3, 4, //
        5, 6, 7, 8, //
        9, 10, 11, 12, //
        13, 14, 15, 16,
    ];
    PixelBuffer::from_raw(2, 2, data).unwrap()
}

#[test]
fn red_255_map_makes_region_opaque() {
    let map = Arc::new(PixelBuffer::filled(2, 2, [255, 0, 0, 0]));
    let mut buf = colored();
    let f = AlphaMapFilter::new(map);
    f.apply(&mut buf, Rect::new(0, 0, 2, 2), Target::InPlace)
        .unwrap();
    let expected = vec![
        1, 2, 3, 255, //
        5, 6, 7, 255, //
        9, 10, 11, 255, //
        13, 14, 15, 255,
    ];
    assert_eq!(buf.data(), expected.as_slice());
    assert_eq!(f.bounds(), Rect::ZERO);
}

#[test]
fn alpha_follows_red_channel_by_offset() {
    let data = vec![
        10, 99, 99, 99, //
        20, 99, 99, 99, //
        30, 99, 99, 99, //
        40, 99, 99, 99,
    ];
    let map = Arc::new(PixelBuffer::from_raw(2, 2, data).unwrap());
    let mut buf = colored();
    AlphaMapFilter::new(map)
        .apply(&mut buf, Rect::new(0, 0, 2, 2), Target::InPlace)
        .unwrap();
    let alphas: Vec<u8> = buf.data().chunks_exact(4).map(|px| px[3]).collect();
    assert_eq!(alphas, vec![10, 20, 30, 40]);
}

#[test]
fn short_map_reads_zero_past_its_end() {
    let map = Arc::new(PixelBuffer::filled(1, 1, [200, 0, 0, 0]));
    let mut buf = colored();
    AlphaMapFilter::new(map)
        .apply(&mut buf, Rect::new(0, 0, 2, 2), Target::InPlace)
        .unwrap();
    assert_eq!(buf.pixel(0, 0), Some([1, 2, 3, 200]));
    assert_eq!(buf.pixel(1, 1), Some([13, 14, 15, 0]));
}

#[test]
fn decode_is_cached_until_map_changes() {
    let first = Arc::new(CountingSource {
        red: 50,
        ..Default::default()
    });
    let mut f = AlphaMapFilter::new(first.clone());
    assert!(!f.is_map_decoded());
    for _ in 0..3 {
        let mut buf = colored();
        f.apply(&mut buf, Rect::new(0, 0, 2, 2), Target::InPlace)
            .unwrap();
        assert_eq!(buf.pixel(1, 0), Some([5, 6, 7, 50]));
    }
    assert_eq!(first.decodes.load(Ordering::SeqCst), 1);
    assert!(f.is_map_decoded());

    // same reference keeps the cache
    f.set_map(first.clone());
    assert!(f.is_map_decoded());

    let second = Arc::new(CountingSource {
        red: 70,
        ..Default::default()
    });
    f.set_map(second.clone());
    assert!(!f.is_map_decoded());
    let mut buf = colored();
    f.apply(&mut buf, Rect::new(0, 0, 2, 2), Target::InPlace)
        .unwrap();
    assert_eq!(buf.pixel(0, 0), Some([1, 2, 3, 70]));
    assert_eq!(second.decodes.load(Ordering::SeqCst), 1);
}

#[test]
fn clone_shares_map_reference() {
    let map: Arc<dyn PixelSource> = Arc::new(PixelBuffer::filled(2, 2, [1, 0, 0, 0]));
    let f = AlphaMapFilter::new(map.clone());
    let copy = f.clone();
    assert!(Arc::ptr_eq(copy.map(), &map));
}

#[test]
fn unreadable_map_is_buffer_access_and_untouched() {
    let mut buf = colored();
    let before = buf.clone();
    let err = AlphaMapFilter::new(Arc::new(Unreadable))
        .apply(&mut buf, Rect::new(0, 0, 2, 2), Target::InPlace)
        .unwrap_err();
    assert!(matches!(err, FilterError::BufferAccess(_)));
    assert_eq!(buf, before);
}
