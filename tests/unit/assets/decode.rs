use std::io::Cursor;

use super::*;

fn encode_png(buf: &PixelBuffer) -> Vec<u8> {
    let img = image::RgbaImage::from(buf.clone());
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    bytes
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("unit_assets").join(name);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn decode_png_bytes_keeps_straight_rgba() {
    let mut buf = PixelBuffer::filled(3, 2, [10, 20, 30, 40]);
    buf.set_pixel(2, 1, [255, 0, 128, 0]);
    let decoded = decode_image(&encode_png(&buf)).unwrap();
    assert_eq!(decoded, buf);
}

#[test]
fn decode_rejects_garbage() {
    let err = decode_image(b"definitely not an image").unwrap_err();
    assert!(matches!(err, FilterError::Other(_)));
}

#[test]
fn save_then_load_roundtrips() {
    let path = scratch_dir("roundtrip").join("nested").join("img.png");
    let buf = PixelBuffer::filled(4, 1, [1, 2, 3, 4]);
    save_png(&path, &buf).unwrap();
    assert_eq!(load_image(&path).unwrap(), buf);
}

#[test]
fn file_source_decodes_lazily_and_maps_errors() {
    let dir = scratch_dir("file_source");
    let path = dir.join("map.png");
    let src = ImageFileSource::new(&path);
    assert_eq!(src.path(), path.as_path());

    let _ = std::fs::remove_file(&path);
    assert!(matches!(src.decode(), Err(FilterError::BufferAccess(_))));

    let buf = PixelBuffer::filled(2, 2, [9, 8, 7, 6]);
    save_png(&path, &buf).unwrap();
    assert_eq!(src.decode().unwrap(), buf);
}
