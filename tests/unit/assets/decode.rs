use std::io::Cursor;

use super::*;

#[test]
fn png_decodes_to_premultiplied_pixels() {
    let src = image::RgbaImage::from_raw(1, 1, vec![100u8, 50, 200, 128]).unwrap();
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(src)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();

    let img = decode_image(&buf).unwrap();
    assert_eq!((img.width(), img.height()), (1, 1));
    assert_eq!(
        img.rgba8_premul(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn corrupt_bytes_fail_to_decode() {
    assert!(decode_image(b"not an image").is_err());
}

#[test]
fn svg_parse_ok_and_err() {
    parse_svg(br#"<svg xmlns="http://www.w3.org/2000/svg" width="1" height="1"></svg>"#).unwrap();
    assert!(parse_svg(br#"<svg"#).is_err());
}
