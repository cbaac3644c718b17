use std::io::Cursor;

use super::*;

#[test]
fn decode_image_png_dimensions_and_premul() {
    let src_rgba = vec![100u8, 50u8, 200u8, 128u8];
    let img = image::RgbaImage::from_raw(1, 1, src_rgba).unwrap();

    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();

    let prepared = decode_image(&buf).unwrap();
    assert_eq!(prepared.width, 1);
    assert_eq!(prepared.height, 1);
    assert_eq!(
        prepared.rgba8_premul.as_slice(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn decode_image_rejects_non_image_payload() {
    let err = decode_image(b"<html>not found</html>").unwrap_err();
    assert!(err.to_string().contains("decode image"));
}

#[test]
fn unpremultiply_restores_straight_alpha_within_rounding() {
    let mut px = [
        ((100u16 * 128 + 127) / 255) as u8,
        ((50u16 * 128 + 127) / 255) as u8,
        ((200u16 * 128 + 127) / 255) as u8,
        128u8,
        7,
        8,
        9,
        0,
    ];
    unpremultiply_rgba8_in_place(&mut px);
    assert!((i16::from(px[0]) - 100).abs() <= 1);
    assert!((i16::from(px[1]) - 50).abs() <= 1);
    assert!((i16::from(px[2]) - 200).abs() <= 1);
    assert_eq!(px[3], 128);
    assert_eq!(&px[4..], &[7, 8, 9, 0]);
}
