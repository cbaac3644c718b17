use super::*;
use std::sync::Arc;

fn solid(width: u32, height: u32, px: [u8; 4]) -> PreparedImage {
    PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(px.repeat((width * height) as usize)),
    }
}

#[test]
fn over_basic_cases() {
    let dst = [10, 20, 30, 255];
    assert_eq!(over(dst, [0, 0, 0, 0]), dst);
    assert_eq!(over(dst, [1, 2, 3, 255]), [1, 2, 3, 255]);

    let out = over([0, 0, 255, 255], [128, 0, 0, 128]);
    assert_eq!(out, [128, 0, 127, 255]);
}

#[test]
fn new_surface_is_transparent_and_rejects_empty() {
    let s = Surface::new(3, 2).unwrap();
    assert_eq!(s.data().len(), 3 * 2 * 4);
    assert!(s.data().iter().all(|b| *b == 0));
    assert_eq!(s.bounds(), Rect::new(0.0, 0.0, 3.0, 2.0));
    assert!(Surface::new(0, 2).is_err());
}

#[test]
fn draw_image_scales_into_dest() {
    let mut s = Surface::new(8, 8).unwrap();
    let img = solid(2, 2, [255, 0, 0, 255]);
    s.draw_image(&img, Rect::new(2.0, 2.0, 6.0, 6.0), None).unwrap();

    assert_eq!(s.pixel(2, 2), Some([255, 0, 0, 255]));
    assert_eq!(s.pixel(5, 5), Some([255, 0, 0, 255]));
    assert_eq!(s.pixel(1, 1), Some([0, 0, 0, 0]));
    assert_eq!(s.pixel(6, 6), Some([0, 0, 0, 0]));
}

#[test]
fn draw_image_respects_clip_and_surface_edges() {
    let mut s = Surface::new(4, 4).unwrap();
    let img = solid(1, 1, [0, 255, 0, 255]);
    s.draw_image(
        &img,
        Rect::new(-2.0, -2.0, 10.0, 10.0),
        Some(Rect::new(0.0, 0.0, 2.0, 4.0)),
    )
    .unwrap();

    assert_eq!(s.pixel(0, 0), Some([0, 255, 0, 255]));
    assert_eq!(s.pixel(1, 3), Some([0, 255, 0, 255]));
    assert_eq!(s.pixel(2, 0), Some([0, 0, 0, 0]));
    assert_eq!(s.pixel(3, 3), Some([0, 0, 0, 0]));
}

#[test]
fn degenerate_dest_draws_nothing() {
    let mut s = Surface::new(4, 4).unwrap();
    let before = s.clone();
    let img = solid(1, 1, [255, 255, 255, 255]);
    s.draw_image(&img, Rect::new(1.0, 1.0, 1.2, 3.0), None).unwrap();
    assert_eq!(s, before);
}

#[test]
fn offscreen_dest_draws_nothing() {
    let mut s = Surface::new(4, 4).unwrap();
    let before = s.clone();
    let img = solid(2, 2, [255, 255, 255, 255]);
    s.draw_image(&img, Rect::new(100.0, 100.0, 1.0e9, 1.0e9), None)
        .unwrap();
    s.draw_image(&img, Rect::new(-50.0, 0.0, -10.0, 4.0), None)
        .unwrap();
    s.draw_image(
        &img,
        Rect::new(0.0, 0.0, 4.0, 4.0),
        Some(Rect::new(8.0, 8.0, 9.0, 9.0)),
    )
    .unwrap();
    assert_eq!(s, before);
}

#[test]
fn huge_dest_samples_only_visible_pixels() {
    let mut s = Surface::new(6, 6).unwrap();
    let img = solid(3, 1, [0, 0, 255, 255]);
    let side = f64::from(i32::MAX);
    s.draw_image(&img, Rect::new(-side / 2.0, 2.0, side, side), None)
        .unwrap();

    assert_eq!(s.pixel(0, 1), Some([0, 0, 0, 0]));
    assert_eq!(s.pixel(0, 2), Some([0, 0, 255, 255]));
    assert_eq!(s.pixel(5, 5), Some([0, 0, 255, 255]));
}

#[test]
fn bilinear_sampling_interpolates_premultiplied_channels() {
    let img = PreparedImage {
        width: 2,
        height: 1,
        rgba8_premul: Arc::new(vec![0, 0, 0, 255, 200, 100, 50, 255]),
    };
    let src = ImageBuffer::<Rgba<u8>, &[u8]>::from_raw(2, 1, img.rgba8_premul.as_slice()).unwrap();
    assert_eq!(sample_bilinear(&src, -3.0, 0.0), [0, 0, 0, 255]);
    assert_eq!(sample_bilinear(&src, 0.5, 0.0), [100, 50, 25, 255]);
    assert_eq!(sample_bilinear(&src, 7.0, 9.0), [200, 100, 50, 255]);
}

#[test]
fn rgba_image_is_unpremultiplied() {
    let s = Surface::filled(1, 1, Rgba8Premul::from_straight_rgba(255, 0, 0, 128)).unwrap();
    let img = s.to_rgba_image().unwrap();
    assert_eq!(img.get_pixel(0, 0).0, [255, 0, 0, 128]);
}
