use super::*;
use std::sync::Arc;

fn layer(width: Option<i64>, height: Option<i64>) -> ImageLayer {
    ImageLayer {
        id: "art".to_owned(),
        x: 10,
        y: 20,
        image: PreparedImage {
            width: 4,
            height: 3,
            rgba8_premul: Arc::new([0u8, 0, 255, 255].repeat(12)),
        },
        width,
        height,
        source: "mem://art".to_owned(),
    }
}

#[test]
fn missing_dimension_follows_aspect_ratio() {
    assert_eq!(layer(Some(8), Some(8)).size(), (8, 8));
    assert_eq!(layer(Some(8), None).size(), (8, 6));
    assert_eq!(layer(None, Some(6)).size(), (8, 6));
    assert_eq!(layer(None, None).size(), (4, 3));
    // 5 * 3 / 4 = 3.75
    assert_eq!(layer(Some(5), None).size(), (5, 4));
}

#[test]
fn bounds_scale_origin_and_size() {
    let l = layer(Some(8), None);
    assert_eq!(l.bounds(1.0), Some(Rect::new(10.0, 20.0, 18.0, 26.0)));
    assert_eq!(l.bounds(0.5), Some(Rect::new(5.0, 10.0, 9.0, 13.0)));
    assert_eq!(l.bounds(0.0), None);
    assert_eq!(layer(Some(0), Some(5)).bounds(1.0), None);
    assert_eq!(layer(Some(-4), None).bounds(1.0), None);
}

#[test]
fn measure_leaves_surface_untouched() {
    let l = layer(Some(8), None);
    let mut surface = Surface::new(32, 32).unwrap();
    let before = surface.clone();

    let measured = l.draw(&mut surface, None, false, 1.0).unwrap();
    assert_eq!(surface, before);

    let drawn = l.draw(&mut surface, None, true, 1.0).unwrap();
    assert_eq!(measured, drawn);
    assert_eq!(surface.pixel(10, 20), Some([0, 0, 255, 255]));
    assert_eq!(surface.pixel(17, 25), Some([0, 0, 255, 255]));
    assert_eq!(surface.pixel(18, 26), Some([0, 0, 0, 0]));
}

#[test]
fn wrap_clips_drawing_but_not_the_reported_rect() {
    let l = layer(Some(8), None);
    let mut surface = Surface::new(32, 32).unwrap();
    let wrap = Rect::new(0.0, 0.0, 14.0, 32.0);

    let rect = l.draw(&mut surface, Some(wrap), true, 1.0).unwrap();
    assert_eq!(rect, l.bounds(1.0));
    assert_eq!(surface.pixel(13, 22), Some([0, 0, 255, 255]));
    assert_eq!(surface.pixel(14, 22), Some([0, 0, 0, 0]));
}

#[test]
fn zero_area_draws_nothing() {
    let l = layer(Some(0), Some(0));
    let mut surface = Surface::new(8, 8).unwrap();
    assert_eq!(l.draw(&mut surface, None, true, 1.0).unwrap(), None);
}
