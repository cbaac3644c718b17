use super::*;
use crate::{
    assets::fetch::MemoryFetcher, document::Object, foundation::core::Canvas,
    foundation::error::LayerResult, render::layer::LayerRenderer,
};
use std::{
    io::Cursor,
    sync::{Arc, Mutex},
};

fn png_bytes(width: u32, height: u32, px: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba(px));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

/// Records the `bounds` each call saw and reports a fixed rect.
struct Probe {
    rect: Rect,
    seen: Mutex<Vec<(bool, Rect)>>,
}

impl LayerRenderer for Probe {
    fn render_layer(
        &self,
        _card: &RenderableCard,
        _layer: &LayerElement,
        _surface: &mut Surface,
        _wrap: Option<Rect>,
        draw: bool,
        _scale: f64,
        bounds: Rect,
    ) -> LayerResult<Option<Rect>> {
        self.seen.lock().unwrap().push((draw, bounds));
        Ok(Some(self.rect))
    }
}

fn art_registry() -> LayerRegistry {
    let mut fetcher = MemoryFetcher::new();
    fetcher.insert("mem://a.png", png_bytes(2, 2, [0, 0, 255, 255]));
    LayerRegistry::with_defaults(Arc::new(fetcher))
}

fn card(name: &str, art: &str) -> RenderableCard {
    let mut data = Object::new();
    data.add("name", name);
    data.add_path(&["image_uris", "art_crop"], art).unwrap();
    RenderableCard::new(data)
}

fn template(layers: Vec<LayerElement>) -> Template {
    Template::new("test", Canvas::new(16, 16).unwrap(), layers)
}

#[test]
fn continues_past_failing_layers() {
    let t = template(vec![
        LayerElement::new("art").with_attribute("id", "bad"),
        LayerElement::new("frame"),
        LayerElement::new("art")
            .with_attribute("id", "good")
            .with_attribute("x", "4")
            .with_attribute("width", "4"),
    ]);
    let renderer = CardRenderer::new(t, art_registry(), RenderSettings::default()).unwrap();

    let out = renderer.render_card(&card("Opt", "mem://a.png")).unwrap();
    assert_eq!(out.name, "Opt");
    assert_eq!(out.failures.len(), 2);
    assert_eq!(out.failures[0].layer_id, "bad");
    assert!(out.failures[0].message.contains("'width' or 'height'"));
    assert_eq!(out.failures[1].tag, "frame");
    assert_eq!(out.bounds, Some(Rect::new(4.0, 0.0, 8.0, 4.0)));
    assert_eq!(out.surface.pixel(4, 0), Some([0, 0, 255, 255]));
}

#[test]
fn strict_mode_stops_at_first_failure() {
    let t = template(vec![LayerElement::new("art").with_attribute("width", "4")]);
    let settings = RenderSettings {
        strict: true,
        ..RenderSettings::default()
    };
    let renderer = CardRenderer::new(t, art_registry(), settings).unwrap();

    let err = renderer
        .render_card(&card("Opt", "mem://missing.png"))
        .unwrap_err();
    assert!(matches!(err, CardError::Render(_)));
    assert!(err.to_string().contains("Failed to create layer 'art'"));
}

#[test]
fn bounds_accumulate_across_layers() {
    let probe = Arc::new(Probe {
        rect: Rect::new(0.0, 0.0, 2.0, 2.0),
        seen: Mutex::new(Vec::new()),
    });
    let mut registry = LayerRegistry::new();
    registry.register("probe", probe.clone());
    registry.register(
        "wide",
        Arc::new(Probe {
            rect: Rect::new(1.0, 1.0, 10.0, 3.0),
            seen: Mutex::new(Vec::new()),
        }),
    );

    let t = template(vec![
        LayerElement::new("probe"),
        LayerElement::new("wide"),
        LayerElement::new("probe"),
    ]);
    let renderer = CardRenderer::new(t, registry, RenderSettings::default()).unwrap();
    let out = renderer.render_card(&RenderableCard::default()).unwrap();

    assert_eq!(out.bounds, Some(Rect::new(0.0, 0.0, 10.0, 3.0)));
    let seen = probe.seen.lock().unwrap().clone();
    assert_eq!(
        seen,
        vec![
            (false, Rect::ZERO),
            (true, Rect::ZERO),
            (false, Rect::new(0.0, 0.0, 10.0, 3.0)),
            (true, Rect::new(0.0, 0.0, 10.0, 3.0)),
        ]
    );
}

#[test]
fn clear_color_and_scale_shape_the_surface() {
    let settings = RenderSettings {
        scale: 0.5,
        clear_rgba: Some([255, 255, 255, 255]),
        ..RenderSettings::default()
    };
    let renderer = CardRenderer::new(template(Vec::new()), LayerRegistry::new(), settings).unwrap();
    let out = renderer.render_card(&RenderableCard::default()).unwrap();
    assert_eq!((out.surface.width(), out.surface.height()), (8, 8));
    assert_eq!(out.surface.pixel(0, 0), Some([255, 255, 255, 255]));
    assert_eq!(out.bounds, None);
}

#[test]
fn parallel_render_keeps_input_order() {
    let t = template(vec![LayerElement::new("art").with_attribute("width", "2")]);
    let settings = RenderSettings {
        parallel: true,
        threads: Some(2),
        ..RenderSettings::default()
    };
    let renderer = CardRenderer::new(t, art_registry(), settings).unwrap();
    let cards: Vec<_> = (0..6)
        .map(|i| card(&format!("card-{i}"), "mem://a.png"))
        .collect();

    let out = renderer.render_all(&cards).unwrap();
    let names: Vec<_> = out.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["card-0", "card-1", "card-2", "card-3", "card-4", "card-5"]
    );
    assert!(out.iter().all(|c| c.failures.is_empty()));
}

#[test]
fn rejects_invalid_settings() {
    let bad_scale = RenderSettings {
        scale: 0.0,
        ..RenderSettings::default()
    };
    assert!(CardRenderer::new(template(Vec::new()), LayerRegistry::new(), bad_scale).is_err());

    let bad_threads = RenderSettings {
        threads: Some(0),
        ..RenderSettings::default()
    };
    assert!(CardRenderer::new(template(Vec::new()), LayerRegistry::new(), bad_threads).is_err());
}
