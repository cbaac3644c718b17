use super::*;

#[test]
fn parse_reads_canvas_and_ordered_layers() {
    let xml = r#"
        <card name="normal" width="750" height="0x41A">
            <art id="art" x="60" y="120" width="630"/>
            <text id="title"><span/></text>
            <!-- comments are skipped -->
            <art height="100"/>
        </card>
    "#;
    let t = Template::parse(xml).unwrap();
    assert_eq!(t.name(), "normal");
    assert_eq!(t.canvas(), Canvas::new(750, 1050).unwrap());

    let tags: Vec<_> = t.layers().iter().map(LayerElement::tag).collect();
    assert_eq!(tags, vec!["art", "text", "art"]);

    let art = &t.layers()[0];
    assert_eq!(art.id(), "art");
    assert!(art.has_attribute("width"));
    assert!(!art.has_attribute("height"));
    assert_eq!(art.attribute("x"), Some("60"));
    assert_eq!(
        art.attributes().map(|(k, _)| k).collect::<Vec<_>>(),
        vec!["id", "x", "y", "width"]
    );

    assert_eq!(t.layers()[1].children().len(), 1);
    assert_eq!(t.layers()[2].id(), "art");
}

#[test]
fn parse_requires_canvas_dimensions() {
    let err = Template::parse(r#"<card width="10"/>"#).unwrap_err();
    assert!(err.to_string().contains("missing 'height'"));

    let err = Template::parse(r#"<card width="ten" height="10"/>"#).unwrap_err();
    assert!(err.to_string().contains("invalid width 'ten'"));

    let err = Template::parse(r#"<card width="0" height="10"/>"#).unwrap_err();
    assert!(matches!(err, CardError::Template(_)));
}

#[test]
fn parse_rejects_malformed_xml() {
    let err = Template::parse("<card width=\"1\"").unwrap_err();
    assert!(err.to_string().contains("parse template xml"));
}

#[test]
fn builder_matches_parsed_element() {
    let built = LayerElement::new("art")
        .with_attribute("id", "a")
        .with_attribute("width", "5");
    let parsed = Template::parse(r#"<c width="1" height="1"><art id="a" width="5"/></c>"#).unwrap();
    assert_eq!(parsed.layers()[0], built);
}
