use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        CardError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        CardError::template("x")
            .to_string()
            .contains("template error:")
    );
    assert!(
        CardError::from(DocumentError::missing(&["a", "b"]))
            .to_string()
            .contains("document error: no value at 'a.b'")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = CardError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn render_error_macro_formats_arguments() {
    let err = render_error!("Failed to create layer '{}': {}", "art", "404");
    assert_eq!(err.message(), "Failed to create layer 'art': 404");
    assert_eq!(err.to_string(), err.message());
}

#[test]
fn type_mismatch_names_path_and_kinds() {
    let err = DocumentError::type_mismatch(&["image_uris", "art_crop"], "string", "object");
    assert_eq!(
        err.to_string(),
        "expected string at 'image_uris.art_crop', found object"
    );
}
