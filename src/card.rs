use std::path::Path;

use anyhow::Context;

use crate::{
    document::{Element, Object},
    foundation::error::{CardError, CardResult, DocumentError, DocumentResult},
};

/// One card's data, read by layer renderers.
///
/// Renderers only get `&RenderableCard`, so the lookups here never auto-create anything.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderableCard {
    data: Object,
}

impl RenderableCard {
    pub fn new(data: Object) -> Self {
        Self { data }
    }

    pub fn data(&self) -> &Object {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut Object {
        &mut self.data
    }

    pub fn into_data(self) -> Object {
        self.data
    }

    /// Display name for diagnostics: the `name` string when present.
    pub fn name(&self) -> &str {
        self.data
            .get(&["name"])
            .and_then(Element::as_str)
            .unwrap_or("<unnamed>")
    }

    /// File-name friendly form of [`Self::name`]: lowercase ASCII alphanumerics joined by `-`.
    pub fn slug(&self) -> String {
        let mut slug = String::new();
        for c in self.name().chars() {
            if c.is_ascii_alphanumeric() {
                slug.push(c.to_ascii_lowercase());
            } else if !slug.is_empty() && !slug.ends_with('-') {
                slug.push('-');
            }
        }
        let trimmed = slug.trim_end_matches('-');
        if trimmed.is_empty() {
            "card".to_owned()
        } else {
            trimmed.to_owned()
        }
    }

    pub fn has(&self, path: &[&str]) -> bool {
        self.data.has(path)
    }

    pub fn get(&self, path: &[&str]) -> Option<&Element> {
        self.data.get(path)
    }

    /// Text at `path` (numbers and booleans are rendered), without creating anything.
    pub fn get_as_string(&self, path: &[&str]) -> DocumentResult<String> {
        let element = self
            .data
            .get(path)
            .ok_or_else(|| DocumentError::missing(path))?;
        element
            .to_string_value()
            .ok_or_else(|| DocumentError::type_mismatch(path, "string", element.kind_name()))
    }

    /// Parse cards from JSON-like text holding either one card object or an array of them.
    pub fn parse_all(text: &str) -> CardResult<Vec<RenderableCard>> {
        match Element::from_json_str(text)? {
            Element::Object(o) => Ok(vec![RenderableCard::new(o)]),
            Element::Array(items) => items
                .into_iter()
                .enumerate()
                .map(|(idx, item)| match item {
                    Element::Object(o) => Ok(RenderableCard::new(o)),
                    other => Err(CardError::validation(format!(
                        "card #{idx} must be an object, found {}",
                        other.kind_name()
                    ))),
                })
                .collect(),
            other => Err(CardError::validation(format!(
                "card input must be an object or an array, found {}",
                other.kind_name()
            ))),
        }
    }

    pub fn load_all(path: &Path) -> CardResult<Vec<RenderableCard>> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read cards from '{}'", path.display()))?;
        Self::parse_all(&text)
    }
}

impl From<Object> for RenderableCard {
    fn from(data: Object) -> Self {
        Self::new(data)
    }
}

#[cfg(test)]
#[path = "../tests/unit/card.rs"]
mod tests;
