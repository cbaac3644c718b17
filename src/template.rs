//! Template descriptions: a canvas plus an ordered list of layer elements.
//!
//! Templates are XML. The root element carries the canvas `width`/`height`; each child element
//! is one layer, rendered in document order, and its tag name selects the layer renderer.
//!
//! ```xml
//! <card width="750" height="1050">
//!   <art id="art" x="60" y="120" width="630"/>
//! </card>
//! ```

use std::path::Path;

use anyhow::Context;
use indexmap::IndexMap;

use crate::foundation::{
    core::{Canvas, decode_int},
    error::{CardError, CardResult},
};

/// Read-only attribute bag describing one layer instance.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LayerElement {
    tag: String,
    attributes: IndexMap<String, String>,
    children: Vec<LayerElement>,
}

impl LayerElement {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_child(mut self, child: LayerElement) -> Self {
        self.children.push(child);
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// The `id` attribute, falling back to the tag name.
    pub fn id(&self) -> &str {
        self.attribute("id").unwrap_or(&self.tag)
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn children(&self) -> &[LayerElement] {
        &self.children
    }

    fn from_node(node: roxmltree::Node<'_, '_>) -> Self {
        Self {
            tag: node.tag_name().name().to_owned(),
            attributes: node
                .attributes()
                .map(|a| (a.name().to_owned(), a.value().to_owned()))
                .collect(),
            children: node
                .children()
                .filter(|n| n.is_element())
                .map(Self::from_node)
                .collect(),
        }
    }
}

/// Parsed template.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Template {
    name: String,
    canvas: Canvas,
    layers: Vec<LayerElement>,
}

impl Template {
    pub fn new(name: impl Into<String>, canvas: Canvas, layers: Vec<LayerElement>) -> Self {
        Self {
            name: name.into(),
            canvas,
            layers,
        }
    }

    pub fn parse(xml: &str) -> CardResult<Self> {
        let doc = roxmltree::Document::parse(xml)
            .map_err(|e| CardError::template(format!("parse template xml: {e}")))?;
        let root = doc.root_element();

        let dim = |attr: &str| -> CardResult<u32> {
            let raw = root.attribute(attr).ok_or_else(|| {
                CardError::template(format!("root element is missing '{attr}'"))
            })?;
            decode_int(raw)
                .and_then(|v| u32::try_from(v).ok())
                .ok_or_else(|| CardError::template(format!("invalid {attr} '{raw}'")))
        };
        let canvas = Canvas::new(dim("width")?, dim("height")?)
            .map_err(|e| CardError::template(e.to_string()))?;

        let name = root
            .attribute("name")
            .unwrap_or_else(|| root.tag_name().name())
            .to_owned();
        let layers = root
            .children()
            .filter(|n| n.is_element())
            .map(LayerElement::from_node)
            .collect();

        Ok(Self {
            name,
            canvas,
            layers,
        })
    }

    pub fn from_path(path: &Path) -> CardResult<Self> {
        let xml = std::fs::read_to_string(path)
            .with_context(|| format!("read template '{}'", path.display()))?;
        Self::parse(&xml)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn layers(&self) -> &[LayerElement] {
        &self.layers
    }
}

#[cfg(test)]
#[path = "../tests/unit/template.rs"]
mod tests;
