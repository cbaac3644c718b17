use std::{
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
};

use serde_json::Number;

use crate::{
    document::{
        Array, Object,
        stream::{expect_end_of_document, parse_element},
        token::{JsonReader, JsonWriter, TokenWriter},
    },
    foundation::error::{DocumentError, DocumentResult},
};

/// A node of the document tree.
///
/// `Null` is an explicit value and differs from an absent key.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Element {
    Object(Object),
    Array(Array),
    Primitive(Primitive),
    #[default]
    Null,
}

/// Scalar leaf. Numbers keep their literal kind (integer vs float).
#[derive(Clone, Debug, PartialEq)]
pub enum Primitive {
    Number(Number),
    String(String),
    Bool(bool),
}

impl Eq for Primitive {}

impl Hash for Primitive {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            // Number has no Hash impl; its canonical text is stable and agrees with PartialEq.
            Primitive::Number(n) => n.to_string().hash(state),
            Primitive::String(s) => s.hash(state),
            Primitive::Bool(b) => b.hash(state),
        }
    }
}

impl Hash for Element {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Element::Object(o) => o.hash(state),
            Element::Array(a) => a.hash(state),
            Element::Primitive(p) => p.hash(state),
            Element::Null => {}
        }
    }
}

impl Element {
    pub fn is_object(&self) -> bool {
        matches!(self, Element::Object(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Element::Array(_))
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, Element::Primitive(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Element::Null)
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Element::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut Object> {
        match self {
            Element::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Element::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_array_mut(&mut self) -> Option<&mut Array> {
        match self {
            Element::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_primitive(&self) -> Option<&Primitive> {
        match self {
            Element::Primitive(p) => Some(p),
            _ => None,
        }
    }

    /// Borrow a string primitive without coercion.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Element::Primitive(Primitive::String(s)) => Some(s),
            _ => None,
        }
    }

    /// Kind name used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Element::Object(_) => "object",
            Element::Array(_) => "array",
            Element::Primitive(Primitive::Number(_)) => "number",
            Element::Primitive(Primitive::String(_)) => "string",
            Element::Primitive(Primitive::Bool(_)) => "boolean",
            Element::Null => "null",
        }
    }

    /// Read as text. Numbers and booleans render to their literal form; a one-element array
    /// reads as its only element.
    pub fn to_string_value(&self) -> Option<String> {
        match self {
            Element::Primitive(Primitive::String(s)) => Some(s.clone()),
            Element::Primitive(Primitive::Number(n)) => Some(n.to_string()),
            Element::Primitive(Primitive::Bool(b)) => Some(b.to_string()),
            Element::Array(a) => a.single().and_then(Element::to_string_value),
            _ => None,
        }
    }

    /// Read as an integer. Floats truncate toward zero; strings must hold a decimal integer.
    pub fn to_i64(&self) -> Option<i64> {
        match self {
            Element::Primitive(Primitive::Number(n)) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
            Element::Primitive(Primitive::String(s)) => s.trim().parse().ok(),
            Element::Array(a) => a.single().and_then(Element::to_i64),
            _ => None,
        }
    }

    pub fn to_f64(&self) -> Option<f64> {
        match self {
            Element::Primitive(Primitive::Number(n)) => n.as_f64(),
            Element::Primitive(Primitive::String(s)) => s.trim().parse().ok(),
            Element::Array(a) => a.single().and_then(Element::to_f64),
            _ => None,
        }
    }

    /// Read as a boolean. Any string other than a case-insensitive `"true"` reads as false.
    pub fn to_bool(&self) -> Option<bool> {
        match self {
            Element::Primitive(Primitive::Bool(b)) => Some(*b),
            Element::Primitive(Primitive::String(s)) => Some(s.eq_ignore_ascii_case("true")),
            Element::Array(a) => a.single().and_then(Element::to_bool),
            _ => None,
        }
    }

    /// Fully independent copy of this subtree.
    pub fn deep_copy(&self) -> Element {
        self.clone()
    }

    /// Stream this subtree depth-first into `writer`.
    pub fn write<W: TokenWriter + ?Sized>(&self, writer: &mut W) -> DocumentResult<()> {
        match self {
            Element::Object(o) => o.write(writer),
            Element::Array(a) => a.write(writer),
            Element::Primitive(Primitive::Number(n)) => writer.number(n),
            Element::Primitive(Primitive::String(s)) => writer.string(s),
            Element::Primitive(Primitive::Bool(b)) => writer.bool(*b),
            Element::Null => writer.null(),
        }
    }

    /// Parse a complete document from JSON-like text.
    pub fn from_json_str(text: &str) -> DocumentResult<Element> {
        let mut reader = JsonReader::new(text);
        let element = parse_element(&mut reader)?;
        expect_end_of_document(&mut reader)?;
        Ok(element)
    }

    /// Serialize to JSON text, indented with two spaces when `pretty`.
    pub fn to_json_string(&self, pretty: bool) -> DocumentResult<String> {
        if pretty {
            let mut writer = JsonWriter::pretty("  ");
            self.write(&mut writer)?;
            writer.finish()
        } else {
            let mut writer = JsonWriter::compact();
            self.write(&mut writer)?;
            writer.finish()
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.to_json_string(false).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

impl FromStr for Element {
    type Err = DocumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Element::from_json_str(s)
    }
}

impl From<Object> for Element {
    fn from(v: Object) -> Self {
        Element::Object(v)
    }
}

impl From<Array> for Element {
    fn from(v: Array) -> Self {
        Element::Array(v)
    }
}

impl From<Primitive> for Element {
    fn from(v: Primitive) -> Self {
        Element::Primitive(v)
    }
}

impl From<&str> for Element {
    fn from(v: &str) -> Self {
        Element::Primitive(Primitive::String(v.to_owned()))
    }
}

impl From<String> for Element {
    fn from(v: String) -> Self {
        Element::Primitive(Primitive::String(v))
    }
}

impl From<bool> for Element {
    fn from(v: bool) -> Self {
        Element::Primitive(Primitive::Bool(v))
    }
}

impl From<Number> for Element {
    fn from(v: Number) -> Self {
        Element::Primitive(Primitive::Number(v))
    }
}

macro_rules! element_from_int {
    ($($t:ty),*) => {
        $(impl From<$t> for Element {
            fn from(v: $t) -> Self {
                Element::Primitive(Primitive::Number(Number::from(v)))
            }
        })*
    };
}

element_from_int!(i32, i64, u32, u64, usize);

impl From<f64> for Element {
    /// Non-finite floats have no literal form and become `Null`.
    fn from(v: f64) -> Self {
        Number::from_f64(v).map_or(Element::Null, Element::from)
    }
}

impl From<f32> for Element {
    fn from(v: f32) -> Self {
        Element::from(f64::from(v))
    }
}

impl<T: Into<Element>> From<Option<T>> for Element {
    fn from(v: Option<T>) -> Self {
        v.map_or(Element::Null, Into::into)
    }
}

impl From<serde_json::Value> for Element {
    fn from(v: serde_json::Value) -> Self {
        use serde_json::Value;
        match v {
            Value::Null => Element::Null,
            Value::Bool(b) => Element::from(b),
            Value::Number(n) => Element::from(n),
            Value::String(s) => Element::from(s),
            Value::Array(items) => Element::Array(items.into_iter().map(Element::from).collect()),
            Value::Object(map) => {
                let mut object = Object::new();
                for (key, value) in map {
                    object.add(&key, Element::from(value));
                }
                Element::Object(object)
            }
        }
    }
}

impl From<&Element> for serde_json::Value {
    fn from(v: &Element) -> Self {
        use serde_json::Value;
        match v {
            Element::Null => Value::Null,
            Element::Primitive(Primitive::Bool(b)) => Value::Bool(*b),
            Element::Primitive(Primitive::Number(n)) => Value::Number(n.clone()),
            Element::Primitive(Primitive::String(s)) => Value::String(s.clone()),
            Element::Array(a) => Value::Array(a.iter().map(Value::from).collect()),
            Element::Object(o) => Value::Object(
                o.entries()
                    .map(|(k, v)| (k.to_owned(), Value::from(v)))
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/document/element.rs"]
mod tests;
