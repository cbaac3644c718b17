use std::hash::{DefaultHasher, Hash, Hasher};

use indexmap::IndexMap;

use crate::{
    document::{Array, Element, Primitive, token::TokenWriter},
    foundation::error::{DocumentError, DocumentResult},
};

/// Ordered string-keyed mapping.
///
/// Key enumeration follows insertion order (re-adding an existing key keeps its slot).
/// Equality and hashing are structural and ignore insertion order.
///
/// Path accessors take a slice of keys. Reads through [`Object::has`] and [`Object::get`] never
/// touch the tree. The `get_as_*` getters and [`Object::add_path`] create missing intermediate
/// objects as a side effect of the call. An empty path is a caller bug and panics.
#[derive(Clone, Debug, Default)]
pub struct Object {
    members: IndexMap<String, Element>,
}

impl Object {
    pub fn new() -> Self {
        Self::default()
    }

    /// Object holding a single `key: value` pair.
    pub fn with_entry(key: &str, value: impl Into<Element>) -> Self {
        let mut out = Self::new();
        out.add(key, value);
        out
    }

    /// Insert or replace `key`. `None` values are stored as [`Element::Null`].
    pub fn add(&mut self, key: &str, value: impl Into<Element>) {
        self.members.insert(key.to_owned(), value.into());
    }

    /// Detach `key`, keeping the order of the remaining keys.
    pub fn remove(&mut self, key: &str) -> Option<Element> {
        self.members.shift_remove(key)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> Vec<String> {
        self.members.keys().cloned().collect()
    }

    /// `(key, value)` pairs in insertion order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Element)> {
        self.members.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn entries_mut(&mut self) -> impl Iterator<Item = (&str, &mut Element)> {
        self.members.iter_mut().map(|(k, v)| (k.as_str(), v))
    }

    pub fn has_key(&self, key: &str) -> bool {
        self.members.contains_key(key)
    }

    pub fn get_key(&self, key: &str) -> Option<&Element> {
        self.members.get(key)
    }

    pub fn get_key_mut(&mut self, key: &str) -> Option<&mut Element> {
        self.members.get_mut(key)
    }

    /// Same lookup as [`Object::get_key`], named for callers that treat absence as optional.
    pub fn get_if_present(&self, key: &str) -> Option<&Element> {
        self.get_key(key)
    }

    /// Value at `key`, adding the supplied one first when absent.
    pub fn get_or_insert_with(
        &mut self,
        key: &str,
        supplier: impl FnOnce() -> Element,
    ) -> &mut Element {
        self.members.entry(key.to_owned()).or_insert_with(supplier)
    }

    /// True iff every key of `path` resolves through nested objects to a present final key.
    pub fn has(&self, path: &[&str]) -> bool {
        let (parents, last) = split_path(path);
        self.walk(parents).is_some_and(|o| o.has_key(last))
    }

    /// Element at `path`, or `None` as soon as a segment is missing or not an object.
    pub fn get(&self, path: &[&str]) -> Option<&Element> {
        let (parents, last) = split_path(path);
        self.walk(parents)?.get_key(last)
    }

    pub fn get_mut(&mut self, path: &[&str]) -> Option<&mut Element> {
        let (parents, last) = split_path(path);
        let mut object = self;
        for key in parents {
            object = object.members.get_mut(*key)?.as_object_mut()?;
        }
        object.members.get_mut(last)
    }

    /// Walk `path` creating missing intermediate objects, then apply `getter` to the parent of
    /// the final key.
    pub fn get_with<'a, T>(
        &'a mut self,
        path: &[&str],
        getter: impl FnOnce(&'a mut Object, &str) -> DocumentResult<T>,
    ) -> DocumentResult<T> {
        let (parents, last) = split_path(path);
        let mut object = self;
        for (depth, key) in parents.iter().enumerate() {
            let entry = object.get_or_insert_with(key, || Element::Object(Object::new()));
            object = match entry {
                Element::Object(o) => o,
                other => {
                    return Err(DocumentError::type_mismatch(
                        &path[..=depth],
                        "object",
                        other.kind_name(),
                    ));
                }
            };
        }
        getter(object, last)
    }

    /// Object at `path`, created (with any missing parents) when absent.
    pub fn get_as_object(&mut self, path: &[&str]) -> DocumentResult<&mut Object> {
        self.get_with(path, |object, key| {
            match object.get_or_insert_with(key, || Element::Object(Object::new())) {
                Element::Object(o) => Ok(o),
                other => Err(DocumentError::type_mismatch(
                    path,
                    "object",
                    other.kind_name(),
                )),
            }
        })
    }

    /// Array at `path`, created (with any missing parents) when absent.
    pub fn get_as_array(&mut self, path: &[&str]) -> DocumentResult<&mut Array> {
        self.get_with(path, |object, key| {
            match object.get_or_insert_with(key, || Element::Array(Array::new())) {
                Element::Array(a) => Ok(a),
                other => Err(DocumentError::type_mismatch(path, "array", other.kind_name())),
            }
        })
    }

    pub fn get_as_string(&mut self, path: &[&str]) -> DocumentResult<String> {
        self.get_scalar(path, "string", Element::to_string_value)
    }

    pub fn get_as_int(&mut self, path: &[&str]) -> DocumentResult<i64> {
        self.get_scalar(path, "integer", Element::to_i64)
    }

    pub fn get_as_float(&mut self, path: &[&str]) -> DocumentResult<f64> {
        self.get_scalar(path, "number", Element::to_f64)
    }

    /// Lenient flag read: false unless the final element is the boolean `true`.
    ///
    /// Intermediate objects are still created like the other getters.
    pub fn get_as_boolean(&mut self, path: &[&str]) -> bool {
        self.get_with(path, |object, key| {
            Ok(matches!(
                object.get_key(key),
                Some(Element::Primitive(Primitive::Bool(true)))
            ))
        })
        .unwrap_or(false)
    }

    /// Write `value` at `path`, creating missing intermediate objects.
    pub fn add_path(&mut self, path: &[&str], value: impl Into<Element>) -> DocumentResult<()> {
        let value = value.into();
        self.get_with(path, |object, key| {
            object.add(key, value);
            Ok(())
        })
    }

    pub fn deep_copy(&self) -> Object {
        self.clone()
    }

    /// Recursively merge `source` into `self`.
    ///
    /// Objects present on both sides merge key by key; any other source value replaces the
    /// destination with a copy. Keys only present in `self` are kept.
    pub fn copy_all(&mut self, source: &Object) -> &mut Self {
        for (key, value) in &source.members {
            if let (Some(Element::Object(dst)), Element::Object(src)) =
                (self.members.get_mut(key), value)
            {
                dst.copy_all(src);
                continue;
            }
            self.add(key, value.deep_copy());
        }
        self
    }

    pub(crate) fn write<W: TokenWriter + ?Sized>(&self, writer: &mut W) -> DocumentResult<()> {
        writer.begin_object()?;
        for (key, value) in &self.members {
            writer.name(key)?;
            value.write(writer)?;
        }
        writer.end_object()
    }

    fn walk(&self, parents: &[&str]) -> Option<&Object> {
        let mut object = self;
        for key in parents {
            object = object.members.get(*key)?.as_object()?;
        }
        Some(object)
    }

    fn get_scalar<T>(
        &mut self,
        path: &[&str],
        expected: &'static str,
        read: impl FnOnce(&Element) -> Option<T>,
    ) -> DocumentResult<T> {
        self.get_with(path, |object, key| {
            let element = object
                .get_key(key)
                .ok_or_else(|| DocumentError::missing(path))?;
            read(element)
                .ok_or_else(|| DocumentError::type_mismatch(path, expected, element.kind_name()))
        })
    }
}

fn split_path<'p>(path: &'p [&'p str]) -> (&'p [&'p str], &'p str) {
    match path.split_last() {
        Some((last, parents)) => (parents, last),
        None => panic!("document path must have at least one key"),
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        self.members.len() == other.members.len()
            && self
                .members
                .iter()
                .all(|(k, v)| other.members.get(k) == Some(v))
    }
}

impl Eq for Object {}

impl Hash for Object {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Order-independent: combine per-entry hashes commutatively.
        let mut combined = 0u64;
        for (key, value) in &self.members {
            let mut h = DefaultHasher::new();
            key.hash(&mut h);
            value.hash(&mut h);
            combined = combined.wrapping_add(h.finish());
        }
        self.members.len().hash(state);
        combined.hash(state);
    }
}

impl TryFrom<Element> for Object {
    type Error = DocumentError;

    fn try_from(value: Element) -> Result<Self, Self::Error> {
        match value {
            Element::Object(o) => Ok(o),
            other => Err(DocumentError::TypeMismatch {
                path: String::new(),
                expected: "object",
                found: other.kind_name(),
            }),
        }
    }
}

impl TryFrom<serde_json::Value> for Object {
    type Error = DocumentError;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        Object::try_from(Element::from(value))
    }
}

impl<K: Into<String>> FromIterator<(K, Element)> for Object {
    fn from_iter<I: IntoIterator<Item = (K, Element)>>(iter: I) -> Self {
        Self {
            members: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/document/object.rs"]
mod tests;
