use std::hash::{Hash, Hasher};

use crate::{
    document::{Element, token::TokenWriter},
    foundation::error::DocumentResult,
};

/// Ordered sequence of elements.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Array {
    items: Vec<Element>,
}

impl Array {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: impl Into<Element>) {
        self.items.push(value.into());
    }

    pub fn get(&self, index: usize) -> Option<&Element> {
        self.items.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Element> {
        self.items.get_mut(index)
    }

    /// Detach the element at `index`, shifting later elements down.
    pub fn remove(&mut self, index: usize) -> Option<Element> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Element> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Element> {
        self.items.iter_mut()
    }

    pub fn deep_copy(&self) -> Array {
        self.clone()
    }

    pub(crate) fn single(&self) -> Option<&Element> {
        match self.items.as_slice() {
            [only] => Some(only),
            _ => None,
        }
    }

    pub(crate) fn write<W: TokenWriter + ?Sized>(&self, writer: &mut W) -> DocumentResult<()> {
        writer.begin_array()?;
        for item in &self.items {
            item.write(writer)?;
        }
        writer.end_array()
    }
}

impl Hash for Array {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.items.len().hash(state);
        for item in &self.items {
            item.hash(state);
        }
    }
}

impl FromIterator<Element> for Array {
    fn from_iter<I: IntoIterator<Item = Element>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Array {
    type Item = Element;
    type IntoIter = std::vec::IntoIter<Element>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a Array {
    type Item = &'a Element;
    type IntoIter = std::slice::Iter<'a, Element>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
