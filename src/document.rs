//! Hierarchical, path-addressable card document.
//!
//! A document is a tree of [`Element`]s owned by their parent container. Objects keep key
//! insertion order, path getters on [`Object`] auto-create missing intermediate objects, and
//! [`token`] streams the tree to and from JSON-like text.

mod array;
mod element;
mod object;
mod serde_impl;
pub mod stream;
pub mod token;

pub use array::Array;
pub use element::{Element, Primitive};
pub use object::Object;
