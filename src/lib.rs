//! cardsmith renders cards by stacking template-described layers onto a canvas.
//!
//! # Pipeline overview
//!
//! 1. **Load**: a [`Template`] (canvas size plus ordered [`LayerElement`]s) and one
//!    [`RenderableCard`] per card, each backed by a path-addressable [`Object`] document.
//! 2. **Measure**: every layer reports the rect it would consume without touching pixels.
//! 3. **Draw**: the same layer draws into a premultiplied RGBA8 [`Surface`].
//!
//! Layer kinds are looked up by tag in a [`LayerRegistry`]; the built-in `art` kind draws the
//! image found at `image_uris.art_crop` in the card document.
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **No panics on bad data**: layer problems come back as [`RenderError`]s and the driver keeps
//!   rendering the remaining layers.
#![forbid(unsafe_code)]

mod assets;
mod card;
pub mod document;
mod foundation;
mod render;
mod template;

pub use assets::PreparedImage;
pub use assets::decode::decode_image;
pub use assets::fetch::{ImageFetcher, MemoryFetcher, ResourceFetcher};
pub use card::RenderableCard;
pub use document::{Array, Element, Object, Primitive};
pub use foundation::core::{
    Canvas, Point, Rect, Rgba8Premul, Size, Vec2, accumulate_bounds, decode_int,
};
pub use foundation::error::{
    CardError, CardResult, DocumentError, DocumentResult, LayerResult, RenderError, join_path,
};
pub use render::art::ArtLayerRenderer;
pub use render::image_layer::ImageLayer;
pub use render::layer::{LayerRegistry, LayerRenderer};
pub use render::pipeline::{CardRenderer, LayerFailure, RenderSettings, RenderedCard};
pub use render::surface::{PremulRgba8, Surface, over};
pub use template::{LayerElement, Template};
