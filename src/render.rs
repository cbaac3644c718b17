//! Layer rendering: the renderer contract, the built-in art layer, the drawing surface and the
//! per-card driver.

pub mod art;
pub mod image_layer;
pub mod layer;
pub mod pipeline;
pub mod surface;
