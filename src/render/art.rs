use std::{fmt, sync::Arc};

use crate::{
    assets::{decode::decode_image, fetch::ImageFetcher},
    card::RenderableCard,
    foundation::{
        core::{Rect, decode_int},
        error::{CardError, LayerResult},
    },
    render::{image_layer::ImageLayer, layer::LayerRenderer, surface::Surface},
    render_error,
    template::LayerElement,
};

/// Draws the card's art crop image.
pub struct ArtLayerRenderer {
    fetcher: Arc<dyn ImageFetcher>,
}

impl ArtLayerRenderer {
    pub const TAG: &'static str = "art";

    /// Card document path holding the art locator.
    pub const ART_PATH: [&'static str; 2] = ["image_uris", "art_crop"];

    pub fn new(fetcher: Arc<dyn ImageFetcher>) -> Self {
        Self { fetcher }
    }

    /// Validate `layer`, then fetch and decode the card's art.
    pub fn create_layer(
        &self,
        card: &RenderableCard,
        layer: &LayerElement,
    ) -> LayerResult<ImageLayer> {
        let id = layer.id();
        if !layer.has_attribute("width") && !layer.has_attribute("height") {
            return Err(render_error!(
                "Layer '{id}': Image layer must have either 'width' or 'height' attribute"
            ));
        }

        let x = int_attribute(layer, "x")?.unwrap_or(0);
        let y = int_attribute(layer, "y")?.unwrap_or(0);
        let width = int_attribute(layer, "width")?;
        let height = int_attribute(layer, "height")?;

        let source = card.get_as_string(&Self::ART_PATH).map_err(|e| {
            render_error!(
                "Layer '{id}': card '{}' has no usable '{}': {e}",
                card.name(),
                Self::ART_PATH.join(".")
            )
        })?;

        tracing::debug!(layer = id, source = %source, "loading art");
        let image = self
            .fetcher
            .fetch(&source)
            .and_then(|bytes| decode_image(&bytes))
            .map_err(|e| render_error!("Failed to create layer '{id}': {}", error_chain(&e)))?;

        Ok(ImageLayer {
            id: id.to_owned(),
            x,
            y,
            image,
            width,
            height,
            source,
        })
    }
}

impl LayerRenderer for ArtLayerRenderer {
    fn render_layer(
        &self,
        card: &RenderableCard,
        layer: &LayerElement,
        surface: &mut Surface,
        wrap: Option<Rect>,
        draw: bool,
        scale: f64,
        _bounds: Rect,
    ) -> LayerResult<Option<Rect>> {
        self.create_layer(card, layer)?
            .draw(surface, wrap, draw, scale)
    }
}

impl fmt::Debug for ArtLayerRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArtLayerRenderer").finish_non_exhaustive()
    }
}

fn int_attribute(layer: &LayerElement, name: &str) -> LayerResult<Option<i64>> {
    let Some(raw) = layer.attribute(name) else {
        return Ok(None);
    };
    decode_int(raw).map(Some).ok_or_else(|| {
        render_error!(
            "Layer '{}': invalid integer '{raw}' for attribute '{name}'",
            layer.id()
        )
    })
}

/// Render `e` with every context layer, down to the root cause.
fn error_chain(e: &CardError) -> String {
    match e {
        CardError::Other(source) => format!("{source:#}"),
        other => other.to_string(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/art.rs"]
mod tests;
