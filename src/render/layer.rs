use std::{collections::HashMap, fmt, sync::Arc};

use crate::{
    assets::fetch::ImageFetcher,
    card::RenderableCard,
    foundation::{core::Rect, error::LayerResult},
    render::{art::ArtLayerRenderer, surface::Surface},
    template::LayerElement,
};

/// One layer kind. Implementations are stateless with respect to a single render call.
pub trait LayerRenderer: Send + Sync {
    /// Measure (`draw == false`) or draw (`draw == true`) `layer` for `card`.
    ///
    /// Both passes return the same rect for the same inputs. The measure pass must leave
    /// `surface` untouched. `Ok(None)` means the layer consumed no space; recoverable problems
    /// (bad attributes, unreachable resources) come back as `Err` naming the layer.
    ///
    /// `bounds` is the union of the rects consumed by the layers rendered before this one.
    #[allow(clippy::too_many_arguments)]
    fn render_layer(
        &self,
        card: &RenderableCard,
        layer: &LayerElement,
        surface: &mut Surface,
        wrap: Option<Rect>,
        draw: bool,
        scale: f64,
        bounds: Rect,
    ) -> LayerResult<Option<Rect>>;
}

/// Tag name to renderer dispatch table.
#[derive(Clone, Default)]
pub struct LayerRegistry {
    renderers: HashMap<String, Arc<dyn LayerRenderer>>,
}

impl LayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in layer kinds.
    pub fn with_defaults(fetcher: Arc<dyn ImageFetcher>) -> Self {
        let mut registry = Self::new();
        registry.register(ArtLayerRenderer::TAG, Arc::new(ArtLayerRenderer::new(fetcher)));
        registry
    }

    /// Register `renderer` for `tag`, returning the renderer it replaced.
    pub fn register(
        &mut self,
        tag: impl Into<String>,
        renderer: Arc<dyn LayerRenderer>,
    ) -> Option<Arc<dyn LayerRenderer>> {
        self.renderers.insert(tag.into(), renderer)
    }

    pub fn get(&self, tag: &str) -> Option<&Arc<dyn LayerRenderer>> {
        self.renderers.get(tag)
    }

    /// Registered tags, sorted.
    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.renderers.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }
}

impl fmt::Debug for LayerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayerRegistry")
            .field("tags", &self.tags())
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/layer.rs"]
mod tests;
