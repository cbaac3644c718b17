use rayon::prelude::*;

use crate::{
    card::RenderableCard,
    foundation::{
        core::{Rect, Rgba8Premul, accumulate_bounds},
        error::{CardError, CardResult, RenderError},
    },
    render::{layer::LayerRegistry, surface::Surface},
    template::{LayerElement, Template},
};

/// Driver configuration.
#[derive(Clone, Debug)]
pub struct RenderSettings {
    /// Uniform scale applied to template coordinates.
    pub scale: f64,
    /// Straight RGBA fill applied before the first layer; transparent when unset.
    pub clear_rgba: Option<[u8; 4]>,
    /// Render independent cards on a rayon pool.
    pub parallel: bool,
    /// Worker count for the pool; rayon's default when unset.
    pub threads: Option<usize>,
    /// Fail the card on the first layer error instead of recording it.
    pub strict: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            scale: 1.0,
            clear_rgba: None,
            parallel: false,
            threads: None,
            strict: false,
        }
    }
}

/// A layer that failed while its card kept rendering.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayerFailure {
    pub layer_id: String,
    pub tag: String,
    pub message: String,
}

#[derive(Clone, Debug)]
pub struct RenderedCard {
    pub name: String,
    pub surface: Surface,
    /// Union of the rects consumed by successful layers.
    pub bounds: Option<Rect>,
    pub failures: Vec<LayerFailure>,
}

/// Renders cards against one template.
#[derive(Debug)]
pub struct CardRenderer {
    template: Template,
    registry: LayerRegistry,
    settings: RenderSettings,
}

impl CardRenderer {
    pub fn new(
        template: Template,
        registry: LayerRegistry,
        settings: RenderSettings,
    ) -> CardResult<Self> {
        if !settings.scale.is_finite() || settings.scale <= 0.0 {
            return Err(CardError::validation(format!(
                "render scale must be finite and > 0, got {}",
                settings.scale
            )));
        }
        if settings.threads == Some(0) {
            return Err(CardError::validation(
                "render 'threads' must be >= 1 when set",
            ));
        }
        Ok(Self {
            template,
            registry,
            settings,
        })
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    pub fn registry(&self) -> &LayerRegistry {
        &self.registry
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    /// Measure then draw every template layer in order onto a fresh surface.
    #[tracing::instrument(skip_all, fields(card = %card.name()))]
    pub fn render_card(&self, card: &RenderableCard) -> CardResult<RenderedCard> {
        let scale = self.settings.scale;
        let (width, height) = self.template.canvas().scaled(scale);
        let mut surface = match self.settings.clear_rgba {
            Some([r, g, b, a]) => {
                Surface::filled(width, height, Rgba8Premul::from_straight_rgba(r, g, b, a))?
            }
            None => Surface::new(width, height)?,
        };

        let mut bounds = Rect::ZERO;
        let mut failures = Vec::new();
        for layer in self.template.layers() {
            let Some(renderer) = self.registry.get(layer.tag()) else {
                let err = RenderError::new(format!(
                    "Layer '{}': no renderer registered for tag '{}'",
                    layer.id(),
                    layer.tag()
                ));
                self.record_failure(card, layer, err, &mut failures)?;
                continue;
            };

            let measured =
                renderer.render_layer(card, layer, &mut surface, None, false, scale, bounds);
            let drawn = measured.and_then(|_| {
                renderer.render_layer(card, layer, &mut surface, None, true, scale, bounds)
            });
            match drawn {
                Ok(Some(rect)) => bounds = accumulate_bounds(bounds, rect),
                Ok(None) => {}
                Err(err) => self.record_failure(card, layer, err, &mut failures)?,
            }
        }

        tracing::debug!(failures = failures.len(), "card rendered");
        Ok(RenderedCard {
            name: card.name().to_owned(),
            surface,
            bounds: (bounds.area() > 0.0).then_some(bounds),
            failures,
        })
    }

    /// Render every card, in input order.
    #[tracing::instrument(skip_all, fields(cards = cards.len(), parallel = self.settings.parallel))]
    pub fn render_all(&self, cards: &[RenderableCard]) -> CardResult<Vec<RenderedCard>> {
        if !self.settings.parallel {
            return cards.iter().map(|card| self.render_card(card)).collect();
        }

        let pool = build_thread_pool(self.settings.threads)?;
        let rendered = pool.install(|| {
            cards
                .par_iter()
                .map(|card| self.render_card(card))
                .collect::<Vec<_>>()
        });
        rendered.into_iter().collect()
    }

    fn record_failure(
        &self,
        card: &RenderableCard,
        layer: &LayerElement,
        err: RenderError,
        failures: &mut Vec<LayerFailure>,
    ) -> CardResult<()> {
        tracing::warn!(
            card = card.name(),
            layer = layer.id(),
            tag = layer.tag(),
            error = %err,
            "layer failed"
        );
        if self.settings.strict {
            return Err(err.into());
        }
        failures.push(LayerFailure {
            layer_id: layer.id().to_owned(),
            tag: layer.tag().to_owned(),
            message: err.message().to_owned(),
        });
        Ok(())
    }
}

fn build_thread_pool(threads: Option<usize>) -> CardResult<rayon::ThreadPool> {
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| CardError::validation(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
