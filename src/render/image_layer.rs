use crate::{
    assets::PreparedImage,
    foundation::{core::Rect, error::LayerResult},
    render::surface::Surface,
    render_error,
};

/// A decoded image placed at unscaled template coordinates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageLayer {
    pub id: String,
    pub x: i64,
    pub y: i64,
    pub image: PreparedImage,
    pub width: Option<i64>,
    pub height: Option<i64>,
    /// Locator the image was fetched from, for diagnostics.
    pub source: String,
}

impl ImageLayer {
    /// Unscaled size. A missing dimension follows the image's aspect ratio.
    pub fn size(&self) -> (i64, i64) {
        let (iw, ih) = (i64::from(self.image.width), i64::from(self.image.height));
        match (self.width, self.height) {
            (Some(w), Some(h)) => (w, h),
            (Some(w), None) => (w, aspect(w, ih, iw)),
            (None, Some(h)) => (aspect(h, iw, ih), h),
            (None, None) => (iw, ih),
        }
    }

    /// Placed rect at `scale`, or `None` when it covers no area.
    pub fn bounds(&self, scale: f64) -> Option<Rect> {
        let (w, h) = self.size();
        if w <= 0 || h <= 0 || scale.is_nan() || scale <= 0.0 {
            return None;
        }
        let (x, y) = (self.x as f64, self.y as f64);
        Some(Rect::new(
            x * scale,
            y * scale,
            (x + w as f64) * scale,
            (y + h as f64) * scale,
        ))
    }

    pub fn draw(
        &self,
        surface: &mut Surface,
        wrap: Option<Rect>,
        draw: bool,
        scale: f64,
    ) -> LayerResult<Option<Rect>> {
        let Some(rect) = self.bounds(scale) else {
            return Ok(None);
        };
        if draw {
            surface
                .draw_image(&self.image, rect, wrap)
                .map_err(|e| render_error!("Layer '{}': {e}", self.id))?;
        }
        Ok(Some(rect))
    }
}

fn aspect(known: i64, num: i64, den: i64) -> i64 {
    if den == 0 {
        return 0;
    }
    (known as f64 * num as f64 / den as f64).round() as i64
}

#[cfg(test)]
#[path = "../../tests/unit/render/image_layer.rs"]
mod tests;
