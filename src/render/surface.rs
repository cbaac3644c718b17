use std::path::Path;

use anyhow::Context;
use image::{ImageBuffer, Rgba, imageops::FilterType};

use crate::{
    assets::{PreparedImage, decode::unpremultiply_rgba8_in_place},
    foundation::{
        core::{Rect, Rgba8Premul},
        error::{CardError, CardResult},
    },
};

pub type PremulRgba8 = [u8; 4];

/// Largest destination, in pixels, that [`Surface::draw_image`] resizes in one piece.
pub const MAX_RESAMPLE_PIXELS: u64 = 1 << 24;

/// Premultiplied RGBA8 drawing target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Surface {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Surface {
    /// Transparent surface.
    pub fn new(width: u32, height: u32) -> CardResult<Self> {
        Self::filled(width, height, Rgba8Premul::transparent())
    }

    pub fn filled(width: u32, height: u32, color: Rgba8Premul) -> CardResult<Self> {
        if width == 0 || height == 0 {
            return Err(CardError::validation("surface width and height must be > 0"));
        }
        let len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|px| px.checked_mul(4))
            .ok_or_else(|| CardError::validation("surface dimensions overflow"))?;
        let mut data = vec![0u8; len];
        if color != Rgba8Premul::transparent() {
            let px = color.to_array();
            for chunk in data.chunks_exact_mut(4) {
                chunk.copy_from_slice(&px);
            }
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw premultiplied pixels, row-major.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height))
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<PremulRgba8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    /// Resample `image` into `dest` and composite it source-over.
    ///
    /// Only pixels inside the surface and, when given, inside `clip` are touched. Destinations
    /// larger than [`MAX_RESAMPLE_PIXELS`] are sampled bilinearly per visible pixel instead of
    /// being resized as a whole.
    pub fn draw_image(
        &mut self,
        image: &PreparedImage,
        dest: Rect,
        clip: Option<Rect>,
    ) -> CardResult<()> {
        let dest_w = dest.width().round();
        let dest_h = dest.height().round();
        if dest_w < 1.0 || dest_h < 1.0 || image.width == 0 || image.height == 0 {
            return Ok(());
        }

        let origin_x = dest.x0.round();
        let origin_y = dest.y0.round();
        let mut region = self
            .bounds()
            .intersect(Rect::new(origin_x, origin_y, origin_x + dest_w, origin_y + dest_h));
        if let Some(clip) = clip {
            region = region.intersect(clip);
        }
        let (x0, x1) = (region.x0.round() as i64, region.x1.round() as i64);
        let (y0, y1) = (region.y0.round() as i64, region.y1.round() as i64);
        if x0 >= x1 || y0 >= y1 {
            return Ok(());
        }

        let src = ImageBuffer::<Rgba<u8>, &[u8]>::from_raw(
            image.width,
            image.height,
            image.rgba8_premul.as_slice(),
        )
        .ok_or_else(|| {
            CardError::validation(format!(
                "image buffer does not match {}x{}",
                image.width, image.height
            ))
        })?;
        let scaled = (dest_w * dest_h <= MAX_RESAMPLE_PIXELS as f64).then(|| {
            image::imageops::resize(&src, dest_w as u32, dest_h as u32, FilterType::Triangle)
        });

        let (ox, oy) = (origin_x as i64, origin_y as i64);
        let (sx, sy) = (f64::from(image.width) / dest_w, f64::from(image.height) / dest_h);
        let stride = self.width as usize;

        for y in y0..y1 {
            for x in x0..x1 {
                let (dx, dy) = (x - ox, y - oy);
                let s = match &scaled {
                    Some(scaled) => scaled.get_pixel(dx as u32, dy as u32).0,
                    None => sample_bilinear(
                        &src,
                        (dx as f64 + 0.5) * sx - 0.5,
                        (dy as f64 + 0.5) * sy - 0.5,
                    ),
                };
                let i = ((y as usize) * stride + (x as usize)) * 4;
                let out = over(
                    [
                        self.data[i],
                        self.data[i + 1],
                        self.data[i + 2],
                        self.data[i + 3],
                    ],
                    s,
                );
                self.data[i..i + 4].copy_from_slice(&out);
            }
        }
        Ok(())
    }

    /// Straight-alpha copy suitable for encoders.
    pub fn to_rgba_image(&self) -> CardResult<image::RgbaImage> {
        let mut straight = self.data.clone();
        unpremultiply_rgba8_in_place(&mut straight);
        image::RgbaImage::from_raw(self.width, self.height, straight)
            .ok_or_else(|| CardError::validation("surface buffer does not match its dimensions"))
    }

    pub fn save_png(&self, path: &Path) -> CardResult<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))?;
        }
        self.to_rgba_image()?
            .save_with_format(path, image::ImageFormat::Png)
            .with_context(|| format!("write png '{}'", path.display()))?;
        Ok(())
    }
}

/// Premultiplied source-over.
pub fn over(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    if src[3] == 0 {
        return dst;
    }
    if src[3] == 255 {
        return src;
    }

    let inv = 255u16 - u16::from(src[3]);
    let mut out = [0u8; 4];
    for i in 0..4 {
        out[i] = add_sat_u8(src[i], mul_div255(u16::from(dst[i]), inv));
    }
    out
}

/// Bilinear read at source coordinates `(u, v)`, clamped to the image edges.
fn sample_bilinear(src: &ImageBuffer<Rgba<u8>, &[u8]>, u: f64, v: f64) -> PremulRgba8 {
    let (max_x, max_y) = (src.width() - 1, src.height() - 1);
    let u = u.clamp(0.0, f64::from(max_x));
    let v = v.clamp(0.0, f64::from(max_y));
    let (x0, y0) = (u.floor() as u32, v.floor() as u32);
    let (x1, y1) = ((x0 + 1).min(max_x), (y0 + 1).min(max_y));
    let (fx, fy) = (u - u.floor(), v - v.floor());

    let (a, b) = (src.get_pixel(x0, y0).0, src.get_pixel(x1, y0).0);
    let (c, d) = (src.get_pixel(x0, y1).0, src.get_pixel(x1, y1).0);
    let mut out = [0u8; 4];
    for i in 0..4 {
        let top = f64::from(a[i]) * (1.0 - fx) + f64::from(b[i]) * fx;
        let bottom = f64::from(c[i]) * (1.0 - fx) + f64::from(d[i]) * fx;
        out[i] = (top * (1.0 - fy) + bottom * fy).round() as u8;
    }
    out
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

fn add_sat_u8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
