use crate::foundation::error::{CardError, CardResult};

pub use kurbo::{Point, Rect, Size, Vec2};

/// Unscaled template canvas in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> CardResult<Self> {
        if width == 0 || height == 0 {
            return Err(CardError::validation("Canvas width and height must be > 0"));
        }
        Ok(Self { width, height })
    }

    /// Pixel dimensions after applying a uniform `scale`, rounded and kept at least 1x1.
    pub fn scaled(self, scale: f64) -> (u32, u32) {
        fn dim(v: u32, scale: f64) -> u32 {
            ((f64::from(v) * scale).round().max(1.0)).min(f64::from(u32::MAX)) as u32
        }
        (dim(self.width, scale), dim(self.height, scale))
    }
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8Premul {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8Premul {
    pub fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        Self {
            r: premul(r, a),
            g: premul(g, a),
            b: premul(b, a),
            a,
        }
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Grow `acc` to cover `rect`. A zero-area accumulator counts as empty.
pub fn accumulate_bounds(acc: Rect, rect: Rect) -> Rect {
    if acc.area() == 0.0 {
        rect
    } else {
        acc.union(rect)
    }
}

/// Decode an integer literal: optional sign, then `0x`/`0X`/`#` hex, a leading-`0` octal, or
/// decimal.
pub fn decode_int(text: &str) -> Option<i64> {
    let text = text.trim();
    let (negative, digits) = match text.as_bytes().first()? {
        b'-' => (true, &text[1..]),
        b'+' => (false, &text[1..]),
        _ => (false, text),
    };

    let (radix, body) = if let Some(hex) = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
        .or_else(|| digits.strip_prefix('#'))
    {
        (16, hex)
    } else if digits.len() > 1 && digits.starts_with('0') {
        (8, &digits[1..])
    } else {
        (10, digits)
    };

    // Signs only allowed in front of the radix prefix.
    if body.is_empty() || body.starts_with(['-', '+']) {
        return None;
    }

    let magnitude = i64::from_str_radix(body, radix).ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
