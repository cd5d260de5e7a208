use serde::{Deserialize, Serialize};

use crate::core::math::lerp;

/// RGBA color with channels on the 8-bit scale (0.0..=255.0).
///
/// Channels are plain floats so sampled colors may overshoot the valid
/// range; only [`Rgba::lerp_clamped`] and the conversions clamp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::new(255.0, 255.0, 255.0, 255.0);
    pub const BLACK: Rgba = Rgba::new(0.0, 0.0, 0.0, 255.0);
    pub const TRANSPARENT: Rgba = Rgba::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn from_u8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::new(r as f32, g as f32, b as f32, a as f32)
    }

    /// Per-channel linear interpolation, result clamped into 0..=255.
    pub fn lerp_clamped(from: Rgba, to: Rgba, t: f32) -> Rgba {
        let ch = |a: f32, b: f32| lerp(a, b, t).clamp(0.0, 255.0);
        Rgba {
            r: ch(from.r, to.r),
            g: ch(from.g, to.g),
            b: ch(from.b, to.b),
            a: ch(from.a, to.a),
        }
    }

    /// Clamp every channel into 0..=255.
    pub fn clamped(self) -> Rgba {
        Rgba {
            r: self.r.clamp(0.0, 255.0),
            g: self.g.clamp(0.0, 255.0),
            b: self.b.clamp(0.0, 255.0),
            a: self.a.clamp(0.0, 255.0),
        }
    }

    /// Rounded 8-bit channels.
    pub fn to_u8(self) -> [u8; 4] {
        let c = self.clamped();
        [
            c.r.round() as u8,
            c.g.round() as u8,
            c.b.round() as u8,
            c.a.round() as u8,
        ]
    }

    /// Channels normalized to 0.0..=1.0 for GPU upload.
    pub fn to_normalized(self) -> [f32; 4] {
        let c = self.clamped();
        [c.r / 255.0, c.g / 255.0, c.b / 255.0, c.a / 255.0]
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::WHITE
    }
}
