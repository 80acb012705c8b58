//! Skin color blending.

use skinsync_common::Rgb;

/// Blend `color` toward neutral gray.
///
/// Each channel becomes `c * ratio + 127.5 * (1 - ratio)`, truncated. At
/// ratio 1 the color is returned unchanged, at ratio 0 every channel is 127.
/// The product is taken in single precision and the gray offset in double
/// precision so results match the game tools bit for bit.
pub fn interpolate(color: Rgb, ratio: f32) -> Rgb {
    let add = 127.5 * f64::from(1.0 - ratio);
    color.map(|c| (f64::from(f32::from(c) * ratio) + add) as u8)
}

/// A preset color together with the ratio it is displayed at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkinColor {
    pub color: Rgb,
    pub interpolation: f32,
}

impl SkinColor {
    pub fn new(color: Rgb, interpolation: f32) -> Self {
        Self { color, interpolation }
    }

    /// Blend this color, using the stored ratio when `ratio` is `None`.
    #[inline]
    pub fn interpolate(&self, ratio: Option<f32>) -> Rgb {
        interpolate(self.color, ratio.unwrap_or(self.interpolation))
    }

    /// Exact channel equality, ignoring the ratio.
    #[inline]
    pub fn same_rgb(&self, color: Rgb) -> bool {
        self.color == color
    }
}
