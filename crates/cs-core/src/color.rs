//! Colors for connection types and users.
//!
//! The store only ever sees colors as CSS strings; `Color` exists so the
//! default generator can work in HSL and emit hex.

use palette::{FromColor, Hsl, Srgb};

/// RGBA color. Stored as 4 × f32 [0.0, 1.0].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Build an opaque color from hue (degrees), saturation and lightness in [0, 1].
    pub fn from_hsl(hue: f32, saturation: f32, lightness: f32) -> Self {
        let rgb = Srgb::from_color(Hsl::new(hue, saturation, lightness));
        Self::rgba(rgb.red, rgb.green, rgb.blue, 1.0)
    }

    /// Parse `#RRGGBB` or `#RGB` (the `#` is optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let rgb: Srgb<u8> = hex.parse().ok()?;
        let rgb: Srgb<f32> = rgb.into_format();
        Some(Self::rgba(rgb.red, rgb.green, rgb.blue, 1.0))
    }

    /// Emit as `#RRGGBB`, dropping alpha.
    pub fn to_hex(&self) -> String {
        let rgb: Srgb<u8> = Srgb::new(
            self.r.clamp(0.0, 1.0),
            self.g.clamp(0.0, 1.0),
            self.b.clamp(0.0, 1.0),
        )
        .into_format();
        format!("#{:02X}{:02X}{:02X}", rgb.red, rgb.green, rgb.blue)
    }

    /// Relative luminance (Rec. 709 weights, no gamma correction).
    pub fn luminance(&self) -> f32 {
        0.2126 * self.r + 0.7152 * self.g + 0.0722 * self.b
    }
}

/// Source of display colors for new connection types and users.
pub trait ColorSource {
    /// A fresh light color, distinct from the ones handed out recently.
    fn new_light_color(&mut self) -> String;
}

/// Default color source. Walks the hue wheel by the golden angle so
/// consecutive colors stay far apart, at high lightness.
#[derive(Debug, Clone, Default)]
pub struct LightPalette {
    step: u32,
}

impl LightPalette {
    const GOLDEN_ANGLE: f32 = 137.507_76;
}

impl ColorSource for LightPalette {
    fn new_light_color(&mut self) -> String {
        let hue = self.step as f32 * Self::GOLDEN_ANGLE;
        // Alternate saturation/lightness a little so neighbours differ in more than hue
        let saturation = if self.step % 2 == 0 { 0.75 } else { 0.6 };
        let lightness = if self.step % 3 == 0 { 0.8 } else { 0.75 };
        self.step = self.step.wrapping_add(1);
        Color::from_hsl(hue, saturation, lightness).to_hex()
    }
}
