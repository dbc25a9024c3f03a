//! Color representation for terminal cells
//!
//! Supports:
//! - Default foreground/background
//! - 16 standard ANSI colors, addressable as normal (0-7) or bright (0-7)
//! - 256-color palette
//! - 24-bit true color (RGB)

use serde::{Deserialize, Serialize};

/// A 24-bit RGB color value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RgbColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl RgbColor {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Scale all channels by an opacity factor in `[0.0, 1.0]`.
    pub fn scaled(self, opacity: f32) -> Self {
        let apply = |v: u8| (f32::from(v) * opacity) as u8;
        Self {
            r: apply(self.r),
            g: apply(self.g),
            b: apply(self.b),
        }
    }
}

/// Whether a color is being resolved for foreground or background use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorTarget {
    Foreground,
    Background,
}

/// Color representation supporting all terminal color modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Color {
    /// Default terminal color (foreground or background)
    #[default]
    Default,
    /// One of the 16 base colors (0-15); 8-15 are the bright variants
    Indexed(u8),
    /// Bright variant of a base color (0-7)
    Bright(u8),
    /// 256-color palette index
    /// 0-15: base colors, 16-231: 6x6x6 cube, 232-255: grayscale
    Palette(u8),
    /// 24-bit RGB color
    Rgb(RgbColor),
}

/// Default foreground when no color is set (light gray, xterm-like).
pub const DEFAULT_FOREGROUND: RgbColor = RgbColor {
    r: 229,
    g: 229,
    b: 229,
};

/// Default background when no color is set.
pub const DEFAULT_BACKGROUND: RgbColor = RgbColor { r: 0, g: 0, b: 0 };

impl Color {
    /// Resolve to RGB for rendering.
    ///
    /// `bright` requests the bright variant of base colors 0-7, as bold
    /// text does for indexed colors.
    pub fn resolve(self, target: ColorTarget, bright: bool) -> RgbColor {
        match self {
            Color::Default => match target {
                ColorTarget::Foreground => DEFAULT_FOREGROUND,
                ColorTarget::Background => DEFAULT_BACKGROUND,
            },
            Color::Indexed(idx) => {
                let idx = if bright && idx < 8 { idx + 8 } else { idx };
                palette_rgb(idx)
            }
            Color::Bright(idx) => palette_rgb(idx.min(7) + 8),
            Color::Palette(idx) => palette_rgb(idx),
            Color::Rgb(rgb) => rgb,
        }
    }
}

/// Convert a 256-color palette index to RGB using the xterm palette.
fn palette_rgb(index: u8) -> RgbColor {
    let (r, g, b) = match index {
        // Standard colors (0-7)
        0 => (0, 0, 0),
        1 => (205, 0, 0),
        2 => (0, 205, 0),
        3 => (205, 205, 0),
        4 => (0, 0, 238),
        5 => (205, 0, 205),
        6 => (0, 205, 205),
        7 => (229, 229, 229),

        // Bright colors (8-15)
        8 => (127, 127, 127),
        9 => (255, 0, 0),
        10 => (0, 255, 0),
        11 => (255, 255, 0),
        12 => (92, 92, 255),
        13 => (255, 0, 255),
        14 => (0, 255, 255),
        15 => (255, 255, 255),

        // 6x6x6 color cube (16-231)
        16..=231 => {
            let idx = index - 16;
            let r = idx / 36;
            let g = (idx % 36) / 6;
            let b = idx % 6;
            let to_val = |v: u8| if v == 0 { 0 } else { 55 + v * 40 };
            (to_val(r), to_val(g), to_val(b))
        }

        // Grayscale (232-255)
        232..=255 => {
            let gray = 8 + (index - 232) * 10;
            (gray, gray, gray)
        }
    };
    RgbColor::new(r, g, b)
}

/// Dynamic colors addressable through OSC set/query/reset sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DynamicColorName {
    DefaultForegroundColor,
    DefaultBackgroundColor,
    TextCursorColor,
    MouseForegroundColor,
    MouseBackgroundColor,
    HighlightBackgroundColor,
    HighlightForegroundColor,
}

impl DynamicColorName {
    /// The OSC command number used to set (and, +100, to reset) this color.
    pub fn code(self) -> u16 {
        match self {
            DynamicColorName::DefaultForegroundColor => 10,
            DynamicColorName::DefaultBackgroundColor => 11,
            DynamicColorName::TextCursorColor => 12,
            DynamicColorName::MouseForegroundColor => 13,
            DynamicColorName::MouseBackgroundColor => 14,
            DynamicColorName::HighlightBackgroundColor => 17,
            DynamicColorName::HighlightForegroundColor => 19,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_default() {
        assert_eq!(Color::default(), Color::Default);
        assert_eq!(
            Color::Default.resolve(ColorTarget::Foreground, false),
            DEFAULT_FOREGROUND
        );
        assert_eq!(
            Color::Default.resolve(ColorTarget::Background, false),
            DEFAULT_BACKGROUND
        );
    }

    #[test]
    fn test_standard_colors_resolve() {
        assert_eq!(
            Color::Indexed(1).resolve(ColorTarget::Foreground, false),
            RgbColor::new(205, 0, 0)
        );
        assert_eq!(
            Color::Indexed(7).resolve(ColorTarget::Foreground, false),
            RgbColor::new(229, 229, 229)
        );
    }

    #[test]
    fn test_bold_brightens_indexed() {
        assert_eq!(
            Color::Indexed(1).resolve(ColorTarget::Foreground, true),
            RgbColor::new(255, 0, 0)
        );
        // Already-bright indices are unchanged
        assert_eq!(
            Color::Indexed(9).resolve(ColorTarget::Foreground, true),
            RgbColor::new(255, 0, 0)
        );
    }

    #[test]
    fn test_bright_variant() {
        assert_eq!(
            Color::Bright(2).resolve(ColorTarget::Foreground, false),
            RgbColor::new(0, 255, 0)
        );
    }

    #[test]
    fn test_color_cube() {
        assert_eq!(
            Color::Palette(16).resolve(ColorTarget::Foreground, false),
            RgbColor::new(0, 0, 0)
        );
        assert_eq!(
            Color::Palette(196).resolve(ColorTarget::Foreground, false),
            RgbColor::new(255, 0, 0)
        );
    }

    #[test]
    fn test_grayscale() {
        assert_eq!(
            Color::Palette(232).resolve(ColorTarget::Foreground, false),
            RgbColor::new(8, 8, 8)
        );
        assert_eq!(
            Color::Palette(255).resolve(ColorTarget::Foreground, false),
            RgbColor::new(238, 238, 238)
        );
    }

    #[test]
    fn test_rgb_scaled() {
        let c = RgbColor::new(200, 100, 50).scaled(0.5);
        assert_eq!(c, RgbColor::new(100, 50, 25));
    }

    #[test]
    fn test_dynamic_color_codes() {
        assert_eq!(DynamicColorName::DefaultForegroundColor.code(), 10);
        assert_eq!(DynamicColorName::DefaultBackgroundColor.code(), 11);
        assert_eq!(DynamicColorName::TextCursorColor.code(), 12);
    }
}
