//! Terminal cell representation
//!
//! Each cell in the grid holds a grapheme cluster (one base codepoint
//! plus combining marks, up to [`MAX_CODEPOINTS`]), its display width,
//! graphics attributes, and an optional shared hyperlink reference.

use std::sync::Arc;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use unicode_width::UnicodeWidthChar;

use crate::color::{Color, ColorTarget, RgbColor};
use crate::hyperlink::Hyperlink;

/// Maximum number of codepoints a single cell can hold.
pub const MAX_CODEPOINTS: usize = 9;

bitflags! {
    /// Character rendition flags selected through SGR parameters.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
    pub struct CharStyle: u16 {
        const BOLD              = 1 << 0;
        const FAINT             = 1 << 1;
        const ITALIC            = 1 << 2;
        const UNDERLINE         = 1 << 3;
        const BLINKING          = 1 << 4;
        const INVERSE           = 1 << 5;
        const HIDDEN            = 1 << 6;
        const CROSSED_OUT       = 1 << 7;
        const DOUBLY_UNDERLINED = 1 << 8;
        const CURLY_UNDERLINED  = 1 << 9;
        const DOTTED_UNDERLINE  = 1 << 10;
        const DASHED_UNDERLINE  = 1 << 11;
        const FRAMED            = 1 << 12;
        const ENCIRCLED         = 1 << 13;
    }
}

/// Character graphics rendition: colors plus style flags.
///
/// An `underline_color` of [`Color::Default`] renders with the resolved
/// foreground color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GraphicsAttributes {
    pub foreground: Color,
    pub background: Color,
    pub underline_color: Color,
    pub styles: CharStyle,
}

impl GraphicsAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset all attributes to default (SGR 0).
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Resolve foreground and background to RGB for rendering.
    ///
    /// Faint halves the foreground opacity, bold selects the bright
    /// variant of base colors, and inverse swaps the resolved pair.
    pub fn resolved_colors(&self) -> (RgbColor, RgbColor) {
        let opacity = if self.styles.contains(CharStyle::FAINT) {
            0.5
        } else {
            1.0
        };
        let bright = self.styles.contains(CharStyle::BOLD);

        let fg = self
            .foreground
            .resolve(ColorTarget::Foreground, bright)
            .scaled(opacity);
        let bg = self.background.resolve(ColorTarget::Background, false);

        if self.styles.contains(CharStyle::INVERSE) {
            (bg, fg)
        } else {
            (fg, bg)
        }
    }

    /// Resolve the underline color, falling back to the foreground.
    pub fn resolved_underline_color(&self) -> RgbColor {
        let opacity = if self.styles.contains(CharStyle::FAINT) {
            0.5
        } else {
            1.0
        };
        let bright = self.styles.contains(CharStyle::BOLD);
        let color = match self.underline_color {
            Color::Default => self.foreground,
            other => other,
        };
        color.resolve(ColorTarget::Foreground, bright).scaled(opacity)
    }
}

/// A single cell in the terminal grid.
///
/// `width` is 1 for normal cells, 2 for the leading half of a wide
/// character, and 0 for the trailing half. Trailing halves carry no
/// content and are cleared together with their leader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    /// The grapheme cluster in this cell; empty means a blank cell.
    content: String,
    /// Display width in columns (0, 1, or 2).
    width: u8,
    /// Graphics rendition applied when the cell was written.
    pub attributes: GraphicsAttributes,
    /// Shared hyperlink reference, if written inside an OSC 8 span.
    pub hyperlink: Option<Arc<Hyperlink>>,
}

impl Cell {
    /// Create a new empty cell.
    pub fn new() -> Self {
        Self {
            content: String::new(),
            width: 1,
            attributes: GraphicsAttributes::default(),
            hyperlink: None,
        }
    }

    /// Create a cell holding a single character with the given rendition.
    pub fn with_char(ch: char, attributes: GraphicsAttributes) -> Self {
        let mut cell = Self {
            content: String::new(),
            width: 1,
            attributes,
            hyperlink: None,
        };
        cell.set_char(ch);
        cell
    }

    /// Create an erased cell carrying the given rendition.
    pub fn erased(attributes: GraphicsAttributes) -> Self {
        Self {
            content: String::new(),
            width: 1,
            attributes,
            hyperlink: None,
        }
    }

    /// Replace the cell content with a single base character.
    pub fn set_char(&mut self, ch: char) {
        self.content.clear();
        self.content.push(ch);
        self.width = char_width(ch).max(1);
    }

    /// Append a combining codepoint to the cluster.
    ///
    /// Returns the number of extra columns the cluster now occupies
    /// (0 normally, 1 when a variation selector widened it). Codepoints
    /// beyond [`MAX_CODEPOINTS`] are dropped.
    pub fn append_codepoint(&mut self, ch: char) -> u8 {
        if self.codepoint_count() >= MAX_CODEPOINTS {
            return 0;
        }
        self.content.push(ch);

        let width = if ch == '\u{FE0F}' { 2 } else { char_width(ch) };
        if width > self.width {
            let diff = width - self.width;
            self.width = width;
            diff
        } else {
            0
        }
    }

    /// The cluster content; empty for blank and continuation cells.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Number of codepoints stored in this cell.
    pub fn codepoint_count(&self) -> usize {
        self.content.chars().count()
    }

    /// The character to display, or space when blank.
    pub fn display_char(&self) -> char {
        self.content.chars().next().unwrap_or(' ')
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Display width in columns.
    pub fn width(&self) -> u8 {
        self.width
    }

    /// Turn this cell into the trailing half of a wide character.
    pub fn set_continuation(&mut self, attributes: GraphicsAttributes) {
        self.content.clear();
        self.width = 0;
        self.attributes = attributes;
        self.hyperlink = None;
    }

    /// True for the trailing half of a wide character.
    pub fn is_continuation(&self) -> bool {
        self.width == 0
    }

    /// Erase the cell, keeping the given rendition and dropping the
    /// hyperlink reference.
    pub fn erase(&mut self, attributes: GraphicsAttributes) {
        self.content.clear();
        self.width = 1;
        self.attributes = attributes;
        self.hyperlink = None;
    }

    /// Reset the cell to the default empty state.
    pub fn reset(&mut self) {
        self.erase(GraphicsAttributes::default());
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::new()
    }
}

/// Display width of a codepoint: 0 for combining marks, 2 for wide
/// characters, 1 otherwise.
pub(crate) fn char_width(ch: char) -> u8 {
    match ch.width() {
        Some(w) => w.min(2) as u8,
        None => 1,
    }
}
