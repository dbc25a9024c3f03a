//! Cursor state and the DECSC/DECRC save stack entries.

use serde::{Deserialize, Serialize};

use crate::cell::GraphicsAttributes;

/// Cursor shape requested through DECSCUSR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CursorShape {
    /// Filled rectangle
    #[default]
    Block,
    /// Horizontal underline
    Underline,
    /// Vertical bar
    Bar,
}

/// Whether the cursor blinks or stays steady.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CursorDisplay {
    #[default]
    Blink,
    Steady,
}

/// Cursor position and visibility.
///
/// Row and column are 0-indexed into the grid; the public API and the
/// wire protocol translate to 1-based coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    pub row: usize,
    pub column: usize,
    /// DECTCEM visibility.
    pub visible: bool,
}

impl Cursor {
    pub fn new() -> Self {
        Self {
            row: 0,
            column: 0,
            visible: true,
        }
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self::new()
    }
}

/// One entry of the DECSC/DECRC save stack.
///
/// Captures what save-cursor is defined to capture: position,
/// rendition, autowrap, and origin mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedState {
    pub row: usize,
    pub column: usize,
    pub rendition: GraphicsAttributes,
    pub auto_wrap: bool,
    pub origin_mode: bool,
}
