//! VT screen state core
//!
//! This crate implements the screen model of a VT/xterm-compatible
//! terminal emulator: a two-dimensional grid of styled cells with
//! scrollback history, margins, tab stops, saveable cursor state, and
//! the full command interpreter that mutates it.
//!
//! It deliberately stops at the screen boundary. The byte-level escape
//! sequence parser, the PTY, input encoding, and rendering live in
//! sibling components; this crate consumes parsed [`Command`] values
//! and exposes the resulting grid through [`Screen::render`] plus a
//! set of collaborator callbacks ([`ScreenHooks`]).
//!
//! # Architecture
//!
//! - [`Cell`] / [`Line`]: a styled grid position and a row of them
//! - [`ScreenBuffer`]: one grid with margins, modes, and scrollback
//! - [`Screen`]: main + alternate buffer pair, command dispatch,
//!   viewport scrolling, and reply generation
//!
//! # Example
//!
//! ```
//! use vtscreen::{Command, Screen, ScreenHooks, WindowSize};
//!
//! let mut screen = Screen::new(WindowSize::new(80, 24), ScreenHooks::default());
//! for ch in "hello".chars() {
//!     screen.apply(Command::AppendChar(ch));
//! }
//! assert_eq!(screen.render_text_line(1).trim_end(), "hello");
//! ```
//!
//! The core is single-threaded: all mutation happens inside
//! [`Screen::apply`] and callbacks fire synchronously before it
//! returns. Owners that read rendered state from another thread must
//! snapshot or lock externally.

mod buffer;
mod cell;
mod color;
mod command;
mod config;
mod cursor;
mod error;
mod hooks;
mod hyperlink;
mod line;
mod modes;
mod screen;
mod tabs;

pub use buffer::{BufferKind, Margin, MarginRange, ScreenBuffer};
pub use cell::{Cell, CharStyle, GraphicsAttributes, MAX_CODEPOINTS};
pub use color::{Color, ColorTarget, DynamicColorName, RgbColor};
pub use command::{Command, MouseProtocol, MouseTransport, MouseWheelMode, TabClear};
pub use config::ScreenConfig;
pub use cursor::{Cursor, CursorDisplay, CursorShape, SavedState};
pub use error::StateError;
pub use hooks::ScreenHooks;
pub use hyperlink::{Hyperlink, HyperlinkTable};
pub use line::Line;
pub use modes::{Mode, ModeSet};
pub use screen::Screen;
pub use tabs::TabStops;

use serde::{Deserialize, Serialize};

/// Screen dimensions in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowSize {
    pub columns: usize,
    pub rows: usize,
}

impl WindowSize {
    /// Create a new size; both dimensions are clamped to at least 1.
    pub fn new(columns: usize, rows: usize) -> Self {
        Self {
            columns: columns.max(1),
            rows: rows.max(1),
        }
    }
}

impl Default for WindowSize {
    fn default() -> Self {
        Self {
            columns: 80,
            rows: 24,
        }
    }
}

/// A 1-based (row, column) position as used by the public API and the
/// wire protocol. Internal grid indexing is 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coordinate {
    pub row: usize,
    pub column: usize,
}

impl Coordinate {
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}
