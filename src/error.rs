//! State verification errors
//!
//! The command interpreter is total: malformed arguments are clamped,
//! never rejected. A `StateError` therefore always indicates an
//! implementation bug; debug builds panic on it, release builds may
//! log and continue.

use thiserror::Error;

/// A violated grid invariant reported by `ScreenBuffer::verify_state`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("grid holds {actual} lines, expected {expected}")]
    GridHeight { actual: usize, expected: usize },

    #[error("line {row} holds {actual} cells, expected {expected}")]
    LineWidth {
        row: usize,
        actual: usize,
        expected: usize,
    },

    #[error("cursor at {row}:{column} outside a {rows}x{columns} grid")]
    CursorOutOfRange {
        row: usize,
        column: usize,
        rows: usize,
        columns: usize,
    },

    #[error("margin range {from}..={to} invalid for extent {extent}")]
    MarginOutOfRange {
        from: usize,
        to: usize,
        extent: usize,
    },

    #[error("scrollback holds {actual} lines, limit is {limit}")]
    ScrollbackOverflow { actual: usize, limit: usize },
}
