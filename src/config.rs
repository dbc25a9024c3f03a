//! Screen configuration

use serde::{Deserialize, Serialize};

use crate::WindowSize;

/// Construction-time configuration for a [`crate::Screen`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenConfig {
    /// Initial screen dimensions.
    pub size: WindowSize,
    /// Scrollback line limit; `None` keeps history unbounded.
    pub max_history_line_count: Option<usize>,
    /// Default tab stop interval.
    pub tab_width: usize,
    /// Emit a trace event for every raw command batch.
    pub log_raw: bool,
    /// Emit a trace event for every dispatched command.
    pub log_trace: bool,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            size: WindowSize::default(),
            max_history_line_count: Some(10_000),
            tab_width: 8,
            log_raw: false,
            log_trace: false,
        }
    }
}
