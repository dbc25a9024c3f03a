//! Terminal mode flags
//!
//! Modes are stored as a set per screen buffer. Each mode knows its
//! numeric code for SM/RM and DECSET/DECRST traffic and for DECRPM
//! mode reports.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Modes settable through SM/RM (ANSI) and DECSET/DECRST (DEC private).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    /// IRM: the text path shifts cells right instead of overwriting
    Insert,
    /// LNM: linefeed also performs a carriage return
    AutomaticNewLine,
    /// DECCKM: cursor keys send application sequences
    ApplicationCursorKeys,
    /// DECOM: cursor addressing is relative to the margin region
    Origin,
    /// DECAWM: writing past the right margin wraps to the next line
    AutoWrap,
    /// DECTCEM: cursor is visible
    VisibleCursor,
    /// DECLRMM: left/right margins are enforced
    LeftRightMargin,
    /// UTF-8 mouse coordinate encoding
    MouseExtended,
    /// SGR mouse coordinate encoding
    MouseSgr,
    /// urxvt mouse coordinate encoding
    MouseUrxvt,
    /// Alternate-scroll: wheel events become cursor keys on the
    /// alternate screen
    MouseAlternateScroll,
    /// Focus in/out reporting
    FocusTracking,
    /// Switch to the alternate screen buffer (with cursor save/restore)
    UseAlternateScreen,
    /// Bracketed paste wrapping
    BracketedPaste,
}

impl Mode {
    /// The parameter value used on the wire for this mode.
    pub fn code(self) -> u16 {
        match self {
            Mode::Insert => 4,
            Mode::AutomaticNewLine => 20,
            Mode::ApplicationCursorKeys => 1,
            Mode::Origin => 6,
            Mode::AutoWrap => 7,
            Mode::VisibleCursor => 25,
            Mode::LeftRightMargin => 69,
            Mode::MouseExtended => 1005,
            Mode::MouseSgr => 1006,
            Mode::MouseUrxvt => 1015,
            Mode::MouseAlternateScroll => 1007,
            Mode::FocusTracking => 1004,
            Mode::UseAlternateScreen => 1049,
            Mode::BracketedPaste => 2004,
        }
    }

    /// DEC private modes use the `?` prefix on the wire and are the
    /// only ones XTSAVE/XTRESTORE applies to.
    pub fn is_private(self) -> bool {
        !matches!(self, Mode::Insert | Mode::AutomaticNewLine)
    }
}

/// The set of currently enabled modes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeSet {
    enabled: HashSet<Mode>,
}

impl ModeSet {
    /// Create the power-on mode set: autowrap on, cursor visible.
    pub fn new() -> Self {
        let mut enabled = HashSet::new();
        enabled.insert(Mode::AutoWrap);
        enabled.insert(Mode::VisibleCursor);
        Self { enabled }
    }

    pub fn set(&mut self, mode: Mode, enable: bool) {
        if enable {
            self.enabled.insert(mode);
        } else {
            self.enabled.remove(&mode);
        }
    }

    pub fn contains(&self, mode: Mode) -> bool {
        self.enabled.contains(&mode)
    }
}

impl Default for ModeSet {
    fn default() -> Self {
        Self::new()
    }
}
