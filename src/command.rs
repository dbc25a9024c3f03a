//! Screen commands
//!
//! Semantic operations produced by the escape-sequence parser and
//! applied to the screen. Parameter defaulting (a missing or zero count
//! means 1) and range clamping happen at dispatch, so every variant is
//! safe to apply with arbitrary values.

use serde::{Deserialize, Serialize};

use crate::cell::CharStyle;
use crate::color::{Color, DynamicColorName, RgbColor};
use crate::cursor::{CursorDisplay, CursorShape};
use crate::modes::Mode;

/// Mouse event classes a client can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MouseProtocol {
    /// X10 compatibility: button press only
    X10,
    /// Press and release
    Normal,
    /// Press, release, and motion while a button is held
    ButtonTracking,
    /// All motion events
    AnyEvent,
}

/// Coordinate encoding for mouse reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MouseTransport {
    /// Single-byte X10 encoding
    #[default]
    Default,
    /// UTF-8 extended coordinates
    Extended,
    /// SGR (`CSI < ...`) encoding
    Sgr,
    /// urxvt decimal encoding
    Urxvt,
}

/// How mouse wheel input is translated for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MouseWheelMode {
    /// Wheel events scroll the viewport
    #[default]
    Default,
    /// Wheel events become normal cursor key sequences
    NormalCursorKeys,
    /// Wheel events become application cursor key sequences
    ApplicationCursorKeys,
}

/// Which tab stops a tab-clear command removes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TabClear {
    /// TBC 0: the stop at the cursor column
    UnderCursor,
    /// TBC 3: every stop
    AllTabs,
}

/// A parsed screen command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    // Text path
    /// Write one Unicode scalar at the cursor, honoring grapheme
    /// clustering, wide characters, autowrap, and insert mode.
    AppendChar(char),
    Linefeed,
    CarriageReturn,
    Backspace,
    Bell,

    // Cursor motion
    MoveCursorUp(usize),
    MoveCursorDown(usize),
    MoveCursorForward(usize),
    MoveCursorBackward(usize),
    /// CUP/HVP: 1-based, logical under origin mode
    MoveCursorTo { row: usize, column: usize },
    /// CHA/HPA: 1-based column on the current row
    MoveCursorToColumn(usize),
    /// VPA: 1-based row, keeping the column
    MoveCursorToLine(usize),
    MoveCursorToBeginOfLine,
    /// HPR: relative column motion
    HorizontalPositionRelative(usize),
    /// VPR: relative row motion
    VerticalPositionRelative(usize),
    CursorNextLine(usize),
    CursorPreviousLine(usize),
    MoveCursorToNextTab(usize),
    CursorBackwardTab(usize),
    SaveCursor,
    RestoreCursor,

    // Index family
    Index,
    ReverseIndex,
    BackIndex,
    ForwardIndex,
    NextLine,
    HorizontalTabSet,
    HorizontalTabClear(TabClear),
    /// DECALN: fill the screen with `E` and reset margins
    ScreenAlignmentPattern,

    // Erase family
    ClearToEndOfScreen,
    ClearToBeginOfScreen,
    ClearScreen,
    ClearToEndOfLine,
    ClearToBeginOfLine,
    ClearLine,
    EraseCharacters(usize),
    ClearScrollbackBuffer,

    // Scroll and shift family
    ScrollUp(usize),
    ScrollDown(usize),
    InsertLines(usize),
    DeleteLines(usize),
    InsertCharacters(usize),
    DeleteCharacters(usize),
    InsertColumns(usize),
    DeleteColumns(usize),

    // Margins
    /// DECSTBM; `None` selects the screen edge
    SetTopBottomMargin {
        top: Option<usize>,
        bottom: Option<usize>,
    },
    /// DECSLRM; only effective while `Mode::LeftRightMargin` is set
    SetLeftRightMargin {
        left: Option<usize>,
        right: Option<usize>,
    },

    // Graphics rendition
    SetForegroundColor(Color),
    SetBackgroundColor(Color),
    /// `Color::Default` means "same as foreground"
    SetUnderlineColor(Color),
    /// Set or clear style flags; parsers map SGR parameters onto masks
    SetStyle { styles: CharStyle, enable: bool },
    ResetGraphicsRendition,

    // Modes
    SetMode { mode: Mode, enable: bool },
    /// DECRQM: report the current state of a mode
    RequestMode(Mode),
    /// XTSAVE: push the current value of DEC private modes
    SaveModes(Vec<Mode>),
    /// XTRESTORE: pop previously saved DEC private modes
    RestoreModes(Vec<Mode>),

    // Window management
    ChangeWindowTitle(String),
    SaveWindowTitle,
    RestoreWindowTitle,
    /// CSI resize request, forwarded to the window collaborator
    ResizeWindow {
        columns: usize,
        rows: usize,
        in_pixels: bool,
    },

    // Hyperlinks and marks
    /// OSC 8; an empty URI terminates the active hyperlink
    Hyperlink { id: Option<String>, uri: String },
    SetMark,

    // Reports
    /// DSR 5: operating status
    DeviceStatusReport,
    /// DSR 6: cursor position (logical under origin mode)
    ReportCursorPosition,
    /// DECXCPR: cursor position including page
    ReportExtendedCursorPosition,
    /// DA1
    SendDeviceAttributes,
    /// DA2
    SendTerminalId,
    /// DECTABSR: report the current tab stops
    RequestTabStops,
    RequestDynamicColor(DynamicColorName),
    SetDynamicColor(DynamicColorName, RgbColor),
    ResetDynamicColor(DynamicColorName),

    // Input-side collaborators
    SendMouseEvents {
        protocol: MouseProtocol,
        enable: bool,
    },
    ApplicationKeypadMode(bool),
    SetCursorStyle {
        display: CursorDisplay,
        shape: CursorShape,
    },
    Notify { title: String, body: String },

    // Resets
    SoftReset,
    FullReset,
}
