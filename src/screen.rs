//! Terminal screen: command dispatch over a main/alternate buffer pair
//!
//! The `Screen` owns two `ScreenBuffer`s, applies parsed [`Command`]s
//! to the active one, manages the viewport scroll offset into
//! scrollback, emits VT replies, and fires collaborator hooks. All of
//! it is synchronous and single-threaded; callbacks run before
//! [`Screen::apply`] returns.

use crate::buffer::{BufferKind, ScreenBuffer};
use crate::cell::Cell;
use crate::color::{DynamicColorName, RgbColor};
use crate::command::{Command, MouseTransport, MouseWheelMode, TabClear};
use crate::config::ScreenConfig;
use crate::hooks::ScreenHooks;
use crate::modes::Mode;
use crate::{Coordinate, WindowSize};

/// DA1 identity: VT420-level with common xterm feature set.
const DEVICE_ATTRIBUTES_REPLY: &str = "\x1b[?64;1;2;4;6;9;15;18;21;22c";

/// Maximum length of a window title we accept.
const MAX_TITLE_LENGTH: usize = 4096;

/// The terminal screen: buffers, viewport, and command interpreter.
pub struct Screen {
    size: WindowSize,
    tab_width: usize,
    primary: ScreenBuffer,
    alternate: ScreenBuffer,
    active: BufferKind,
    window_title: String,
    saved_window_titles: Vec<String>,
    /// XTSAVE/XTRESTORE entries, most recent last. Separate from the
    /// per-buffer DECSC stacks.
    saved_modes: Vec<(Mode, bool)>,
    scroll_offset: usize,
    hooks: ScreenHooks,
    log_trace: bool,
    log_raw: bool,
}

impl Screen {
    /// Create a screen with default configuration at the given size.
    pub fn new(size: WindowSize, hooks: ScreenHooks) -> Self {
        Self::with_config(
            ScreenConfig {
                size,
                ..ScreenConfig::default()
            },
            hooks,
        )
    }

    pub fn with_config(config: ScreenConfig, hooks: ScreenHooks) -> Self {
        let size = config.size;
        Self {
            size,
            tab_width: config.tab_width,
            primary: ScreenBuffer::new(
                BufferKind::Main,
                size,
                config.max_history_line_count,
                config.tab_width,
            ),
            alternate: ScreenBuffer::new(BufferKind::Alternate, size, None, config.tab_width),
            active: BufferKind::Main,
            window_title: String::new(),
            saved_window_titles: Vec::new(),
            saved_modes: Vec::new(),
            scroll_offset: 0,
            hooks,
            log_trace: config.log_trace,
            log_raw: config.log_raw,
        }
    }

    // --- Accessors ---

    pub fn size(&self) -> WindowSize {
        self.size
    }

    /// The currently active buffer.
    pub fn buffer(&self) -> &ScreenBuffer {
        match self.active {
            BufferKind::Main => &self.primary,
            BufferKind::Alternate => &self.alternate,
        }
    }

    fn buffer_mut(&mut self) -> &mut ScreenBuffer {
        match self.active {
            BufferKind::Main => &mut self.primary,
            BufferKind::Alternate => &mut self.alternate,
        }
    }

    pub fn buffer_kind(&self) -> BufferKind {
        self.active
    }

    pub fn is_primary_screen(&self) -> bool {
        self.active == BufferKind::Main
    }

    pub fn is_alternate_screen(&self) -> bool {
        self.active == BufferKind::Alternate
    }

    pub fn window_title(&self) -> &str {
        &self.window_title
    }

    /// Cursor position as applications see it (origin-mode relative).
    pub fn cursor_position(&self) -> Coordinate {
        self.buffer().cursor_position()
    }

    /// Cursor position in absolute screen coordinates.
    pub fn real_cursor_position(&self) -> Coordinate {
        self.buffer().real_cursor_position()
    }

    /// Cell at a 1-based coordinate on the active buffer.
    pub fn cell_at(&self, coord: Coordinate) -> &Cell {
        self.buffer().cell_at(coord)
    }

    pub fn history_line_count(&self) -> usize {
        self.buffer().history_line_count()
    }

    pub fn set_max_history_line_count(&mut self, limit: Option<usize>) {
        self.primary.set_max_history_line_count(limit);
        self.scroll_offset = self.scroll_offset.min(self.primary.history_line_count());
    }

    /// Whether a mode is in effect, including the buffer-switch mode.
    pub fn is_mode_enabled(&self, mode: Mode) -> bool {
        if mode == Mode::UseAlternateScreen {
            self.is_alternate_screen()
        } else {
            self.buffer().is_mode_enabled(mode)
        }
    }

    // --- Command dispatch ---

    /// Apply a batch of commands, then fire the trace hook once.
    pub fn apply_all(&mut self, commands: &[Command]) {
        if self.log_raw {
            tracing::trace!(count = commands.len(), "command batch");
        }
        for command in commands {
            self.apply(command.clone());
        }
        (self.hooks.on_commands)(commands);
    }

    /// Apply one command to the active buffer.
    pub fn apply(&mut self, command: Command) {
        if self.log_trace {
            tracing::trace!(?command, "dispatch");
        }
        self.dispatch(command);

        #[cfg(debug_assertions)]
        if let Err(error) = self.buffer().verify_state() {
            panic!("screen invariant violated: {error}");
        }
    }

    fn dispatch(&mut self, command: Command) {
        match command {
            // Text path
            Command::AppendChar(ch) => self.buffer_mut().append_char(ch),
            Command::Linefeed => {
                self.buffer_mut().linefeed();
                if self.is_mode_enabled(Mode::AutomaticNewLine) {
                    self.buffer_mut().carriage_return();
                }
            }
            Command::CarriageReturn => self.buffer_mut().carriage_return(),
            Command::Backspace => self.buffer_mut().move_cursor_backward(1),
            Command::Bell => (self.hooks.bell)(),

            // Cursor motion
            Command::MoveCursorUp(n) => self.buffer_mut().move_cursor_up(n),
            Command::MoveCursorDown(n) => self.buffer_mut().move_cursor_down(n),
            Command::MoveCursorForward(n) => self.buffer_mut().move_cursor_forward(n),
            Command::MoveCursorBackward(n) => self.buffer_mut().move_cursor_backward(n),
            Command::MoveCursorTo { row, column } => {
                self.buffer_mut().move_cursor_to(row, column)
            }
            Command::MoveCursorToColumn(column) => self.buffer_mut().set_cursor_column(column),
            Command::MoveCursorToLine(row) => self.buffer_mut().set_cursor_row(row),
            Command::MoveCursorToBeginOfLine => self.buffer_mut().carriage_return(),
            Command::HorizontalPositionRelative(n) => {
                self.buffer_mut().move_cursor_forward(n)
            }
            Command::VerticalPositionRelative(n) => self.buffer_mut().move_cursor_down(n),
            Command::CursorNextLine(n) => {
                let buffer = self.buffer_mut();
                buffer.move_cursor_down(n);
                buffer.carriage_return();
            }
            Command::CursorPreviousLine(n) => {
                let buffer = self.buffer_mut();
                buffer.move_cursor_up(n);
                buffer.carriage_return();
            }
            Command::MoveCursorToNextTab(n) => self.buffer_mut().move_cursor_to_next_tab(n),
            Command::CursorBackwardTab(n) => self.buffer_mut().cursor_backward_tab(n),
            Command::SaveCursor => self.buffer_mut().save_state(),
            Command::RestoreCursor => self.buffer_mut().restore_state(),

            // Index family
            Command::Index => self.buffer_mut().linefeed(),
            Command::ReverseIndex => self.buffer_mut().reverse_index(),
            Command::BackIndex => self.buffer_mut().back_index(),
            Command::ForwardIndex => self.buffer_mut().forward_index(),
            Command::NextLine => {
                let buffer = self.buffer_mut();
                buffer.linefeed();
                buffer.carriage_return();
            }
            Command::HorizontalTabSet => self.buffer_mut().set_tab(),
            Command::HorizontalTabClear(TabClear::UnderCursor) => {
                self.buffer_mut().clear_tab_under_cursor()
            }
            Command::HorizontalTabClear(TabClear::AllTabs) => self.buffer_mut().clear_all_tabs(),
            Command::ScreenAlignmentPattern => self.buffer_mut().screen_alignment_pattern(),

            // Erase family
            Command::ClearToEndOfScreen => self.buffer_mut().clear_to_end_of_screen(),
            Command::ClearToBeginOfScreen => self.buffer_mut().clear_to_begin_of_screen(),
            Command::ClearScreen => self.buffer_mut().clear_screen(),
            Command::ClearToEndOfLine => self.buffer_mut().clear_to_end_of_line(),
            Command::ClearToBeginOfLine => self.buffer_mut().clear_to_begin_of_line(),
            Command::ClearLine => self.buffer_mut().clear_line(),
            Command::EraseCharacters(n) => self.buffer_mut().erase_chars(n),
            Command::ClearScrollbackBuffer => {
                self.buffer_mut().clear_scrollback();
                self.scroll_offset = 0;
            }

            // Scroll and shift family
            Command::ScrollUp(n) => self.buffer_mut().scroll_up(n.max(1)),
            Command::ScrollDown(n) => self.buffer_mut().scroll_down(n.max(1)),
            Command::InsertLines(n) => self.buffer_mut().insert_lines(n.max(1)),
            Command::DeleteLines(n) => self.buffer_mut().delete_lines(n.max(1)),
            Command::InsertCharacters(n) => self.buffer_mut().insert_chars(n),
            Command::DeleteCharacters(n) => self.buffer_mut().delete_chars(n),
            Command::InsertColumns(n) => self.buffer_mut().insert_columns(n),
            Command::DeleteColumns(n) => self.buffer_mut().delete_columns(n),

            // Margins
            Command::SetTopBottomMargin { top, bottom } => {
                self.buffer_mut().set_vertical_margin(top, bottom)
            }
            Command::SetLeftRightMargin { left, right } => {
                self.buffer_mut().set_horizontal_margin(left, right)
            }

            // Graphics rendition
            Command::SetForegroundColor(color) => self.buffer_mut().set_foreground_color(color),
            Command::SetBackgroundColor(color) => self.buffer_mut().set_background_color(color),
            Command::SetUnderlineColor(color) => self.buffer_mut().set_underline_color(color),
            Command::SetStyle { styles, enable } => self.buffer_mut().set_style(styles, enable),
            Command::ResetGraphicsRendition => self.buffer_mut().reset_rendition(),

            // Modes
            Command::SetMode { mode, enable } => self.set_mode(mode, enable),
            Command::RequestMode(mode) => self.report_mode(mode),
            Command::SaveModes(modes) => self.save_modes(&modes),
            Command::RestoreModes(modes) => self.restore_modes(&modes),

            // Window management
            Command::ChangeWindowTitle(title) => self.change_window_title(title),
            Command::SaveWindowTitle => {
                self.saved_window_titles.push(self.window_title.clone());
            }
            Command::RestoreWindowTitle => {
                if let Some(title) = self.saved_window_titles.pop() {
                    self.window_title = title;
                    (self.hooks.on_window_title_changed)();
                }
            }
            Command::ResizeWindow {
                columns,
                rows,
                in_pixels,
            } => (self.hooks.resize_window)(columns, rows, in_pixels),

            // Hyperlinks and marks
            Command::Hyperlink { id, uri } => {
                self.buffer_mut().set_hyperlink(id.as_deref(), &uri)
            }
            Command::SetMark => self.buffer_mut().set_mark(),

            // Reports
            Command::DeviceStatusReport => self.reply("\x1b[0n".into()),
            Command::ReportCursorPosition => {
                let pos = self.buffer().cursor_position();
                self.reply(format!("\x1b[{};{}R", pos.row, pos.column));
            }
            Command::ReportExtendedCursorPosition => {
                let pos = self.buffer().cursor_position();
                self.reply(format!("\x1b[?{};{};1R", pos.row, pos.column));
            }
            Command::SendDeviceAttributes => self.reply(DEVICE_ATTRIBUTES_REPLY.into()),
            Command::SendTerminalId => self.reply("\x1b[>1;10;0c".into()),
            Command::RequestTabStops => self.report_tab_stops(),
            Command::RequestDynamicColor(name) => {
                if let Some(color) = (self.hooks.request_dynamic_color)(name) {
                    self.reply(dynamic_color_reply(name, color));
                }
            }
            Command::SetDynamicColor(name, color) => {
                (self.hooks.set_dynamic_color)(name, color)
            }
            Command::ResetDynamicColor(name) => (self.hooks.reset_dynamic_color)(name),

            // Input-side collaborators
            Command::SendMouseEvents { protocol, enable } => {
                (self.hooks.set_mouse_protocol)(protocol, enable)
            }
            Command::ApplicationKeypadMode(enable) => {
                (self.hooks.set_application_keypad_mode)(enable)
            }
            Command::SetCursorStyle { display, shape } => {
                (self.hooks.set_cursor_style)(display, shape)
            }
            Command::Notify { title, body } => (self.hooks.notify)(&title, &body),

            // Resets
            Command::SoftReset => self.buffer_mut().soft_reset(),
            Command::FullReset => self.hard_reset(),
        }
    }

    fn reply(&mut self, message: String) {
        (self.hooks.reply)(&message);
    }

    // --- Modes ---

    fn set_mode(&mut self, mode: Mode, enable: bool) {
        match mode {
            Mode::UseAlternateScreen => {
                let kind = if enable {
                    BufferKind::Alternate
                } else {
                    BufferKind::Main
                };
                self.set_buffer(kind);
                return;
            }
            Mode::ApplicationCursorKeys => (self.hooks.use_application_cursor_keys)(enable),
            Mode::BracketedPaste => (self.hooks.set_bracketed_paste)(enable),
            Mode::FocusTracking => (self.hooks.set_generate_focus_events)(enable),
            Mode::MouseExtended => (self.hooks.set_mouse_transport)(if enable {
                MouseTransport::Extended
            } else {
                MouseTransport::Default
            }),
            Mode::MouseSgr => (self.hooks.set_mouse_transport)(if enable {
                MouseTransport::Sgr
            } else {
                MouseTransport::Default
            }),
            Mode::MouseUrxvt => (self.hooks.set_mouse_transport)(if enable {
                MouseTransport::Urxvt
            } else {
                MouseTransport::Default
            }),
            Mode::MouseAlternateScroll => (self.hooks.set_mouse_wheel_mode)(if enable {
                MouseWheelMode::NormalCursorKeys
            } else {
                MouseWheelMode::Default
            }),
            _ => {}
        }
        self.buffer_mut().set_mode(mode, enable);
    }

    fn report_mode(&mut self, mode: Mode) {
        let status = if self.is_mode_enabled(mode) { 1 } else { 2 };
        let message = if mode.is_private() {
            format!("\x1b[?{};{}$y", mode.code(), status)
        } else {
            format!("\x1b[{};{}$y", mode.code(), status)
        };
        self.reply(message);
    }

    fn save_modes(&mut self, modes: &[Mode]) {
        for &mode in modes {
            if mode.is_private() {
                self.saved_modes.push((mode, self.is_mode_enabled(mode)));
            }
        }
    }

    fn restore_modes(&mut self, modes: &[Mode]) {
        for &mode in modes {
            if !mode.is_private() {
                continue;
            }
            let position = self
                .saved_modes
                .iter()
                .rposition(|(saved, _)| *saved == mode);
            if let Some(position) = position {
                let (_, value) = self.saved_modes.remove(position);
                self.set_mode(mode, value);
            }
        }
    }

    // --- Buffer switching ---

    fn set_buffer(&mut self, kind: BufferKind) {
        if kind == self.active {
            return;
        }
        match kind {
            BufferKind::Alternate => {
                self.primary.save_state();
                self.alternate =
                    ScreenBuffer::new(BufferKind::Alternate, self.size, None, self.tab_width);
                self.active = BufferKind::Alternate;
            }
            BufferKind::Main => {
                self.active = BufferKind::Main;
                self.primary.restore_state();
            }
        }
        self.scroll_offset = 0;
        tracing::debug!(?kind, "active buffer changed");
        (self.hooks.on_buffer_changed)(kind);
    }

    // --- Window title ---

    fn change_window_title(&mut self, title: String) {
        self.window_title = title.chars().take(MAX_TITLE_LENGTH).collect();
        (self.hooks.on_window_title_changed)();
    }

    // --- Reports ---

    fn report_tab_stops(&mut self) {
        let positions = self.buffer().tab_stop_positions();
        let list = positions
            .iter()
            .map(usize::to_string)
            .collect::<Vec<_>>()
            .join("/");
        self.reply(format!("\x1bP2$u{}\x1b\\", list));
    }

    // --- Resets ---

    /// RIS: soft reset plus cleared grids, scrollback, tabs, titles,
    /// and hyperlinks; the main buffer becomes active.
    pub fn hard_reset(&mut self) {
        let was_alternate = self.is_alternate_screen();
        let max_history = self.primary.max_history_line_count();
        self.primary = ScreenBuffer::new(BufferKind::Main, self.size, max_history, self.tab_width);
        self.alternate = ScreenBuffer::new(BufferKind::Alternate, self.size, None, self.tab_width);
        self.active = BufferKind::Main;
        self.window_title.clear();
        self.saved_window_titles.clear();
        self.saved_modes.clear();
        self.scroll_offset = 0;
        if was_alternate {
            (self.hooks.on_buffer_changed)(BufferKind::Main);
        }
    }

    // --- Resize ---

    /// Resize both buffers; the viewport snaps back into range.
    pub fn resize(&mut self, size: WindowSize) {
        if size == self.size {
            return;
        }
        tracing::debug!(columns = size.columns, rows = size.rows, "resize");
        self.primary.resize(size);
        self.alternate.resize(size);
        self.size = size;
        self.scroll_offset = self.scroll_offset.min(self.buffer().history_line_count());
    }

    // --- Viewport ---

    /// Lines scrolled back into history; 0 means the live bottom.
    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    /// Scroll the viewport toward history. Returns whether it moved.
    pub fn scroll_up(&mut self, lines: usize) -> bool {
        let previous = self.scroll_offset;
        self.scroll_offset = self
            .scroll_offset
            .saturating_add(lines)
            .min(self.buffer().history_line_count());
        self.scroll_offset != previous
    }

    /// Scroll the viewport toward the live screen. Returns whether it moved.
    pub fn scroll_down(&mut self, lines: usize) -> bool {
        let previous = self.scroll_offset;
        self.scroll_offset = self.scroll_offset.saturating_sub(lines);
        self.scroll_offset != previous
    }

    pub fn scroll_to_top(&mut self) -> bool {
        let limit = self.buffer().history_line_count();
        let moved = self.scroll_offset != limit;
        self.scroll_offset = limit;
        moved
    }

    pub fn scroll_to_bottom(&mut self) -> bool {
        let moved = self.scroll_offset != 0;
        self.scroll_offset = 0;
        moved
    }

    /// Jump to the previous marked line in history, if any.
    pub fn scroll_mark_up(&mut self) -> bool {
        if let Some(offset) = self.buffer().find_prev_marker(self.scroll_offset) {
            self.scroll_offset = offset;
            true
        } else {
            false
        }
    }

    /// Jump to the next marked line, or back to the live bottom.
    pub fn scroll_mark_down(&mut self) -> bool {
        let next = self.buffer().find_next_marker(self.scroll_offset);
        let target = next.unwrap_or(0);
        let moved = target != self.scroll_offset;
        self.scroll_offset = target;
        moved
    }

    // --- Renderer pull ---

    /// Invoke `renderer` once per visible cell in row-major order with
    /// 1-based coordinates, honoring the given viewport offset.
    pub fn render<F>(&self, mut renderer: F, scroll_offset: usize)
    where
        F: FnMut(usize, usize, &Cell),
    {
        let buffer = self.buffer();
        for visual_row in 0..self.size.rows {
            let line = buffer.visible_line(visual_row, scroll_offset);
            for column in 0..self.size.columns {
                renderer(visual_row + 1, column + 1, line.cell(column));
            }
        }
    }

    /// Text of one visible row (1-based), padded to the screen width.
    pub fn render_text_line(&self, row: usize) -> String {
        self.buffer().render_text_line(row)
    }

    /// Text of the whole visible grid, one LF-terminated line per row.
    pub fn render_text(&self) -> String {
        self.buffer().render_text()
    }

    /// Text of the n-th scrollback line, 1 being the most recent.
    pub fn render_history_text_line(&self, n: usize) -> Option<String> {
        self.buffer().render_history_text_line(n)
    }
}

/// OSC color report in the `rgb:RRRR/GGGG/BBBB` form xterm answers with.
fn dynamic_color_reply(name: DynamicColorName, color: RgbColor) -> String {
    let scale = |v: u8| u16::from(v) * 0x101;
    format!(
        "\x1b]{};rgb:{:04x}/{:04x}/{:04x}\x1b\\",
        name.code(),
        scale(color.r),
        scale(color.g),
        scale(color.b)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::CharStyle;
    use crate::color::Color;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn screen(columns: usize, rows: usize) -> Screen {
        Screen::new(WindowSize::new(columns, rows), ScreenHooks::default())
    }

    fn write(screen: &mut Screen, text: &str) {
        for ch in text.chars() {
            screen.apply(Command::AppendChar(ch));
        }
    }

    fn screen_with_reply(columns: usize, rows: usize) -> (Screen, Rc<RefCell<Vec<String>>>) {
        let replies = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&replies);
        let hooks = ScreenHooks::new().with_reply(move |s| sink.borrow_mut().push(s.to_owned()));
        (Screen::new(WindowSize::new(columns, rows), hooks), replies)
    }

    #[test]
    fn test_append_and_render() {
        let mut screen = screen(10, 3);
        write(&mut screen, "Hi");
        assert_eq!(screen.render_text_line(1), "Hi        ");
        assert_eq!(screen.real_cursor_position(), Coordinate::new(1, 3));
    }

    #[test]
    fn test_linefeed_with_automatic_newline() {
        let mut screen = screen(10, 3);
        write(&mut screen, "ab");
        screen.apply(Command::SetMode {
            mode: Mode::AutomaticNewLine,
            enable: true,
        });
        screen.apply(Command::Linefeed);
        assert_eq!(screen.real_cursor_position(), Coordinate::new(2, 1));
    }

    #[test]
    fn test_cursor_motion_commands() {
        let mut screen = screen(80, 24);
        screen.apply(Command::MoveCursorTo { row: 11, column: 11 });
        screen.apply(Command::MoveCursorUp(5));
        assert_eq!(screen.real_cursor_position(), Coordinate::new(6, 11));
        screen.apply(Command::MoveCursorDown(3));
        assert_eq!(screen.real_cursor_position(), Coordinate::new(9, 11));
        screen.apply(Command::MoveCursorForward(2));
        assert_eq!(screen.real_cursor_position(), Coordinate::new(9, 13));
        screen.apply(Command::MoveCursorBackward(4));
        assert_eq!(screen.real_cursor_position(), Coordinate::new(9, 9));
        screen.apply(Command::CursorNextLine(2));
        assert_eq!(screen.real_cursor_position(), Coordinate::new(11, 1));
    }

    #[test]
    fn test_zero_counts_default_to_one() {
        let mut screen = screen(80, 24);
        screen.apply(Command::MoveCursorTo { row: 5, column: 5 });
        screen.apply(Command::MoveCursorDown(0));
        assert_eq!(screen.real_cursor_position(), Coordinate::new(6, 5));
        screen.apply(Command::MoveCursorTo { row: 0, column: 0 });
        assert_eq!(screen.real_cursor_position(), Coordinate::new(1, 1));
    }

    #[test]
    fn test_sgr_commands() {
        let mut screen = screen(10, 3);
        screen.apply(Command::SetStyle {
            styles: CharStyle::BOLD,
            enable: true,
        });
        screen.apply(Command::SetForegroundColor(Color::Indexed(1)));
        write(&mut screen, "x");
        let cell = screen.cell_at(Coordinate::new(1, 1));
        assert!(cell.attributes.styles.contains(CharStyle::BOLD));
        assert_eq!(cell.attributes.foreground, Color::Indexed(1));

        screen.apply(Command::ResetGraphicsRendition);
        write(&mut screen, "y");
        let cell = screen.cell_at(Coordinate::new(1, 2));
        assert!(cell.attributes.styles.is_empty());
        assert_eq!(cell.attributes.foreground, Color::Default);
    }

    #[test]
    fn test_alternate_screen_round_trip() {
        let mut screen = screen(10, 3);
        write(&mut screen, "main");
        screen.apply(Command::MoveCursorTo { row: 2, column: 3 });

        screen.apply(Command::SetMode {
            mode: Mode::UseAlternateScreen,
            enable: true,
        });
        assert!(screen.is_alternate_screen());
        assert_eq!(screen.render_text_line(1), "          ");
        write(&mut screen, "X");
        assert_eq!(screen.cell_at(Coordinate::new(1, 1)).display_char(), 'X');

        screen.apply(Command::SetMode {
            mode: Mode::UseAlternateScreen,
            enable: false,
        });
        assert!(screen.is_primary_screen());
        assert_eq!(screen.render_text_line(1), "main      ");
        assert_eq!(screen.real_cursor_position(), Coordinate::new(2, 3));
    }

    #[test]
    fn test_buffer_changed_hook() {
        let changes = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&changes);
        let mut hooks = ScreenHooks::new();
        hooks.on_buffer_changed = Box::new(move |kind| sink.borrow_mut().push(kind));
        let mut screen = Screen::new(WindowSize::new(10, 3), hooks);

        screen.apply(Command::SetMode {
            mode: Mode::UseAlternateScreen,
            enable: true,
        });
        screen.apply(Command::SetMode {
            mode: Mode::UseAlternateScreen,
            enable: false,
        });
        assert_eq!(
            changes.borrow().as_slice(),
            [BufferKind::Alternate, BufferKind::Main]
        );
    }

    #[test]
    fn test_cursor_position_report() {
        let (mut screen, replies) = screen_with_reply(80, 24);
        screen.apply(Command::MoveCursorTo { row: 5, column: 10 });
        screen.apply(Command::ReportCursorPosition);
        assert_eq!(replies.borrow().as_slice(), ["\x1b[5;10R"]);
    }

    #[test]
    fn test_cursor_position_report_is_logical() {
        let (mut screen, replies) = screen_with_reply(80, 24);
        screen.apply(Command::SetTopBottomMargin {
            top: Some(5),
            bottom: Some(20),
        });
        screen.apply(Command::SetMode {
            mode: Mode::Origin,
            enable: true,
        });
        screen.apply(Command::MoveCursorTo { row: 2, column: 3 });
        screen.apply(Command::ReportCursorPosition);
        assert_eq!(replies.borrow().as_slice(), ["\x1b[2;3R"]);
    }

    #[test]
    fn test_device_reports() {
        let (mut screen, replies) = screen_with_reply(80, 24);
        screen.apply(Command::DeviceStatusReport);
        screen.apply(Command::SendDeviceAttributes);
        screen.apply(Command::SendTerminalId);
        let replies = replies.borrow();
        assert_eq!(replies[0], "\x1b[0n");
        assert_eq!(replies[1], "\x1b[?64;1;2;4;6;9;15;18;21;22c");
        assert_eq!(replies[2], "\x1b[>1;10;0c");
    }

    #[test]
    fn test_mode_report() {
        let (mut screen, replies) = screen_with_reply(80, 24);
        screen.apply(Command::RequestMode(Mode::AutoWrap));
        screen.apply(Command::SetMode {
            mode: Mode::AutoWrap,
            enable: false,
        });
        screen.apply(Command::RequestMode(Mode::AutoWrap));
        screen.apply(Command::RequestMode(Mode::Insert));
        let replies = replies.borrow();
        assert_eq!(replies[0], "\x1b[?7;1$y");
        assert_eq!(replies[1], "\x1b[?7;2$y");
        assert_eq!(replies[2], "\x1b[4;2$y");
    }

    #[test]
    fn test_tab_stop_report() {
        let (mut screen, replies) = screen_with_reply(24, 3);
        screen.apply(Command::RequestTabStops);
        assert_eq!(replies.borrow().as_slice(), ["\x1bP2$u9/17\x1b\\"]);
    }

    #[test]
    fn test_mode_save_restore() {
        let mut screen = screen(80, 24);
        screen.apply(Command::SaveModes(vec![Mode::AutoWrap]));
        screen.apply(Command::SetMode {
            mode: Mode::AutoWrap,
            enable: false,
        });
        assert!(!screen.is_mode_enabled(Mode::AutoWrap));
        screen.apply(Command::RestoreModes(vec![Mode::AutoWrap]));
        assert!(screen.is_mode_enabled(Mode::AutoWrap));
    }

    #[test]
    fn test_mode_save_restore_ignores_ansi_modes() {
        let mut screen = screen(80, 24);
        screen.apply(Command::SaveModes(vec![Mode::Insert]));
        screen.apply(Command::SetMode {
            mode: Mode::Insert,
            enable: true,
        });
        screen.apply(Command::RestoreModes(vec![Mode::Insert]));
        assert!(screen.is_mode_enabled(Mode::Insert));
    }

    #[test]
    fn test_window_title_stack() {
        let mut screen = screen(80, 24);
        screen.apply(Command::ChangeWindowTitle("first".into()));
        screen.apply(Command::SaveWindowTitle);
        screen.apply(Command::ChangeWindowTitle("second".into()));
        assert_eq!(screen.window_title(), "second");
        screen.apply(Command::RestoreWindowTitle);
        assert_eq!(screen.window_title(), "first");
    }

    #[test]
    fn test_dynamic_color_query() {
        let replies = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&replies);
        let mut hooks = ScreenHooks::new().with_reply(move |s| sink.borrow_mut().push(s.to_owned()));
        hooks.request_dynamic_color = Box::new(|name| {
            (name == DynamicColorName::DefaultBackgroundColor).then(|| RgbColor::new(0, 0, 0))
        });
        let mut screen = Screen::new(WindowSize::new(80, 24), hooks);

        screen.apply(Command::RequestDynamicColor(
            DynamicColorName::DefaultBackgroundColor,
        ));
        screen.apply(Command::RequestDynamicColor(
            DynamicColorName::TextCursorColor,
        ));
        assert_eq!(
            replies.borrow().as_slice(),
            ["\x1b]11;rgb:0000/0000/0000\x1b\\"]
        );
    }

    #[test]
    fn test_viewport_scrolling() {
        let mut screen = screen(10, 2);
        for i in 0..6 {
            write(&mut screen, &i.to_string());
            screen.apply(Command::CarriageReturn);
            screen.apply(Command::Linefeed);
        }
        assert_eq!(screen.history_line_count(), 5);
        assert!(screen.scroll_up(2));
        assert_eq!(screen.scroll_offset(), 2);
        assert!(screen.scroll_up(100));
        assert_eq!(screen.scroll_offset(), 5);
        assert!(!screen.scroll_up(1));
        assert!(screen.scroll_to_bottom());
        assert_eq!(screen.scroll_offset(), 0);
    }

    #[test]
    fn test_render_respects_scroll_offset() {
        let mut screen = screen(3, 2);
        for i in 0..4 {
            write(&mut screen, &i.to_string());
            screen.apply(Command::CarriageReturn);
            screen.apply(Command::Linefeed);
        }
        // Visible now: "3", blank; history: "0", "1", "2"
        let mut rows = vec![String::new(); 2];
        screen.render(
            |row, _, cell| rows[row - 1].push(cell.display_char()),
            2,
        );
        assert_eq!(rows[0].trim_end(), "1");
        assert_eq!(rows[1].trim_end(), "2");
    }

    #[test]
    fn test_mark_navigation_via_screen() {
        let mut screen = screen(10, 2);
        screen.apply(Command::SetMark);
        for i in 0..5 {
            write(&mut screen, &i.to_string());
            screen.apply(Command::CarriageReturn);
            screen.apply(Command::Linefeed);
        }
        assert!(screen.scroll_mark_up());
        let offset = screen.scroll_offset();
        assert!(offset > 0);
        assert!(screen.scroll_mark_down());
        assert_eq!(screen.scroll_offset(), 0);
    }

    #[test]
    fn test_hard_reset() {
        let mut screen = screen(10, 3);
        write(&mut screen, "data");
        screen.apply(Command::ChangeWindowTitle("title".into()));
        screen.apply(Command::SetMode {
            mode: Mode::UseAlternateScreen,
            enable: true,
        });
        screen.apply(Command::FullReset);

        assert!(screen.is_primary_screen());
        assert_eq!(screen.window_title(), "");
        assert_eq!(screen.render_text_line(1), "          ");
        assert_eq!(screen.history_line_count(), 0);
        assert_eq!(screen.real_cursor_position(), Coordinate::new(1, 1));
    }

    #[test]
    fn test_soft_reset_idempotent() {
        let mut screen = screen(10, 3);
        write(&mut screen, "abc");
        screen.apply(Command::SoftReset);
        let first = screen.render_text();
        let cursor = screen.real_cursor_position();
        screen.apply(Command::SoftReset);
        assert_eq!(screen.render_text(), first);
        assert_eq!(screen.real_cursor_position(), cursor);
    }

    #[test]
    fn test_resize_window_command_fires_hook_only() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut hooks = ScreenHooks::new();
        hooks.resize_window = Box::new(move |c, r, px| sink.borrow_mut().push((c, r, px)));
        let mut screen = Screen::new(WindowSize::new(80, 24), hooks);

        screen.apply(Command::ResizeWindow {
            columns: 132,
            rows: 43,
            in_pixels: false,
        });
        assert_eq!(seen.borrow().as_slice(), [(132, 43, false)]);
        assert_eq!(screen.size(), WindowSize::new(80, 24));
    }

    #[test]
    fn test_bell_and_notify_hooks() {
        let rang = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&rang);
        let mut hooks = ScreenHooks::new().with_bell(move || *sink.borrow_mut() += 1);
        let notified = Rc::new(RefCell::new(Vec::new()));
        let nsink = Rc::clone(&notified);
        hooks.notify = Box::new(move |title, body| {
            nsink.borrow_mut().push((title.to_owned(), body.to_owned()))
        });
        let mut screen = Screen::new(WindowSize::new(10, 3), hooks);

        screen.apply(Command::Bell);
        screen.apply(Command::Notify {
            title: "t".into(),
            body: "b".into(),
        });
        assert_eq!(*rang.borrow(), 1);
        assert_eq!(
            notified.borrow().as_slice(),
            [("t".to_owned(), "b".to_owned())]
        );
    }

    #[test]
    fn test_on_commands_batch_hook() {
        let count = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&count);
        let mut hooks = ScreenHooks::new();
        hooks.on_commands = Box::new(move |batch| *sink.borrow_mut() += batch.len());
        let mut screen = Screen::new(WindowSize::new(10, 3), hooks);

        screen.apply_all(&[
            Command::AppendChar('a'),
            Command::AppendChar('b'),
            Command::Linefeed,
        ]);
        assert_eq!(*count.borrow(), 3);
        assert_eq!(screen.render_text_line(1), "ab        ");
    }
}
