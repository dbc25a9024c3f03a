//! Screen buffer: one grid with margins, modes, tabs, and scrollback
//!
//! A `ScreenBuffer` owns every grid-mutating primitive: writing
//! grapheme clusters, scrolling, inserting and deleting rows, columns,
//! and characters, erasing regions, and cursor addressing under origin
//! mode. The `Screen` dispatches commands onto these primitives and
//! owns a main/alternate pair of buffers.
//!
//! All row/column fields here are 0-indexed; translation from the
//! 1-based wire coordinates happens in the cursor addressing methods.

use std::collections::VecDeque;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::cell::{char_width, Cell, CharStyle, GraphicsAttributes};
use crate::color::Color;
use crate::cursor::{Cursor, SavedState};
use crate::error::StateError;
use crate::hyperlink::{Hyperlink, HyperlinkTable};
use crate::line::Line;
use crate::modes::{Mode, ModeSet};
use crate::tabs::TabStops;
use crate::{Coordinate, WindowSize};

/// Maximum depth of the cursor save stack.
pub const MAX_SAVED_STATES: usize = 10;

/// Whether a buffer backs the main or the alternate screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BufferKind {
    Main,
    Alternate,
}

/// Inclusive 0-based row or column range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarginRange {
    pub from: usize,
    pub to: usize,
}

impl MarginRange {
    pub fn len(&self) -> usize {
        self.to - self.from + 1
    }

    pub fn contains(&self, value: usize) -> bool {
        self.from <= value && value <= self.to
    }
}

/// Scroll region: vertical (top/bottom) and horizontal (left/right) margins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Margin {
    pub vertical: MarginRange,
    pub horizontal: MarginRange,
}

impl Margin {
    /// A margin covering the whole screen.
    pub fn full(size: WindowSize) -> Self {
        Self {
            vertical: MarginRange {
                from: 0,
                to: size.rows - 1,
            },
            horizontal: MarginRange {
                from: 0,
                to: size.columns - 1,
            },
        }
    }

    pub fn is_full(&self, size: WindowSize) -> bool {
        *self == Self::full(size)
    }
}

/// A single screen buffer: grid, scrollback, cursor, margins, and modes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenBuffer {
    kind: BufferKind,
    size: WindowSize,
    max_history: Option<usize>,
    margin: Margin,
    modes: ModeSet,
    cursor: Cursor,
    wrap_pending: bool,
    rendition: GraphicsAttributes,
    lines: VecDeque<Line>,
    saved_lines: VecDeque<Line>,
    tabs: TabStops,
    saved_states: Vec<SavedState>,
    current_hyperlink: Option<Arc<Hyperlink>>,
    hyperlinks: HyperlinkTable,
    /// Grid position of the most recently written base cluster, kept as
    /// indices rather than a reference so grid mutation cannot leave it
    /// dangling.
    last_cell: Option<(usize, usize)>,
}

impl ScreenBuffer {
    pub fn new(
        kind: BufferKind,
        size: WindowSize,
        max_history: Option<usize>,
        tab_width: usize,
    ) -> Self {
        let lines = (0..size.rows).map(|_| Line::new(size.columns)).collect();
        Self {
            kind,
            size,
            max_history: match kind {
                BufferKind::Main => max_history,
                BufferKind::Alternate => Some(0),
            },
            margin: Margin::full(size),
            modes: ModeSet::new(),
            cursor: Cursor::new(),
            wrap_pending: false,
            rendition: GraphicsAttributes::default(),
            lines,
            saved_lines: VecDeque::new(),
            tabs: TabStops::new(size.columns, tab_width),
            saved_states: Vec::new(),
            current_hyperlink: None,
            hyperlinks: HyperlinkTable::new(),
            last_cell: None,
        }
    }

    // --- Accessors ---

    pub fn kind(&self) -> BufferKind {
        self.kind
    }

    pub fn size(&self) -> WindowSize {
        self.size
    }

    pub fn margin(&self) -> &Margin {
        &self.margin
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn wrap_pending(&self) -> bool {
        self.wrap_pending
    }

    pub fn rendition(&self) -> &GraphicsAttributes {
        &self.rendition
    }

    pub fn modes(&self) -> &ModeSet {
        &self.modes
    }

    pub fn line(&self, row: usize) -> &Line {
        &self.lines[row]
    }

    pub fn line_mut(&mut self, row: usize) -> &mut Line {
        &mut self.lines[row]
    }

    /// Cell at a 1-based screen coordinate, clamped into range.
    pub fn cell_at(&self, coord: Coordinate) -> &Cell {
        let row = coord.row.clamp(1, self.size.rows) - 1;
        let column = coord.column.clamp(1, self.size.columns) - 1;
        self.lines[row].cell(column)
    }

    pub fn saved_lines(&self) -> &VecDeque<Line> {
        &self.saved_lines
    }

    pub fn history_line_count(&self) -> usize {
        self.saved_lines.len()
    }

    pub fn max_history_line_count(&self) -> Option<usize> {
        self.max_history
    }

    /// Adjust the history limit, evicting oldest lines immediately.
    pub fn set_max_history_line_count(&mut self, limit: Option<usize>) {
        self.max_history = limit;
        if let Some(limit) = limit {
            while self.saved_lines.len() > limit {
                self.saved_lines.pop_front();
            }
        }
    }

    pub fn current_hyperlink(&self) -> Option<&Arc<Hyperlink>> {
        self.current_hyperlink.as_ref()
    }

    pub fn hyperlinks(&self) -> &HyperlinkTable {
        &self.hyperlinks
    }

    pub fn saved_state_depth(&self) -> usize {
        self.saved_states.len()
    }

    pub fn auto_wrap(&self) -> bool {
        self.modes.contains(Mode::AutoWrap)
    }

    pub fn origin_mode(&self) -> bool {
        self.modes.contains(Mode::Origin)
    }

    fn horizontal_margins_active(&self) -> bool {
        self.modes.contains(Mode::LeftRightMargin)
    }

    /// Leftmost column writes and horizontal motion are bounded by.
    fn left_edge(&self) -> usize {
        if self.horizontal_margins_active() {
            self.margin.horizontal.from
        } else {
            0
        }
    }

    /// Rightmost column writes and horizontal motion are bounded by.
    fn right_edge(&self) -> usize {
        if self.horizontal_margins_active() {
            self.margin.horizontal.to
        } else {
            self.size.columns - 1
        }
    }

    pub fn is_cursor_inside_margins(&self) -> bool {
        let vertical = self.margin.vertical.contains(self.cursor.row);
        let horizontal = !self.horizontal_margins_active()
            || self.margin.horizontal.contains(self.cursor.column);
        vertical && horizontal
    }

    /// A blank cell carrying the current background color, used as fill
    /// by every erase and scroll primitive.
    fn erased_cell(&self) -> Cell {
        let attrs = GraphicsAttributes {
            background: self.rendition.background,
            ..GraphicsAttributes::default()
        };
        Cell::erased(attrs)
    }

    // --- Cursor position reporting ---

    /// Cursor position in absolute 1-based screen coordinates.
    pub fn real_cursor_position(&self) -> Coordinate {
        Coordinate::new(self.cursor.row + 1, self.cursor.column + 1)
    }

    /// Cursor position as reported to applications: margin-relative
    /// when origin mode is enabled.
    pub fn cursor_position(&self) -> Coordinate {
        if self.origin_mode() {
            let h_from = if self.horizontal_margins_active() {
                self.margin.horizontal.from
            } else {
                0
            };
            Coordinate::new(
                self.cursor.row - self.margin.vertical.from + 1,
                self.cursor.column - h_from + 1,
            )
        } else {
            self.real_cursor_position()
        }
    }

    // --- Grapheme write path ---

    /// Write one Unicode scalar at the cursor.
    ///
    /// Combining marks (width 0) join the previously written cluster;
    /// base characters honor insert mode, wide-cell placement, the
    /// right margin, and autowrap/wrap-pending.
    pub fn append_char(&mut self, ch: char) {
        let width = char_width(ch) as usize;

        if width == 0 {
            self.append_to_last_cell(ch);
            return;
        }

        if self.wrap_pending && self.auto_wrap() {
            self.wrap_pending = false;
            self.cursor.column = self.left_edge();
            self.linefeed();
        }

        let right = self.right_edge();

        if width == 2 && self.cursor.column >= right {
            if self.auto_wrap() {
                // A wide cell cannot straddle the margin: blank the last
                // column and place the cluster on the next line.
                let fill = self.erased_cell();
                let (row, column) = (self.cursor.row, self.cursor.column);
                self.lines[row].erase_range(column, column, &fill);
                self.cursor.column = self.left_edge();
                self.linefeed();
            } else {
                return;
            }
        }

        if self.modes.contains(Mode::Insert) {
            let fill = self.erased_cell();
            let (row, column) = (self.cursor.row, self.cursor.column);
            self.lines[row].insert_cells(column, width, right, &fill);
        }

        self.write_cluster(ch, width);

        let next = self.cursor.column + width;
        if next > right {
            self.cursor.column = right;
            if self.auto_wrap() {
                self.wrap_pending = true;
            }
        } else {
            self.cursor.column = next;
        }
    }

    fn write_cluster(&mut self, ch: char, width: usize) {
        let (row, column) = (self.cursor.row, self.cursor.column);
        self.release_wide_pair(row, column);
        if width == 2 {
            self.release_wide_pair(row, column + 1);
        }

        let rendition = self.rendition;
        let hyperlink = self.current_hyperlink.clone();
        let cell = self.lines[row].cell_mut(column);
        cell.set_char(ch);
        cell.attributes = rendition;
        cell.hyperlink = hyperlink;

        if width == 2 && column + 1 < self.size.columns {
            self.lines[row].cell_mut(column + 1).set_continuation(rendition);
        }
        self.last_cell = Some((row, column));
    }

    fn append_to_last_cell(&mut self, ch: char) {
        let Some((row, column)) = self.last_cell else {
            return;
        };
        if row >= self.size.rows || column >= self.size.columns {
            self.last_cell = None;
            return;
        }

        let widened = self.lines[row].cell_mut(column).append_codepoint(ch);
        if widened > 0 && column + 1 < self.size.columns {
            let attrs = self.lines[row].cell(column).attributes;
            self.release_wide_pair(row, column + 1);
            self.lines[row].cell_mut(column + 1).set_continuation(attrs);

            // The cursor sat on the column the cluster just grew into.
            if self.cursor.row == row && self.cursor.column == column + 1 {
                let right = self.right_edge();
                if column + 2 > right {
                    self.cursor.column = right;
                    if self.auto_wrap() {
                        self.wrap_pending = true;
                    }
                } else {
                    self.cursor.column = column + 2;
                }
            }
        }
    }

    /// Overwriting one half of a wide pair blanks the other half so no
    /// orphaned leader or continuation survives.
    fn release_wide_pair(&mut self, row: usize, column: usize) {
        if column >= self.size.columns {
            return;
        }
        let fill = self.erased_cell();
        let line = &self.lines[row];
        if line.cell(column).is_continuation() {
            if column > 0 && line.cell(column - 1).width() == 2 {
                self.lines[row].erase_range(column - 1, column - 1, &fill);
            }
        } else if line.cell(column).width() == 2
            && column + 1 < self.size.columns
            && line.cell(column + 1).is_continuation()
        {
            self.lines[row].erase_range(column + 1, column + 1, &fill);
        }
    }

    // --- Vertical motion and scrolling ---

    /// Move down one row, scrolling when at the bottom margin.
    pub fn linefeed(&mut self) {
        self.wrap_pending = false;
        if self.cursor.row == self.margin.vertical.to {
            self.scroll_up(1);
        } else if self.cursor.row + 1 < self.size.rows {
            self.cursor.row += 1;
        }
    }

    /// Move up one row, scrolling down when at the top margin.
    pub fn reverse_index(&mut self) {
        self.wrap_pending = false;
        if self.cursor.row == self.margin.vertical.from {
            self.scroll_down(1);
        } else if self.cursor.row > 0 {
            self.cursor.row -= 1;
        }
    }

    /// Move left one column; at the left margin, scroll the region
    /// right instead.
    pub fn back_index(&mut self) {
        self.wrap_pending = false;
        if self.cursor.column == self.left_edge() {
            self.insert_columns_at(self.left_edge(), 1);
        } else if self.cursor.column > 0 {
            self.cursor.column -= 1;
        }
    }

    /// Move right one column; at the right margin, scroll the region
    /// left instead.
    pub fn forward_index(&mut self) {
        self.wrap_pending = false;
        if self.cursor.column == self.right_edge() {
            self.delete_columns_at(self.left_edge(), 1);
        } else if self.cursor.column + 1 < self.size.columns {
            self.cursor.column += 1;
        }
    }

    pub fn carriage_return(&mut self) {
        self.wrap_pending = false;
        let left = self.left_edge();
        self.cursor.column = if self.cursor.column >= left { left } else { 0 };
    }

    /// Scroll the margin region up, feeding scrolled-off lines into
    /// scrollback when the region is the whole main screen.
    pub fn scroll_up(&mut self, n: usize) {
        let margin = self.margin;
        let capture = self.kind == BufferKind::Main && margin.is_full(self.size);
        self.scroll_up_in(n, &margin, capture);
    }

    pub fn scroll_down(&mut self, n: usize) {
        let margin = self.margin;
        self.scroll_down_in(n, &margin);
    }

    fn scroll_up_in(&mut self, n: usize, margin: &Margin, capture: bool) {
        let v = margin.vertical;
        let h = margin.horizontal;
        let n = n.max(1).min(v.len());
        let fill = self.erased_cell();
        let full_width = h.from == 0 && h.to == self.size.columns - 1;

        if full_width {
            for _ in 0..n {
                if let Some(line) = self.lines.remove(v.from) {
                    if capture {
                        self.push_saved_line(line);
                    }
                }
                self.lines
                    .insert(v.to, Line::filled(self.size.columns, fill.clone()));
            }
        } else {
            for row in v.from..=v.to {
                if row + n <= v.to {
                    let src: Vec<Cell> =
                        self.lines[row + n].cells()[h.from..=h.to].to_vec();
                    let dst = &mut self.lines[row];
                    for (i, cell) in src.into_iter().enumerate() {
                        *dst.cell_mut(h.from + i) = cell;
                    }
                } else {
                    self.lines[row].erase_range(h.from, h.to, &fill);
                }
            }
        }
    }

    fn scroll_down_in(&mut self, n: usize, margin: &Margin) {
        let v = margin.vertical;
        let h = margin.horizontal;
        let n = n.max(1).min(v.len());
        let fill = self.erased_cell();
        let full_width = h.from == 0 && h.to == self.size.columns - 1;

        if full_width {
            for _ in 0..n {
                self.lines.remove(v.to);
                self.lines
                    .insert(v.from, Line::filled(self.size.columns, fill.clone()));
            }
        } else {
            for row in (v.from..=v.to).rev() {
                if row >= v.from + n {
                    let src: Vec<Cell> =
                        self.lines[row - n].cells()[h.from..=h.to].to_vec();
                    let dst = &mut self.lines[row];
                    for (i, cell) in src.into_iter().enumerate() {
                        *dst.cell_mut(h.from + i) = cell;
                    }
                } else {
                    self.lines[row].erase_range(h.from, h.to, &fill);
                }
            }
        }
    }

    fn push_saved_line(&mut self, line: Line) {
        if self.max_history == Some(0) {
            return;
        }
        self.saved_lines.push_back(line);
        if let Some(limit) = self.max_history {
            while self.saved_lines.len() > limit {
                self.saved_lines.pop_front();
            }
        }
    }

    /// Insert blank lines at the cursor, pushing lines below toward the
    /// bottom margin. No-op outside the margins.
    pub fn insert_lines(&mut self, n: usize) {
        if !self.is_cursor_inside_margins() {
            return;
        }
        let margin = Margin {
            vertical: MarginRange {
                from: self.cursor.row,
                to: self.margin.vertical.to,
            },
            horizontal: self.margin.horizontal,
        };
        self.scroll_down_in(n, &margin);
    }

    /// Delete lines at the cursor, pulling lines up from the bottom
    /// margin. Never feeds scrollback.
    pub fn delete_lines(&mut self, n: usize) {
        if !self.is_cursor_inside_margins() {
            return;
        }
        let margin = Margin {
            vertical: MarginRange {
                from: self.cursor.row,
                to: self.margin.vertical.to,
            },
            horizontal: self.margin.horizontal,
        };
        self.scroll_up_in(n, &margin, false);
    }

    pub fn insert_chars(&mut self, n: usize) {
        let right = self.right_edge();
        let fill = self.erased_cell();
        let (row, column) = (self.cursor.row, self.cursor.column);
        self.lines[row].insert_cells(column, n.max(1), right, &fill);
    }

    pub fn delete_chars(&mut self, n: usize) {
        let right = self.right_edge();
        let fill = self.erased_cell();
        let (row, column) = (self.cursor.row, self.cursor.column);
        self.lines[row].delete_cells(column, n.max(1), right, &fill);
    }

    pub fn insert_columns(&mut self, n: usize) {
        if !self.is_cursor_inside_margins() {
            return;
        }
        self.insert_columns_at(self.cursor.column, n);
    }

    pub fn delete_columns(&mut self, n: usize) {
        if !self.is_cursor_inside_margins() {
            return;
        }
        self.delete_columns_at(self.cursor.column, n);
    }

    fn insert_columns_at(&mut self, column: usize, n: usize) {
        let right = self.right_edge();
        let fill = self.erased_cell();
        let v = self.margin.vertical;
        for row in v.from..=v.to {
            self.lines[row].insert_cells(column, n.max(1), right, &fill);
        }
    }

    fn delete_columns_at(&mut self, column: usize, n: usize) {
        let right = self.right_edge();
        let fill = self.erased_cell();
        let v = self.margin.vertical;
        for row in v.from..=v.to {
            self.lines[row].delete_cells(column, n.max(1), right, &fill);
        }
    }

    // --- Erase operations ---

    pub fn clear_to_end_of_line(&mut self) {
        let fill = self.erased_cell();
        let (row, column) = (self.cursor.row, self.cursor.column);
        self.lines[row].erase_range(column, self.size.columns - 1, &fill);
    }

    pub fn clear_to_begin_of_line(&mut self) {
        let fill = self.erased_cell();
        let (row, column) = (self.cursor.row, self.cursor.column);
        self.lines[row].erase_range(0, column, &fill);
    }

    pub fn clear_line(&mut self) {
        let fill = self.erased_cell();
        let row = self.cursor.row;
        self.lines[row].fill_with(&fill);
    }

    pub fn clear_to_end_of_screen(&mut self) {
        self.clear_to_end_of_line();
        let fill = self.erased_cell();
        for row in (self.cursor.row + 1)..self.size.rows {
            self.lines[row].fill_with(&fill);
        }
    }

    pub fn clear_to_begin_of_screen(&mut self) {
        self.clear_to_begin_of_line();
        let fill = self.erased_cell();
        for row in 0..self.cursor.row {
            self.lines[row].fill_with(&fill);
        }
    }

    pub fn clear_screen(&mut self) {
        let fill = self.erased_cell();
        for line in &mut self.lines {
            line.fill_with(&fill);
        }
        self.hyperlinks.prune();
    }

    pub fn erase_chars(&mut self, n: usize) {
        let fill = self.erased_cell();
        let (row, column) = (self.cursor.row, self.cursor.column);
        let to = (column + n.max(1) - 1).min(self.size.columns - 1);
        self.lines[row].erase_range(column, to, &fill);
    }

    /// Discard scrollback; the visible grid and cursor are untouched.
    pub fn clear_scrollback(&mut self) {
        self.saved_lines.clear();
    }

    /// DECALN: fill the screen with `E`, reset margins, home the cursor.
    pub fn screen_alignment_pattern(&mut self) {
        let cell = Cell::with_char('E', GraphicsAttributes::default());
        for line in &mut self.lines {
            line.fill_with(&cell);
        }
        self.margin = Margin::full(self.size);
        self.cursor.row = 0;
        self.cursor.column = 0;
        self.wrap_pending = false;
    }

    // --- Cursor addressing ---

    /// CUP/HVP: 1-based coordinates, margin-relative under origin mode.
    pub fn move_cursor_to(&mut self, row: usize, column: usize) {
        let row = row.max(1) - 1;
        let column = column.max(1) - 1;
        if self.origin_mode() {
            let v = self.margin.vertical;
            let h_from = if self.horizontal_margins_active() {
                self.margin.horizontal.from
            } else {
                0
            };
            let h_to = if self.horizontal_margins_active() {
                self.margin.horizontal.to
            } else {
                self.size.columns - 1
            };
            self.cursor.row = (v.from + row).min(v.to);
            self.cursor.column = (h_from + column).min(h_to);
        } else {
            self.cursor.row = row.min(self.size.rows - 1);
            self.cursor.column = column.min(self.size.columns - 1);
        }
        self.wrap_pending = false;
    }

    pub fn move_cursor_up(&mut self, n: usize) {
        let n = n.max(1);
        let top = self.margin.vertical.from;
        let bound = if self.cursor.row >= top { top } else { 0 };
        self.cursor.row = self.cursor.row.saturating_sub(n).max(bound);
        self.wrap_pending = false;
    }

    pub fn move_cursor_down(&mut self, n: usize) {
        let n = n.max(1);
        let bottom = self.margin.vertical.to;
        let bound = if self.cursor.row <= bottom {
            bottom
        } else {
            self.size.rows - 1
        };
        self.cursor.row = (self.cursor.row + n).min(bound);
        self.wrap_pending = false;
    }

    pub fn move_cursor_forward(&mut self, n: usize) {
        let n = n.max(1);
        let right = self.right_edge();
        let bound = if self.cursor.column <= right {
            right
        } else {
            self.size.columns - 1
        };
        self.cursor.column = (self.cursor.column + n).min(bound);
        self.wrap_pending = false;
    }

    pub fn move_cursor_backward(&mut self, n: usize) {
        let n = n.max(1);
        let left = self.left_edge();
        let bound = if self.cursor.column >= left { left } else { 0 };
        self.cursor.column = self.cursor.column.saturating_sub(n).max(bound);
        self.wrap_pending = false;
    }

    /// CHA/HPA: 1-based absolute column, margin-relative under origin mode.
    pub fn set_cursor_column(&mut self, column: usize) {
        let column = column.max(1) - 1;
        if self.origin_mode() && self.horizontal_margins_active() {
            let h = self.margin.horizontal;
            self.cursor.column = (h.from + column).min(h.to);
        } else {
            self.cursor.column = column.min(self.size.columns - 1);
        }
        self.wrap_pending = false;
    }

    /// VPA: 1-based absolute row, margin-relative under origin mode.
    pub fn set_cursor_row(&mut self, row: usize) {
        let row = row.max(1) - 1;
        if self.origin_mode() {
            let v = self.margin.vertical;
            self.cursor.row = (v.from + row).min(v.to);
        } else {
            self.cursor.row = row.min(self.size.rows - 1);
        }
        self.wrap_pending = false;
    }

    pub fn move_cursor_to_next_tab(&mut self, count: usize) {
        let right = self.right_edge();
        self.cursor.column = self.tabs.next_stop(self.cursor.column, count, right);
        self.wrap_pending = false;
    }

    pub fn cursor_backward_tab(&mut self, count: usize) {
        let left = self.left_edge();
        self.cursor.column = self.tabs.prev_stop(self.cursor.column, count, left);
        self.wrap_pending = false;
    }

    pub fn set_tab(&mut self) {
        self.tabs.set(self.cursor.column);
    }

    pub fn clear_tab_under_cursor(&mut self) {
        self.tabs.clear(self.cursor.column);
    }

    pub fn clear_all_tabs(&mut self) {
        self.tabs.clear_all();
    }

    /// 1-based columns that carry a tab stop, for the tab stop report.
    pub fn tab_stop_positions(&self) -> Vec<usize> {
        self.tabs.positions().into_iter().map(|c| c + 1).collect()
    }

    // --- Margins ---

    /// DECSTBM. `None` selects the screen edge; the cursor homes after.
    pub fn set_vertical_margin(&mut self, top: Option<usize>, bottom: Option<usize>) {
        let from = top.unwrap_or(1).max(1) - 1;
        let to = bottom
            .unwrap_or(self.size.rows)
            .clamp(1, self.size.rows)
            - 1;
        if from < to {
            self.margin.vertical = MarginRange { from, to };
            self.move_cursor_to(1, 1);
        }
    }

    /// DECSLRM; only honored while the left/right margin mode is set.
    pub fn set_horizontal_margin(&mut self, left: Option<usize>, right: Option<usize>) {
        if !self.horizontal_margins_active() {
            return;
        }
        let from = left.unwrap_or(1).max(1) - 1;
        let to = right
            .unwrap_or(self.size.columns)
            .clamp(1, self.size.columns)
            - 1;
        if from < to {
            self.margin.horizontal = MarginRange { from, to };
            self.move_cursor_to(1, 1);
        }
    }

    // --- Modes ---

    pub fn is_mode_enabled(&self, mode: Mode) -> bool {
        self.modes.contains(mode)
    }

    /// Enable or disable a mode, applying its grid-local side effects.
    pub fn set_mode(&mut self, mode: Mode, enable: bool) {
        match mode {
            Mode::VisibleCursor => {
                self.cursor.visible = enable;
                self.modes.set(mode, enable);
            }
            Mode::Origin => {
                self.modes.set(mode, enable);
                self.move_cursor_to(1, 1);
            }
            Mode::LeftRightMargin => {
                self.modes.set(mode, enable);
                if !enable {
                    self.margin.horizontal = MarginRange {
                        from: 0,
                        to: self.size.columns - 1,
                    };
                }
            }
            _ => self.modes.set(mode, enable),
        }
    }

    // --- Graphics rendition ---

    pub fn set_foreground_color(&mut self, color: Color) {
        self.rendition.foreground = color;
    }

    pub fn set_background_color(&mut self, color: Color) {
        self.rendition.background = color;
    }

    pub fn set_underline_color(&mut self, color: Color) {
        self.rendition.underline_color = color;
    }

    pub fn set_style(&mut self, styles: CharStyle, enable: bool) {
        if enable {
            self.rendition.styles |= styles;
        } else {
            self.rendition.styles &= !styles;
        }
    }

    pub fn reset_rendition(&mut self) {
        self.rendition.reset();
    }

    // --- Cursor state save/restore ---

    /// DECSC: push cursor position, rendition, autowrap, and origin mode.
    pub fn save_state(&mut self) {
        if self.saved_states.len() == MAX_SAVED_STATES {
            self.saved_states.remove(0);
        }
        self.saved_states.push(SavedState {
            row: self.cursor.row,
            column: self.cursor.column,
            rendition: self.rendition,
            auto_wrap: self.auto_wrap(),
            origin_mode: self.origin_mode(),
        });
    }

    /// DECRC: pop the last save; with an empty stack, reset to home
    /// with the default rendition, autowrap on, origin off.
    pub fn restore_state(&mut self) {
        match self.saved_states.pop() {
            Some(state) => {
                self.cursor.row = state.row.min(self.size.rows - 1);
                self.cursor.column = state.column.min(self.size.columns - 1);
                self.rendition = state.rendition;
                self.modes.set(Mode::AutoWrap, state.auto_wrap);
                self.modes.set(Mode::Origin, state.origin_mode);
            }
            None => {
                self.cursor.row = 0;
                self.cursor.column = 0;
                self.rendition = GraphicsAttributes::default();
                self.modes.set(Mode::AutoWrap, true);
                self.modes.set(Mode::Origin, false);
            }
        }
        self.wrap_pending = false;
    }

    // --- Hyperlinks and marks ---

    /// Start or end an OSC 8 hyperlink span; an empty URI ends it.
    pub fn set_hyperlink(&mut self, id: Option<&str>, uri: &str) {
        self.current_hyperlink = if uri.is_empty() {
            None
        } else {
            Some(self.hyperlinks.intern(id, uri))
        };
    }

    pub fn set_mark(&mut self) {
        let row = self.cursor.row;
        self.lines[row].marked = true;
    }

    /// Offset of the nearest marked scrollback line above the viewport,
    /// scanning from the current offset toward older history.
    pub fn find_prev_marker(&self, scroll_offset: usize) -> Option<usize> {
        let len = self.saved_lines.len();
        let offset = scroll_offset.min(len);
        self.saved_lines
            .iter()
            .enumerate()
            .take(len - offset)
            .rev()
            .find(|(_, line)| line.marked)
            .map(|(i, _)| len - i)
    }

    /// Offset of the nearest marked scrollback line below the viewport,
    /// scanning toward the live screen.
    pub fn find_next_marker(&self, scroll_offset: usize) -> Option<usize> {
        let len = self.saved_lines.len();
        let offset = scroll_offset.min(len);
        if offset == 0 {
            return None;
        }
        self.saved_lines
            .iter()
            .enumerate()
            .skip(len - offset + 1)
            .find(|(_, line)| line.marked)
            .map(|(i, _)| len - i)
    }

    // --- Reset and resize ---

    /// DECSTR: home the cursor, default rendition, autowrap on, origin
    /// off, full-screen margins, save stack cleared, insert off, cursor
    /// visible. Grid contents survive.
    pub fn soft_reset(&mut self) {
        self.cursor = Cursor::new();
        self.wrap_pending = false;
        self.rendition = GraphicsAttributes::default();
        self.margin = Margin::full(self.size);
        self.saved_states.clear();
        self.modes.set(Mode::AutoWrap, true);
        self.modes.set(Mode::Origin, false);
        self.modes.set(Mode::Insert, false);
        self.modes.set(Mode::VisibleCursor, true);
        self.modes.set(Mode::LeftRightMargin, false);
    }

    /// Resize the grid, exchanging rows with scrollback on the main
    /// buffer and resetting margins.
    pub fn resize(&mut self, new_size: WindowSize) {
        if new_size == self.size {
            return;
        }
        let fill = Cell::new();
        for line in &mut self.lines {
            line.resize(new_size.columns, &fill);
        }
        for line in &mut self.saved_lines {
            line.resize(new_size.columns, &fill);
        }

        if new_size.rows < self.size.rows {
            let excess = self.size.rows - new_size.rows;
            for _ in 0..excess {
                if let Some(line) = self.lines.pop_front() {
                    if self.kind == BufferKind::Main {
                        self.push_saved_line(line);
                    }
                }
            }
            self.cursor.row = self.cursor.row.saturating_sub(excess);
        } else {
            for _ in 0..(new_size.rows - self.size.rows) {
                match self.saved_lines.pop_back() {
                    Some(line) if self.kind == BufferKind::Main => {
                        self.lines.push_front(line);
                        self.cursor.row += 1;
                    }
                    other => {
                        if let Some(line) = other {
                            // Alternate buffers hold no history to pull from.
                            self.saved_lines.push_back(line);
                        }
                        self.lines.push_back(Line::new(new_size.columns));
                    }
                }
            }
        }

        self.size = new_size;
        self.margin = Margin::full(new_size);
        self.tabs.resize(new_size.columns);
        self.cursor.row = self.cursor.row.min(new_size.rows - 1);
        self.cursor.column = self.cursor.column.min(new_size.columns - 1);
        self.wrap_pending = false;
        self.last_cell = None;
    }

    // --- Text projection ---

    /// Text of one visible row (1-based), padded to the screen width.
    pub fn render_text_line(&self, row: usize) -> String {
        let row = row.clamp(1, self.size.rows) - 1;
        self.lines[row].text()
    }

    /// Text of the whole visible grid, one LF-terminated line per row.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(&line.text());
            out.push('\n');
        }
        out
    }

    /// Text of the n-th history line, 1 being the most recently saved.
    pub fn render_history_text_line(&self, n: usize) -> Option<String> {
        if n == 0 || n > self.saved_lines.len() {
            return None;
        }
        Some(self.saved_lines[self.saved_lines.len() - n].text())
    }

    /// The line shown at a visual row for a given viewport offset,
    /// drawing from scrollback when scrolled back.
    pub fn visible_line(&self, visual_row: usize, scroll_offset: usize) -> &Line {
        let offset = scroll_offset.min(self.saved_lines.len());
        let top = self.saved_lines.len() - offset;
        let index = top + visual_row;
        if index < self.saved_lines.len() {
            &self.saved_lines[index]
        } else {
            &self.lines[index - self.saved_lines.len()]
        }
    }

    // --- Invariant checking ---

    /// Check every grid invariant; a violation is an implementation bug.
    pub fn verify_state(&self) -> Result<(), StateError> {
        if self.lines.len() != self.size.rows {
            return Err(StateError::GridHeight {
                actual: self.lines.len(),
                expected: self.size.rows,
            });
        }
        for (row, line) in self.lines.iter().enumerate() {
            if line.len() != self.size.columns {
                return Err(StateError::LineWidth {
                    row,
                    actual: line.len(),
                    expected: self.size.columns,
                });
            }
        }
        if self.cursor.row >= self.size.rows || self.cursor.column >= self.size.columns {
            return Err(StateError::CursorOutOfRange {
                row: self.cursor.row,
                column: self.cursor.column,
                rows: self.size.rows,
                columns: self.size.columns,
            });
        }
        let v = self.margin.vertical;
        if v.from > v.to || v.to >= self.size.rows {
            return Err(StateError::MarginOutOfRange {
                from: v.from,
                to: v.to,
                extent: self.size.rows,
            });
        }
        let h = self.margin.horizontal;
        if h.from > h.to || h.to >= self.size.columns {
            return Err(StateError::MarginOutOfRange {
                from: h.from,
                to: h.to,
                extent: self.size.columns,
            });
        }
        if let Some(limit) = self.max_history {
            if self.saved_lines.len() > limit {
                return Err(StateError::ScrollbackOverflow {
                    actual: self.saved_lines.len(),
                    limit,
                });
            }
        }
        Ok(())
    }
}
