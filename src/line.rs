//! Terminal line representation
//!
//! A line is a fixed-length row of cells plus a `marked` flag used for
//! jump-to-mark navigation through the scrollback.

use serde::{Deserialize, Serialize};

use crate::cell::Cell;

/// A row of cells in the terminal grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    cells: Vec<Cell>,
    /// Set by the mark command at the cursor row; scroll-to-mark
    /// navigation scans for it.
    pub marked: bool,
}

impl Line {
    /// Create a new line of empty cells.
    pub fn new(columns: usize) -> Self {
        Self {
            cells: vec![Cell::new(); columns],
            marked: false,
        }
    }

    /// Create a line filled with copies of the given cell.
    pub fn filled(columns: usize, cell: Cell) -> Self {
        Self {
            cells: vec![cell; columns],
            marked: false,
        }
    }

    /// Number of columns in this line.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Cell::is_empty)
    }

    pub fn cell(&self, column: usize) -> &Cell {
        &self.cells[column]
    }

    pub fn cell_mut(&mut self, column: usize) -> &mut Cell {
        &mut self.cells[column]
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    /// Resize to `columns`, padding with copies of `fill` or truncating
    /// from the right.
    pub fn resize(&mut self, columns: usize, fill: &Cell) {
        self.cells.resize_with(columns, || fill.clone());
    }

    /// Erase every cell, keeping the given fill rendition.
    pub fn fill_with(&mut self, fill: &Cell) {
        for cell in &mut self.cells {
            *cell = fill.clone();
        }
    }

    /// Erase the inclusive column range `[from, to]`.
    pub fn erase_range(&mut self, from: usize, to: usize, fill: &Cell) {
        let to = to.min(self.cells.len().saturating_sub(1));
        for cell in &mut self.cells[from..=to] {
            *cell = fill.clone();
        }
    }

    /// Insert `count` fill cells at `column`, shifting existing cells
    /// right within `[column, right]`. Cells pushed past `right` are lost.
    pub fn insert_cells(&mut self, column: usize, count: usize, right: usize, fill: &Cell) {
        let right = right.min(self.cells.len().saturating_sub(1));
        if column > right {
            return;
        }
        let count = count.min(right - column + 1);
        for i in ((column + count)..=right).rev() {
            self.cells[i] = self.cells[i - count].clone();
        }
        for cell in &mut self.cells[column..column + count] {
            *cell = fill.clone();
        }
    }

    /// Delete `count` cells at `column`, shifting the remainder of
    /// `[column, right]` left and filling the vacated tail.
    pub fn delete_cells(&mut self, column: usize, count: usize, right: usize, fill: &Cell) {
        let right = right.min(self.cells.len().saturating_sub(1));
        if column > right {
            return;
        }
        let count = count.min(right - column + 1);
        if column + count <= right {
            for i in column..=(right - count) {
                self.cells[i] = self.cells[i + count].clone();
            }
        }
        for cell in &mut self.cells[(right + 1 - count)..=right] {
            *cell = fill.clone();
        }
    }

    /// Text projection of this line: one character per column, skipping
    /// the trailing halves of wide characters, blanks as spaces.
    pub fn text(&self) -> String {
        let mut out = String::with_capacity(self.cells.len());
        for cell in &self.cells {
            if cell.is_continuation() {
                continue;
            }
            if cell.is_empty() {
                out.push(' ');
            } else {
                out.push_str(cell.content());
            }
        }
        out
    }
}
