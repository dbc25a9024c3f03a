//! Tab stop management

use serde::{Deserialize, Serialize};

/// Tab stops for one screen buffer.
///
/// Stops default to every `interval` columns and can be edited with
/// HTS/TBC. Column indices are 0-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabStops {
    stops: Vec<bool>,
    interval: usize,
}

impl TabStops {
    pub fn new(columns: usize, interval: usize) -> Self {
        let mut tabs = Self {
            stops: Vec::new(),
            interval: interval.max(1),
        };
        tabs.reset(columns);
        tabs
    }

    /// Rebuild the default stops for the given width.
    pub fn reset(&mut self, columns: usize) {
        self.stops = vec![false; columns];
        for i in (self.interval..columns).step_by(self.interval) {
            self.stops[i] = true;
        }
    }

    /// Resize, keeping existing stops and extending the default grid
    /// into new columns.
    pub fn resize(&mut self, columns: usize) {
        let old_len = self.stops.len();
        self.stops.resize(columns, false);
        for i in (old_len..columns).filter(|i| i % self.interval == 0) {
            self.stops[i] = true;
        }
    }

    pub fn set(&mut self, column: usize) {
        if column < self.stops.len() {
            self.stops[column] = true;
        }
    }

    pub fn clear(&mut self, column: usize) {
        if column < self.stops.len() {
            self.stops[column] = false;
        }
    }

    pub fn clear_all(&mut self) {
        self.stops.fill(false);
    }

    /// The `count`-th stop after `column`, clamped to `right`.
    pub fn next_stop(&self, column: usize, count: usize, right: usize) -> usize {
        let mut column = column;
        let mut remaining = count.max(1);
        for i in (column + 1)..=right.min(self.stops.len().saturating_sub(1)) {
            if self.stops[i] {
                column = i;
                remaining -= 1;
                if remaining == 0 {
                    return column;
                }
            }
        }
        right
    }

    /// The `count`-th stop before `column`, clamped to `left`.
    pub fn prev_stop(&self, column: usize, count: usize, left: usize) -> usize {
        let mut column = column;
        let mut remaining = count.max(1);
        for i in (left..column.min(self.stops.len())).rev() {
            if self.stops[i] {
                column = i;
                remaining -= 1;
                if remaining == 0 {
                    return column;
                }
            }
        }
        left
    }

    /// Columns (0-based) that currently carry a stop.
    pub fn positions(&self) -> Vec<usize> {
        self.stops
            .iter()
            .enumerate()
            .filter_map(|(i, &set)| set.then_some(i))
            .collect()
    }
}
