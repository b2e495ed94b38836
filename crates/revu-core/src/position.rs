//! Cursor and scroll-offset arithmetic for the diff view

use serde::{Deserialize, Serialize};

/// Where the cursor sits and which part of a diff is visible
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ViewPosition {
    /// Cursor row (0-based line index into the diff)
    pub active_row_index: usize,
    /// First line shown at the top of the view
    pub view_start_row_index: usize,
    /// Horizontal offset: number of columns hidden on the left
    pub view_start_column: usize,
}

impl ViewPosition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scroll just enough to keep the cursor inside `visible_rows` rows.
    ///
    /// Idempotent; called once per render pass. With no visible rows there is
    /// nothing to follow, so the position is left alone.
    pub fn determine_view_start_row(&mut self, visible_rows: usize) {
        if visible_rows == 0 {
            return;
        }

        if self.active_row_index < self.view_start_row_index {
            self.view_start_row_index = self.active_row_index;
        } else if self.active_row_index >= self.view_start_row_index + visible_rows {
            self.view_start_row_index = self.active_row_index + 1 - visible_rows;
        }
    }

    /// Move the cursor one line down, staying below `line_count`
    pub fn move_line_down(&mut self, line_count: usize) -> bool {
        if self.active_row_index + 1 < line_count {
            self.active_row_index += 1;
            return true;
        }
        false
    }

    /// Move the cursor one line up, stopping at the first line
    pub fn move_line_up(&mut self) -> bool {
        if self.active_row_index > 0 {
            self.active_row_index -= 1;
            return true;
        }
        false
    }

    /// Scroll right by a page. There is no right edge.
    pub fn move_page_right(&mut self, page_width: usize) {
        self.view_start_column = self.view_start_column.saturating_add(page_width);
    }

    /// Scroll left by a page, stopping at column 0
    pub fn move_page_left(&mut self, page_width: usize) -> bool {
        if self.view_start_column == 0 {
            return false;
        }
        let previous = self.view_start_column;
        self.view_start_column = self.view_start_column.saturating_sub(page_width);
        self.view_start_column != previous
    }
}
