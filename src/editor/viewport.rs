//! Visible window over the document

/// Scroll offsets and size of the text area, in cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub row_offset: usize,
    pub col_offset: usize,
    pub screen_rows: usize,
    pub screen_cols: usize,
}

impl Viewport {
    /// A viewport at the top-left of the document. Both dimensions are at
    /// least one cell.
    pub fn new(screen_rows: usize, screen_cols: usize) -> Self {
        Self {
            row_offset: 0,
            col_offset: 0,
            screen_rows: screen_rows.max(1),
            screen_cols: screen_cols.max(1),
        }
    }

    /// Move the offsets just far enough that `(row, col)` is visible
    pub fn scroll_to(&mut self, row: usize, col: usize) {
        if row < self.row_offset {
            self.row_offset = row;
        }
        if row >= self.row_offset + self.screen_rows {
            self.row_offset = row + 1 - self.screen_rows;
        }
        if col < self.col_offset {
            self.col_offset = col;
        }
        if col >= self.col_offset + self.screen_cols {
            self.col_offset = col + 1 - self.screen_cols;
        }
    }

    /// Screen cell of a document position, relative to the text area
    pub fn to_screen(&self, row: usize, col: usize) -> (usize, usize) {
        (
            row.saturating_sub(self.row_offset),
            col.saturating_sub(self.col_offset),
        )
    }
}
