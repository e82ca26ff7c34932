//! Cursor position and motion
//!
//! The column is allowed to exceed the current row's length after vertical
//! motion, so moving through a short row keeps the original column. Anything
//! that indexes into the row goes through [`Cursor::clamped_col`].

use crate::core::TextBuffer;

/// Logical cursor position, zero-based
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    pub row: usize,
    pub col: usize,
}

/// Cursor motions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Up,
    Down,
    Left,
    Right,
    PageUp,
    PageDown,
    Home,
    End,
}

impl Cursor {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Column clamped to the length of the current row
    pub fn clamped_col(&self, buffer: &TextBuffer) -> usize {
        self.col.min(buffer.row_len(self.row))
    }

    /// Apply a motion. `page` is the number of rows a page motion covers.
    pub fn apply(&mut self, motion: Motion, buffer: &TextBuffer, page: usize) {
        match motion {
            Motion::Up => self.up(1),
            Motion::Down => self.down(1, buffer),
            Motion::Left => self.left(buffer),
            Motion::Right => self.right(buffer),
            Motion::PageUp => self.up(page),
            Motion::PageDown => self.down(page, buffer),
            Motion::Home => self.col = 0,
            Motion::End => self.col = buffer.row_len(self.row),
        }
    }

    fn up(&mut self, rows: usize) {
        self.row = self.row.saturating_sub(rows);
    }

    // Stops on the last row; the cursor never sits below the document
    fn down(&mut self, rows: usize, buffer: &TextBuffer) {
        let last = buffer.len().saturating_sub(1);
        self.row = self.row.saturating_add(rows).min(last.max(self.row));
    }

    fn left(&mut self, buffer: &TextBuffer) {
        self.col = self.clamped_col(buffer);
        if self.col > 0 {
            self.col -= 1;
        } else if self.row > 0 {
            self.row -= 1;
            self.col = buffer.row_len(self.row);
        }
    }

    fn right(&mut self, buffer: &TextBuffer) {
        self.col = self.clamped_col(buffer);
        if self.col < buffer.row_len(self.row) {
            self.col += 1;
        } else if self.row + 1 < buffer.len() {
            self.row += 1;
            self.col = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer(lines: &[&str]) -> TextBuffer {
        let mut buffer = TextBuffer::new();
        for line in lines {
            buffer.append_row(line.as_bytes()).unwrap();
        }
        buffer
    }

    #[test]
    fn test_left_wraps_to_previous_row_end() {
        let buffer = buffer(&["abcd", "xy"]);
        let mut cursor = Cursor::new(1, 0);
        cursor.apply(Motion::Left, &buffer, 10);
        assert_eq!(cursor, Cursor::new(0, 4));
    }

    #[test]
    fn test_left_at_document_start_is_noop() {
        let buffer = buffer(&["abcd"]);
        let mut cursor = Cursor::new(0, 0);
        cursor.apply(Motion::Left, &buffer, 10);
        assert_eq!(cursor, Cursor::new(0, 0));
    }

    #[test]
    fn test_left_clamps_ragged_column_first() {
        let buffer = buffer(&["abcdefgh", "xy"]);
        let mut cursor = Cursor::new(1, 7);
        cursor.apply(Motion::Left, &buffer, 10);
        assert_eq!(cursor, Cursor::new(1, 1));
    }

    #[test]
    fn test_right_wraps_to_next_row_start() {
        let buffer = buffer(&["ab", "xy"]);
        let mut cursor = Cursor::new(0, 2);
        cursor.apply(Motion::Right, &buffer, 10);
        assert_eq!(cursor, Cursor::new(1, 0));
    }

    #[test]
    fn test_right_at_document_end_is_noop() {
        let buffer = buffer(&["ab", "xy"]);
        let mut cursor = Cursor::new(1, 2);
        cursor.apply(Motion::Right, &buffer, 10);
        assert_eq!(cursor, Cursor::new(1, 2));
    }

    #[test]
    fn test_vertical_motion_keeps_column() {
        let buffer = buffer(&["abcdefgh", "x", "abcdefgh"]);
        let mut cursor = Cursor::new(0, 6);

        cursor.apply(Motion::Down, &buffer, 10);
        assert_eq!(cursor, Cursor::new(1, 6));
        assert_eq!(cursor.clamped_col(&buffer), 1);

        cursor.apply(Motion::Down, &buffer, 10);
        assert_eq!(cursor, Cursor::new(2, 6));
    }

    #[test]
    fn test_down_stops_at_last_row() {
        let buffer = buffer(&["a", "b"]);
        let mut cursor = Cursor::new(1, 0);
        cursor.apply(Motion::Down, &buffer, 10);
        assert_eq!(cursor.row, 1);

        let empty = TextBuffer::new();
        let mut cursor = Cursor::default();
        cursor.apply(Motion::Down, &empty, 10);
        assert_eq!(cursor, Cursor::default());
    }

    #[test]
    fn test_page_motion_stops_at_boundaries() {
        let lines: Vec<String> = (0..50).map(|i| i.to_string()).collect();
        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        let buffer = buffer(&refs);

        let mut cursor = Cursor::new(45, 0);
        cursor.apply(Motion::PageDown, &buffer, 20);
        assert_eq!(cursor.row, 49);

        cursor.apply(Motion::PageUp, &buffer, 20);
        assert_eq!(cursor.row, 29);
        cursor.apply(Motion::PageUp, &buffer, 20);
        cursor.apply(Motion::PageUp, &buffer, 20);
        assert_eq!(cursor.row, 0);
    }

    #[test]
    fn test_home_end() {
        let buffer = buffer(&["hello"]);
        let mut cursor = Cursor::new(0, 2);
        cursor.apply(Motion::End, &buffer, 10);
        assert_eq!(cursor.col, 5);
        cursor.apply(Motion::Home, &buffer, 10);
        assert_eq!(cursor.col, 0);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn motion() -> impl Strategy<Value = Motion> {
            prop_oneof![
                Just(Motion::Up),
                Just(Motion::Down),
                Just(Motion::Left),
                Just(Motion::Right),
                Just(Motion::PageUp),
                Just(Motion::PageDown),
                Just(Motion::Home),
                Just(Motion::End),
            ]
        }

        fn document() -> impl Strategy<Value = Vec<String>> {
            prop::collection::vec("[a-z]{0,15}", 1..30)
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(200))]

            #[test]
            fn horizontal_motion_stays_in_row_bounds(
                lines in document(),
                moves in prop::collection::vec(prop::bool::ANY, 0..100),
            ) {
                let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
                let buffer = buffer(&refs);
                let mut cursor = Cursor::default();

                for right in moves {
                    let before = cursor;
                    cursor.apply(if right { Motion::Right } else { Motion::Left }, &buffer, 5);
                    prop_assert!(cursor.col <= buffer.row_len(cursor.row));

                    if cursor.row != before.row {
                        prop_assert_eq!(cursor.row.abs_diff(before.row), 1);
                        if right {
                            prop_assert_eq!(cursor.col, 0);
                        } else {
                            prop_assert_eq!(cursor.col, buffer.row_len(cursor.row));
                        }
                    }
                }
            }

            #[test]
            fn cursor_row_always_valid(
                lines in document(),
                moves in prop::collection::vec(motion(), 0..100),
            ) {
                let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
                let buffer = buffer(&refs);
                let mut cursor = Cursor::default();

                for m in moves {
                    cursor.apply(m, &buffer, 7);
                    prop_assert!(cursor.row < buffer.len());
                }
            }

            #[test]
            fn page_motion_matches_repeated_steps(
                lines in document(),
                start_seed in any::<usize>(),
                page in 0usize..40,
                down in prop::bool::ANY,
            ) {
                let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
                let buffer = buffer(&refs);
                let start = Cursor::new(start_seed % buffer.len(), 3);

                let mut paged = start;
                paged.apply(if down { Motion::PageDown } else { Motion::PageUp }, &buffer, page);

                let mut stepped = start;
                for _ in 0..page {
                    stepped.apply(if down { Motion::Down } else { Motion::Up }, &buffer, page);
                }
                prop_assert_eq!(paged, stepped);
            }
        }
    }
}
