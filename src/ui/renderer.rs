//! Screen renderer
//!
//! Draws one full frame per call: the visible slice of every document row,
//! `~` filler past the end of the document, and the status line on the last
//! terminal row. The frame is composed in an [`OutputBuffer`] and flushed
//! with one write.

use std::io::{self, Write};
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    queue,
    terminal::{Clear, ClearType},
};

use crate::editor::{Editor, EditorState};
use super::OutputBuffer;

/// Banner shown on an empty document
pub const WELCOME: &str = concat!("Shawn Editor -- version ", env!("CARGO_PKG_VERSION"));

const CURSOR_HOME: &[u8] = b"\x1b[H";
const FILLER: &[u8] = b"~";

/// Terminal renderer
pub struct Renderer {
    /// Show the welcome banner while the document is empty
    welcome: bool,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Renderer {
    pub fn new(welcome: bool) -> Self {
        Self { welcome }
    }

    /// Scroll the viewport to the cursor, then draw and flush one frame
    pub fn refresh<W: Write>(&self, editor: &mut Editor, writer: &mut W) -> io::Result<()> {
        editor.scroll();

        let vp = editor.viewport();
        let mut out = OutputBuffer::with_capacity((vp.screen_rows + 1) * (vp.screen_cols + 8));
        self.compose(editor, &mut out)?;
        out.flush_to(writer)?;
        out.release();
        Ok(())
    }

    /// Compose a frame for the current editor state
    pub fn compose(&self, editor: &Editor, out: &mut OutputBuffer) -> io::Result<()> {
        queue!(out, Hide)?;
        out.append(CURSOR_HOME);

        self.draw_rows(editor, out)?;
        self.draw_status(editor, out)?;

        let (row, col) = editor
            .viewport()
            .to_screen(editor.cursor().row, editor.display_col());
        queue!(out, MoveTo(col as u16, row as u16), Show)?;
        Ok(())
    }

    fn draw_rows(&self, editor: &Editor, out: &mut OutputBuffer) -> io::Result<()> {
        let vp = editor.viewport();
        let buffer = editor.buffer();
        let banner_row = editor.terminal_rows() / 3;

        // A newline after the bottom terminal row would scroll the screen
        let last = if editor.has_status_row() {
            vp.screen_rows
        } else {
            vp.screen_rows - 1
        };

        for y in 0..vp.screen_rows {
            match buffer.row(y + vp.row_offset) {
                Some(row) => out.append(row.visible(vp.col_offset, vp.screen_cols)),
                None if self.welcome && buffer.is_empty() && y == banner_row => {
                    draw_welcome(out, vp.screen_cols);
                }
                None => out.append(FILLER),
            }
            queue!(out, Clear(ClearType::UntilNewLine))?;
            if y < last {
                out.append(b"\r\n");
            }
        }
        Ok(())
    }

    fn draw_status(&self, editor: &Editor, out: &mut OutputBuffer) -> io::Result<()> {
        if !editor.has_status_row() {
            return Ok(());
        }
        if editor.state() == EditorState::Editing {
            let path = editor
                .path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "[No Name]".to_string());
            let status = format!("Editing file : {}", path);
            let len = status.len().min(editor.viewport().screen_cols);
            out.append(&status.as_bytes()[..len]);
        }
        queue!(out, Clear(ClearType::UntilNewLine))?;
        Ok(())
    }
}

/// Centered banner; the left margin keeps the `~` filler
fn draw_welcome(out: &mut OutputBuffer, screen_cols: usize) {
    let len = WELCOME.len().min(screen_cols);
    let mut padding = (screen_cols - len) / 2;
    if padding > 0 {
        out.append(FILLER);
        padding -= 1;
    }
    for _ in 0..padding {
        out.append(b" ");
    }
    out.append(&WELCOME.as_bytes()[..len]);
}

/// Clear the whole screen and home the cursor
pub fn clear_screen<W: Write>(writer: &mut W) -> io::Result<()> {
    queue!(writer, Clear(ClearType::All))?;
    writer.write_all(CURSOR_HOME)?;
    writer.flush()
}
