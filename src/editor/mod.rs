//! Editor state and key handling.
//!
//! - **cursor**: logical cursor and the motion rules
//! - **viewport**: scroll offsets of the visible text area
//!
//! [`Editor`] owns the document and applies one key at a time to it. Drawing
//! lives in `ui`; reading keys lives in `core::keys`.

pub mod cursor;
pub mod viewport;

pub use cursor::{Cursor, Motion};
pub use viewport::Viewport;

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::core::buffer::Result;
use crate::core::keys::BACKSPACE;
use crate::core::{KeyEvent, TextBuffer};

/// Terminal rows taken by the status line
const STATUS_ROWS: usize = 1;

/// Editor lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorState {
    /// Nothing opened and no key pressed yet
    HomeMenu,
    Editing,
}

/// What the loop should do after a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Continue,
    Quit,
}

/// The editor: document, cursor and viewport
#[derive(Debug)]
pub struct Editor {
    buffer: TextBuffer,
    cursor: Cursor,
    viewport: Viewport,
    state: EditorState,
    path: Option<PathBuf>,
    terminal_rows: usize,
}

impl Editor {
    /// Empty editor in the home menu, sized to the whole terminal
    pub fn new(terminal_rows: u16, terminal_cols: u16) -> Self {
        Self {
            buffer: TextBuffer::new(),
            cursor: Cursor::default(),
            viewport: Self::text_area(terminal_rows, terminal_cols),
            state: EditorState::HomeMenu,
            path: None,
            terminal_rows: terminal_rows as usize,
        }
    }

    /// Open `path` for editing
    pub fn open(path: &Path, terminal_rows: u16, terminal_cols: u16) -> Result<Self> {
        let buffer = TextBuffer::load(path)?;
        Ok(Self::with_buffer(buffer, Some(path.to_path_buf()), terminal_rows, terminal_cols))
    }

    /// Edit an existing buffer, optionally bound to a file
    pub fn with_buffer(
        buffer: TextBuffer,
        path: Option<PathBuf>,
        terminal_rows: u16,
        terminal_cols: u16,
    ) -> Self {
        Self {
            buffer,
            cursor: Cursor::default(),
            viewport: Self::text_area(terminal_rows, terminal_cols),
            state: EditorState::Editing,
            path,
            terminal_rows: terminal_rows as usize,
        }
    }

    fn text_area(terminal_rows: u16, terminal_cols: u16) -> Viewport {
        Viewport::new(
            (terminal_rows as usize).saturating_sub(STATUS_ROWS),
            terminal_cols as usize,
        )
    }

    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn state(&self) -> EditorState {
        self.state
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Terminal rows including the status line
    pub fn terminal_rows(&self) -> usize {
        self.terminal_rows
    }

    /// Whether the terminal is tall enough for a status line below the text
    pub fn has_status_row(&self) -> bool {
        self.terminal_rows > STATUS_ROWS
    }

    /// Column the cursor is drawn at
    pub fn display_col(&self) -> usize {
        self.cursor.clamped_col(&self.buffer)
    }

    /// Scroll so the cursor is inside the text area
    pub fn scroll(&mut self) {
        let col = self.display_col();
        self.viewport.scroll_to(self.cursor.row, col);
    }

    /// Apply one key to the document
    pub fn process_key(&mut self, key: KeyEvent) -> Result<Action> {
        if self.state == EditorState::HomeMenu {
            debug!("Leaving home menu");
            self.state = EditorState::Editing;
        }
        if self.buffer.is_empty() {
            self.buffer.append_row(b"")?;
        }
        self.clamp_row();

        let page = self.viewport.screen_rows;
        match key {
            k if k.is_ctrl(b'q') => {
                info!("Quit requested");
                return Ok(Action::Quit);
            }
            k if k.is_ctrl(b's') => self.save()?,
            KeyEvent::Up => self.cursor.apply(Motion::Up, &self.buffer, page),
            KeyEvent::Down => self.cursor.apply(Motion::Down, &self.buffer, page),
            KeyEvent::Left => self.cursor.apply(Motion::Left, &self.buffer, page),
            KeyEvent::Right => self.cursor.apply(Motion::Right, &self.buffer, page),
            KeyEvent::PageUp => self.cursor.apply(Motion::PageUp, &self.buffer, page),
            KeyEvent::PageDown => self.cursor.apply(Motion::PageDown, &self.buffer, page),
            KeyEvent::Home => self.cursor.apply(Motion::Home, &self.buffer, page),
            KeyEvent::End => self.cursor.apply(Motion::End, &self.buffer, page),
            KeyEvent::Enter => self.insert_newline()?,
            KeyEvent::Delete => self.delete_forward()?,
            KeyEvent::Control(BACKSPACE) => self.delete_backward()?,
            k if k.is_ctrl(b'h') => self.delete_backward()?,
            KeyEvent::Escape => {}
            KeyEvent::Char(byte) | KeyEvent::Control(byte) => self.insert_char(byte)?,
        }
        Ok(Action::Continue)
    }

    /// Write the document to its file. Without a file this does nothing.
    pub fn save(&self) -> Result<()> {
        match &self.path {
            Some(path) => self.buffer.save(path),
            None => {
                warn!("Save requested with no file open");
                Ok(())
            }
        }
    }

    /// Release the document at the end of the session
    pub fn close(&mut self) {
        info!("Closing document ({} rows)", self.buffer.len());
        self.buffer.release_all();
    }

    // Row structure may have changed since the cursor last moved
    fn clamp_row(&mut self) {
        let last = self.buffer.len().saturating_sub(1);
        self.cursor.row = self.cursor.row.min(last);
    }

    fn insert_char(&mut self, byte: u8) -> Result<()> {
        let col = self.display_col();
        self.buffer.insert_char(self.cursor.row, col, byte)?;
        self.cursor.col = col + 1;
        Ok(())
    }

    fn insert_newline(&mut self) -> Result<()> {
        let row = self.cursor.row;
        let col = self.display_col();
        if col < self.buffer.row_len(row) {
            self.buffer.split_row(row, col)?;
        } else {
            self.buffer.insert_row(row + 1, b"")?;
        }
        self.cursor = Cursor::new(row + 1, 0);
        Ok(())
    }

    fn delete_forward(&mut self) -> Result<()> {
        let row = self.cursor.row;
        let col = self.display_col();
        if !self.buffer.delete_char(row, col) {
            self.buffer.merge_rows(row)?;
        }
        self.cursor.col = col;
        Ok(())
    }

    fn delete_backward(&mut self) -> Result<()> {
        let row = self.cursor.row;
        let col = self.display_col();
        if col > 0 {
            self.buffer.delete_char(row, col - 1);
            self.cursor.col = col - 1;
        } else if row > 0 {
            let joint = self.buffer.row_len(row - 1);
            self.buffer.merge_rows(row - 1)?;
            self.cursor = Cursor::new(row - 1, joint);
        }
        Ok(())
    }
}
