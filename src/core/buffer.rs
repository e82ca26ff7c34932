//! Line-oriented text buffer
//!
//! The document is an ordered list of rows, one byte per cell. Rows never
//! carry a line terminator; `\n` is added only when the buffer is written out.
//!
//! Growth goes through `try_reserve` so an allocation failure surfaces as
//! [`BufferError::Allocation`] instead of aborting the process.

use std::collections::TryReserveError;
use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum BufferError {
    #[error("Failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Out of memory growing the document: {0}")]
    Allocation(#[from] TryReserveError),

    #[error("Row {index} is out of range (document has {len} rows)")]
    RowOutOfRange { index: usize, len: usize },
}

pub type Result<T> = std::result::Result<T, BufferError>;

/// A single line of the document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    chars: Vec<u8>,
}

impl Row {
    /// Create a row holding a copy of `content`
    pub fn new(content: &[u8]) -> Result<Self> {
        let mut chars = Vec::new();
        chars.try_reserve_exact(content.len())?;
        chars.extend_from_slice(content);
        Ok(Self { chars })
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.chars
    }

    /// Insert `byte` at `col`, shifting the rest of the row right.
    /// `col` past the end appends.
    pub fn insert(&mut self, col: usize, byte: u8) -> Result<()> {
        self.chars.try_reserve(1)?;
        let col = col.min(self.chars.len());
        self.chars.insert(col, byte);
        Ok(())
    }

    /// Remove the byte at `col`
    pub fn remove(&mut self, col: usize) -> Option<u8> {
        (col < self.chars.len()).then(|| self.chars.remove(col))
    }

    /// Append `bytes` to the end of the row
    pub fn extend(&mut self, bytes: &[u8]) -> Result<()> {
        self.chars.try_reserve(bytes.len())?;
        self.chars.extend_from_slice(bytes);
        Ok(())
    }

    /// Move everything from `col` on into a new row
    pub fn split_off(&mut self, col: usize) -> Result<Row> {
        let col = col.min(self.chars.len());
        let tail = Row::new(&self.chars[col..])?;
        self.chars.truncate(col);
        Ok(tail)
    }

    /// Up to `width` bytes starting at `start`, clipped to the content
    pub fn visible(&self, start: usize, width: usize) -> &[u8] {
        let start = start.min(self.chars.len());
        let end = start.saturating_add(width).min(self.chars.len());
        &self.chars[start..end]
    }
}

/// The document: rows in line order, index `i` is line `i`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBuffer {
    rows: Vec<Row>,
}

impl TextBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a buffer from raw file content, one row per `\n`-terminated
    /// record with trailing `\r`/`\n` stripped
    pub fn parse(content: &[u8]) -> Result<Self> {
        let mut buffer = Self::new();
        if content.is_empty() {
            return Ok(buffer);
        }
        let body = content.strip_suffix(b"\n").unwrap_or(content);
        for line in body.split(|&b| b == b'\n') {
            let end = line
                .iter()
                .rposition(|&b| b != b'\r')
                .map_or(0, |last| last + 1);
            buffer.append_row(&line[..end])?;
        }
        Ok(buffer)
    }

    /// Load a file from disk
    pub fn load(path: &Path) -> Result<Self> {
        let mut file = File::open(path).map_err(|source| BufferError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let mut content = Vec::new();
        file.read_to_end(&mut content)
            .map_err(|source| BufferError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        let buffer = Self::parse(&content)?;
        info!("Loaded {} rows from {}", buffer.len(), path.display());
        Ok(buffer)
    }

    /// Write every row followed by `\n`, replacing the file's content
    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|source| BufferError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let mut writer = BufWriter::new(file);
        self.write_to(&mut writer)
            .and_then(|_| writer.flush())
            .map_err(|source| BufferError::Write {
                path: path.to_path_buf(),
                source,
            })?;

        info!("Saved {} rows to {}", self.len(), path.display());
        Ok(())
    }

    /// Serialize rows, each terminated with `\n`
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        for row in self.rows() {
            writer.write_all(row.as_bytes())?;
            writer.write_all(b"\n")?;
        }
        Ok(())
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    pub fn rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter()
    }

    /// Length of row `index`, zero past the end of the document
    pub fn row_len(&self, index: usize) -> usize {
        self.rows.get(index).map_or(0, Row::len)
    }

    fn row_mut(&mut self, index: usize) -> Result<&mut Row> {
        let len = self.rows.len();
        self.rows
            .get_mut(index)
            .ok_or(BufferError::RowOutOfRange { index, len })
    }

    /// Add a new last row holding a copy of `content`
    pub fn append_row(&mut self, content: &[u8]) -> Result<()> {
        let row = Row::new(content)?;
        self.rows.try_reserve(1)?;
        self.rows.push(row);
        Ok(())
    }

    /// Insert a row at `at`, shifting later rows down. `at` past the end
    /// appends.
    pub fn insert_row(&mut self, at: usize, content: &[u8]) -> Result<()> {
        let row = Row::new(content)?;
        self.rows.try_reserve(1)?;
        let at = at.min(self.rows.len());
        self.rows.insert(at, row);
        Ok(())
    }

    /// Remove row `index`
    pub fn remove_row(&mut self, index: usize) -> Option<Row> {
        (index < self.rows.len()).then(|| self.rows.remove(index))
    }

    /// Insert `byte` at `col` of row `row`; `col` is clamped to the row length
    pub fn insert_char(&mut self, row: usize, col: usize, byte: u8) -> Result<()> {
        self.row_mut(row)?.insert(col, byte)
    }

    /// Delete the byte at `col` of row `row`. Returns false if there is none.
    pub fn delete_char(&mut self, row: usize, col: usize) -> bool {
        self.rows
            .get_mut(row)
            .and_then(|r| r.remove(col))
            .is_some()
    }

    /// Cut row `row` at `col`; the tail becomes a new row right below it
    pub fn split_row(&mut self, row: usize, col: usize) -> Result<()> {
        self.rows.try_reserve(1)?;
        let tail = self.row_mut(row)?.split_off(col)?;
        self.rows.insert(row + 1, tail);
        Ok(())
    }

    /// Append row `row + 1` onto row `row` and remove it. Returns false if
    /// `row` is the last row.
    pub fn merge_rows(&mut self, row: usize) -> Result<bool> {
        if row + 1 >= self.rows.len() {
            return Ok(false);
        }
        let Some(next) = self.remove_row(row + 1) else {
            return Ok(false);
        };
        self.row_mut(row)?.extend(next.as_bytes())?;
        Ok(true)
    }

    /// Drop every row and its storage
    pub fn release_all(&mut self) {
        debug!("Releasing {} rows", self.rows.len());
        self.rows = Vec::new();
    }
}
