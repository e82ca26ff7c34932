//! Terminal and document primitives.
//!
//! - **terminal**: raw mode guard and window size query
//! - **keys**: raw bytes to key events, including escape sequences
//! - **buffer**: the row-oriented document and its file I/O
//!
//! # Data Flow
//!
//! ```text
//! stdin ──> KeyDecoder ──> KeyEvent ──> Editor ──> TextBuffer
//! ```

pub mod buffer;
pub mod keys;
pub mod terminal;

pub use buffer::TextBuffer;
pub use keys::{KeyDecoder, KeyEvent};
