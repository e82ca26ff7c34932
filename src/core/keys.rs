//! Key decoding
//!
//! Turns raw terminal bytes into key events. Escape sequences for navigation
//! keys arrive byte by byte; the decoder reads at most three bytes past the
//! escape, each bounded by the terminal read timeout, so a lone Escape press
//! is still delivered promptly.

use std::io::{self, Read};
use tracing::debug;

use super::terminal::{Result, TerminalError};

pub const ESC: u8 = 0x1b;
pub const ENTER: u8 = b'\r';
pub const BACKSPACE: u8 = 0x7f;

/// Control byte produced by Ctrl + `key`
pub const fn ctrl(key: u8) -> u8 {
    key & 0x1f
}

/// A logical key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEvent {
    /// Printable byte
    Char(u8),
    /// Control byte (C0 range or DEL)
    Control(u8),
    Up,
    Down,
    Left,
    Right,
    PageUp,
    PageDown,
    Home,
    End,
    Delete,
    Enter,
    /// Escape that did not start a recognized sequence
    Escape,
}

impl KeyEvent {
    /// Classify a single byte outside of an escape sequence
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            ENTER => KeyEvent::Enter,
            ESC => KeyEvent::Escape,
            0x00..=0x1f | BACKSPACE => KeyEvent::Control(byte),
            _ => KeyEvent::Char(byte),
        }
    }

    /// True for the control byte Ctrl + `key`
    pub fn is_ctrl(&self, key: u8) -> bool {
        *self == KeyEvent::Control(ctrl(key))
    }
}

/// Outcome of matching the bytes that followed an escape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscapeTail {
    Key(KeyEvent),
    /// The tail is a prefix of a known sequence
    NeedMore,
    Unrecognized,
}

/// Match the bytes after `ESC` against the known navigation sequences.
///
/// Never asks for more than three bytes.
pub fn resolve_escape(tail: &[u8]) -> EscapeTail {
    use KeyEvent::*;

    let key = match tail {
        [] | [_] => return EscapeTail::NeedMore,
        [b'[', b'0'..=b'9'] => return EscapeTail::NeedMore,
        [b'[', digit @ b'0'..=b'9', b'~'] => match digit {
            b'1' | b'7' => Home,
            b'3' => Delete,
            b'4' | b'8' => End,
            b'5' => PageUp,
            b'6' => PageDown,
            _ => return EscapeTail::Unrecognized,
        },
        [b'[', b'A'] => Up,
        [b'[', b'B'] => Down,
        [b'[', b'C'] => Right,
        [b'[', b'D'] => Left,
        [b'[', b'H'] | [b'O', b'H'] => Home,
        [b'[', b'F'] | [b'O', b'F'] => End,
        _ => return EscapeTail::Unrecognized,
    };
    EscapeTail::Key(key)
}

/// Reads key events from a byte source.
///
/// A read that returns zero bytes is a timeout. With the terminal in raw mode
/// that happens after the configured read timeout; a byte slice behaves the
/// same way once exhausted.
pub struct KeyDecoder<R> {
    input: R,
}

impl<R: Read> KeyDecoder<R> {
    pub fn new(input: R) -> Self {
        Self { input }
    }

    /// Block until one key is decoded
    pub fn read_key(&mut self) -> Result<KeyEvent> {
        loop {
            if let Some(key) = self.poll_key()? {
                return Ok(key);
            }
        }
    }

    /// Decode one key, or `None` if no byte arrived within the read timeout
    pub fn poll_key(&mut self) -> Result<Option<KeyEvent>> {
        let Some(byte) = self.read_byte()? else {
            return Ok(None);
        };
        if byte != ESC {
            return Ok(Some(KeyEvent::from_byte(byte)));
        }

        let mut tail = [0u8; 3];
        let mut len = 0;
        loop {
            match resolve_escape(&tail[..len]) {
                EscapeTail::Key(key) => return Ok(Some(key)),
                EscapeTail::Unrecognized => {
                    debug!("Unrecognized escape tail: {:?}", &tail[..len]);
                    return Ok(Some(KeyEvent::Escape));
                }
                EscapeTail::NeedMore => match self.read_byte()? {
                    Some(next) => {
                        tail[len] = next;
                        len += 1;
                    }
                    None => return Ok(Some(KeyEvent::Escape)),
                },
            }
        }
    }

    fn read_byte(&mut self) -> Result<Option<u8>> {
        let mut byte = [0u8; 1];
        match self.input.read(&mut byte) {
            Ok(1) => Ok(Some(byte[0])),
            Ok(_) => Ok(None),
            Err(e) if matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted) => {
                Ok(None)
            }
            Err(e) => Err(TerminalError::Read(e)),
        }
    }
}
