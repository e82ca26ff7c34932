//! Raw-mode terminal control
//!
//! Puts the controlling terminal into non-canonical, non-echoing input mode
//! with a bounded read timeout, and restores the captured attributes when the
//! guard is dropped.

use std::io::{self, Read, Write};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum TerminalError {
    #[error("Failed to read terminal attributes: {0}")]
    GetAttributes(#[source] io::Error),

    #[error("Failed to apply terminal attributes: {0}")]
    SetAttributes(#[source] io::Error),

    #[error("Failed to determine window size")]
    WindowSize,

    #[error("Failed to read from terminal: {0}")]
    Read(#[source] io::Error),

    #[error("Failed to write to terminal: {0}")]
    Write(#[source] io::Error),
}

pub type Result<T> = std::result::Result<T, TerminalError>;

/// Cursor to the bottom-right corner; the terminal clamps the oversized moves
const CURSOR_FAR_CORNER: &[u8] = b"\x1b[999C\x1b[999B";
/// Device status report: cursor position
const CURSOR_REPORT_REQUEST: &[u8] = b"\x1b[6n";
const CURSOR_HOME: &[u8] = b"\x1b[H";

/// Raw mode guard.
///
/// `enter` captures the current attributes, `exit` puts them back. `exit` is
/// idempotent and also runs on drop, so every exit path restores the terminal
/// exactly once.
pub struct RawMode {
    #[cfg(unix)]
    original: libc::termios,
    active: bool,
}

impl RawMode {
    /// Enter raw mode. `read_timeout_ds` is the read timeout in deciseconds:
    /// a read returns after that long even when no byte arrived.
    #[cfg(unix)]
    pub fn enter(read_timeout_ds: u8) -> Result<Self> {
        let fd = libc::STDIN_FILENO;

        // SAFETY: termios is plain old data and tcgetattr fully initializes it on success.
        let mut original: libc::termios = unsafe { std::mem::zeroed() };
        if unsafe { libc::tcgetattr(fd, &mut original) } != 0 {
            return Err(TerminalError::GetAttributes(io::Error::last_os_error()));
        }

        let mut raw = original;
        raw.c_iflag &= !(libc::BRKINT | libc::ICRNL | libc::INPCK | libc::ISTRIP | libc::IXON);
        raw.c_oflag &= !libc::OPOST;
        raw.c_cflag |= libc::CS8;
        raw.c_lflag &= !(libc::ECHO | libc::ICANON | libc::IEXTEN | libc::ISIG);
        raw.c_cc[libc::VMIN] = 0;
        raw.c_cc[libc::VTIME] = read_timeout_ds;

        if unsafe { libc::tcsetattr(fd, libc::TCSAFLUSH, &raw) } != 0 {
            return Err(TerminalError::SetAttributes(io::Error::last_os_error()));
        }

        info!("Raw mode enabled (read timeout {} ds)", read_timeout_ds);
        Ok(Self {
            original,
            active: true,
        })
    }

    /// Enter raw mode through crossterm. Reads block until a key arrives.
    #[cfg(not(unix))]
    pub fn enter(read_timeout_ds: u8) -> Result<Self> {
        let _ = read_timeout_ds;
        crossterm::terminal::enable_raw_mode().map_err(TerminalError::SetAttributes)?;
        info!("Raw mode enabled");
        Ok(Self { active: true })
    }

    /// Restore the attributes captured by `enter`.
    pub fn exit(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        self.restore()?;
        info!("Raw mode disabled");
        Ok(())
    }

    #[cfg(unix)]
    fn restore(&self) -> Result<()> {
        if unsafe { libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, &self.original) } != 0 {
            return Err(TerminalError::SetAttributes(io::Error::last_os_error()));
        }
        Ok(())
    }

    #[cfg(not(unix))]
    fn restore(&self) -> Result<()> {
        crossterm::terminal::disable_raw_mode().map_err(TerminalError::SetAttributes)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        if let Err(e) = self.exit() {
            warn!("Failed to restore terminal: {}", e);
        }
    }
}

/// Unbuffered handle on the terminal output.
///
/// `io::Stdout` is line buffered and would split a frame at its last newline
/// into two writes. A duplicate of the descriptor writes straight through.
#[cfg(unix)]
pub fn output() -> Result<std::fs::File> {
    use std::os::fd::AsFd;

    let fd = io::stdout()
        .as_fd()
        .try_clone_to_owned()
        .map_err(TerminalError::Write)?;
    Ok(std::fs::File::from(fd))
}

#[cfg(not(unix))]
pub fn output() -> Result<io::Stdout> {
    Ok(io::stdout())
}

/// Query the window size as `(rows, cols)`.
///
/// Asks the terminal driver first. If that fails or reports zero columns, the
/// cursor is pushed to the far corner and its position is read back.
pub fn window_size<R: Read, W: Write>(input: &mut R, output: &mut W) -> Result<(u16, u16)> {
    match crossterm::terminal::size() {
        Ok((cols, rows)) if cols > 0 => return Ok((rows, cols)),
        Ok(_) => debug!("Terminal reported zero columns, probing cursor"),
        Err(e) => debug!("Window size query failed ({}), probing cursor", e),
    }

    output.write_all(CURSOR_FAR_CORNER).map_err(TerminalError::Write)?;
    let size = cursor_position(input, output);
    output.write_all(CURSOR_HOME).map_err(TerminalError::Write)?;
    output.flush().map_err(TerminalError::Write)?;
    size
}

/// Request a cursor position report and parse the reply.
fn cursor_position<R: Read, W: Write>(input: &mut R, output: &mut W) -> Result<(u16, u16)> {
    output.write_all(CURSOR_REPORT_REQUEST).map_err(TerminalError::Write)?;
    output.flush().map_err(TerminalError::Write)?;

    let mut reply = Vec::with_capacity(32);
    let mut byte = [0u8; 1];
    while reply.len() < 31 {
        match input.read(&mut byte) {
            Ok(1) if byte[0] == b'R' => break,
            Ok(1) => reply.push(byte[0]),
            Ok(_) => break,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(TerminalError::Read(e)),
        }
    }

    parse_cursor_report(&reply).ok_or(TerminalError::WindowSize)
}

/// Parse a cursor position report `ESC [ rows ; cols` (terminating `R`
/// already stripped) into `(rows, cols)`.
pub fn parse_cursor_report(reply: &[u8]) -> Option<(u16, u16)> {
    let body = reply.strip_prefix(b"\x1b[")?;
    let body = std::str::from_utf8(body).ok()?;
    let (rows, cols) = body.split_once(';')?;
    let rows = rows.parse().ok()?;
    let cols = cols.parse().ok()?;
    Some((rows, cols))
}
