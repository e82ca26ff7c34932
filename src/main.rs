//! shawn - a minimal terminal text editor
//!
//! shawn puts the terminal into raw mode, reads keys byte by byte (including
//! escape sequences for the navigation keys), edits an in-memory list of
//! lines and redraws the screen after every key.
//!
//! # Quick Start
//!
//! ```text
//! shawn              # Start with an empty document
//! shawn notes.txt    # Edit notes.txt
//! ```
//!
//! # Keybindings
//!
//! | Key | Action |
//! |-----|--------|
//! | Arrows | Move the cursor |
//! | PageUp/PageDown | Move one screen up/down |
//! | Home/End | Start/end of line |
//! | Enter | Split the line at the cursor |
//! | Backspace/Delete | Delete before/under the cursor |
//! | Ctrl+S | Save |
//! | Ctrl+Q | Quit |

mod config;
mod core;
mod editor;
mod ui;

use std::env;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::Context;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::config::Config;
use crate::core::terminal::{self, RawMode};
use crate::core::KeyDecoder;
use crate::editor::{Action, Editor};
use crate::ui::{clear_screen, Renderer};

/// Version string from Cargo.toml
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Command line arguments
#[derive(Debug, Default, PartialEq)]
struct Args {
    /// File to edit
    path: Option<PathBuf>,
}

/// What the command line asks for
#[derive(Debug, PartialEq)]
enum Command {
    Edit(Args),
    Help,
    Version,
}

fn print_version() {
    eprintln!("shawn {}", VERSION);
}

fn print_help() {
    eprintln!("shawn {} - A minimal terminal text editor", VERSION);
    eprintln!();
    eprintln!("Usage: shawn [OPTIONS] [FILE]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -v, --version         Show version");
    eprintln!("  -h, --help            Show this help");
    eprintln!();
    eprintln!("Keys:");
    eprintln!("  Arrows                Move the cursor");
    eprintln!("  PageUp/PageDown       Move one screen");
    eprintln!("  Home/End              Start/end of line");
    eprintln!("  Enter                 Split the line");
    eprintln!("  Backspace/Delete      Delete a character");
    eprintln!("  Ctrl+S                Save");
    eprintln!("  Ctrl+Q                Quit");
    eprintln!();
    eprintln!("Configuration: ~/.shawn/config.toml");
    eprintln!("Log file:      ~/.shawn/shawn.log");
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<Command, String> {
    let mut parsed = Args::default();

    for arg in args {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "-v" | "--version" => return Ok(Command::Version),
            opt if opt.starts_with('-') && opt.len() > 1 => {
                return Err(format!("Unknown argument: {}. Use -h for help.", opt));
            }
            path => {
                if parsed.path.is_some() {
                    return Err(format!("Unexpected extra file: {}", path));
                }
                parsed.path = Some(PathBuf::from(path));
            }
        }
    }

    Ok(Command::Edit(parsed))
}

/// Log to a file; the terminal belongs to the editor
fn init_logging(config: &Config) {
    let Some(log_path) = Config::get_log_path() else {
        return;
    };

    // Open log file (append mode)
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .ok();

    if let Some(file) = log_file {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&config.log.level));
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }
}

fn main() {
    let args = match parse_args(env::args().skip(1)) {
        Ok(Command::Edit(args)) => args,
        Ok(Command::Help) => {
            print_help();
            return;
        }
        Ok(Command::Version) => {
            print_version();
            return;
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Use --help for usage information");
            std::process::exit(1);
        }
    };

    let (config, config_error) = match Config::load() {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };
    init_logging(&config);
    info!("shawn {} starting...", VERSION);
    if let Some(e) = config_error {
        warn!("{}; using defaults", e);
    }

    if let Err(e) = run(&args, &config) {
        error!("Fatal: {:#}", e);
        eprintln!("shawn: {:#}", e);
        std::process::exit(1);
    }

    info!("shawn exited");
}

/// Run the editor with the terminal in raw mode.
///
/// On failure the screen is cleared before the terminal is restored, so the
/// diagnostic printed by the caller lands on a clean shell.
fn run(args: &Args, config: &Config) -> anyhow::Result<()> {
    let mut raw_mode =
        RawMode::enter(config.input.read_timeout()).context("Failed to enter raw mode")?;
    let result = terminal::output()
        .context("Failed to open terminal output")
        .and_then(|mut out| {
            let result = edit(args, config, &mut out);
            if result.is_err() {
                let _ = clear_screen(&mut out);
            }
            result
        });

    let restored = raw_mode.exit();
    result?;
    restored.context("Failed to restore terminal")?;
    Ok(())
}

fn edit<W: Write>(args: &Args, config: &Config, out: &mut W) -> anyhow::Result<()> {
    let mut stdin = io::stdin();

    let (rows, cols) = terminal::window_size(&mut stdin, out)?;
    info!("Terminal size: {}x{}", cols, rows);

    let mut editor = match &args.path {
        Some(path) => Editor::open(path, rows, cols)?,
        None => Editor::new(rows, cols),
    };
    let renderer = Renderer::new(config.display.welcome);
    let mut decoder = KeyDecoder::new(stdin);

    run_main_loop(&mut editor, &renderer, &mut decoder, out)?;
    editor.close();
    Ok(())
}

/// Render, read one key, apply it; until quit
fn run_main_loop<R: Read, W: Write>(
    editor: &mut Editor,
    renderer: &Renderer,
    decoder: &mut KeyDecoder<R>,
    out: &mut W,
) -> anyhow::Result<()> {
    loop {
        renderer.refresh(editor, out).context("Failed to draw screen")?;

        let key = decoder.read_key()?;
        if editor.process_key(key)? == Action::Quit {
            break;
        }
    }

    clear_screen(out).context("Failed to clear screen")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TextBuffer;

    fn args(list: &[&str]) -> Result<Command, String> {
        parse_args(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_parse_args() {
        assert_eq!(args(&[]), Ok(Command::Edit(Args::default())));
        assert_eq!(
            args(&["notes.txt"]),
            Ok(Command::Edit(Args {
                path: Some(PathBuf::from("notes.txt"))
            }))
        );
        assert_eq!(args(&["-h"]), Ok(Command::Help));
        assert_eq!(args(&["notes.txt", "--version"]), Ok(Command::Version));
    }

    #[test]
    fn test_parse_args_errors() {
        assert!(args(&["--bogus"]).is_err());
        assert!(args(&["a.txt", "b.txt"]).is_err());
    }

    #[test]
    fn test_main_loop_types_and_quits() {
        let mut editor = Editor::new(10, 40);
        let mut decoder = KeyDecoder::new(&b"hi\x1b[D!\x11"[..]);
        let mut out = Vec::new();

        run_main_loop(&mut editor, &Renderer::default(), &mut decoder, &mut out).unwrap();

        assert_eq!(editor.buffer().row(0).unwrap().as_bytes(), b"h!i");
        assert!(out.ends_with(b"\x1b[2J\x1b[H"));
        // One frame per key before quit
        let frames = out.windows(6).filter(|w| *w == b"\x1b[?25l").count();
        assert_eq!(frames, 5);
    }

    #[test]
    fn test_main_loop_save_failure_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let mut buffer = TextBuffer::new();
        buffer.append_row(b"data").unwrap();
        let mut editor = Editor::with_buffer(buffer, Some(dir.path().to_path_buf()), 10, 40);
        let mut decoder = KeyDecoder::new(&b"\x13\x11"[..]);
        let mut out = Vec::new();

        let result = run_main_loop(&mut editor, &Renderer::default(), &mut decoder, &mut out);
        assert!(result.is_err());
        assert!(!out.ends_with(b"\x1b[2J\x1b[H"));
    }
}
