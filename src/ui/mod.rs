//! Screen output.
//!
//! - **output**: frame accumulator flushed with a single write
//! - **renderer**: frame composition (text rows, filler, banner, status line)

pub mod output;
pub mod renderer;

pub use output::OutputBuffer;
pub use renderer::{clear_screen, Renderer};
