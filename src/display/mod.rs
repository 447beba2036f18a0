//! Terminal display layer
//!
//! The timer never draws directly; it publishes `DisplayFrame` redraw
//! events on a watch channel and the renderer here subscribes to them.

pub mod terminal;

// Re-export main types
pub use terminal::{render_task, TerminalRenderer};

/// Name of the display slot the terminal renderer occupies
pub const TIMER_DISPLAY: &str = "timer-display";

/// A single redraw event pushed to the display
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayFrame {
    /// Formatted elapsed time, `HH:MM:SS`
    pub text: String,
    /// Set when the frame lands on a whole-minute boundary; the renderer
    /// highlights it briefly and then reverts on its own
    pub emphasis: bool,
}

impl DisplayFrame {
    /// Create a frame carrying the given text
    pub fn new(text: String, emphasis: bool) -> Self {
        Self { text, emphasis }
    }
}
