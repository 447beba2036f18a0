//! Terminal line renderer for timer frames

use std::future;
use std::io::{self, Write};
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info};

use super::{DisplayFrame, TIMER_DISPLAY};

/// How long a whole-minute emphasis stays highlighted before reverting
const EMPHASIS_DURATION: Duration = Duration::from_millis(600);

/// Renders timer frames onto a single terminal line, rewriting it in place
#[derive(Debug)]
pub struct TerminalRenderer {
    last_text: String,
}

impl TerminalRenderer {
    /// Create a renderer for the timer display slot
    pub fn new() -> Self {
        Self {
            last_text: String::new(),
        }
    }

    /// Draw a frame, highlighted when it carries emphasis
    pub fn render(&mut self, frame: &DisplayFrame) {
        let styled = if frame.emphasis {
            format!("\x1b[1;32m{}\x1b[0m", frame.text)
        } else {
            frame.text.clone()
        };
        self.last_text = frame.text.clone();
        self.write_line(&styled);
    }

    /// Redraw the last frame without highlighting
    pub fn render_plain(&mut self) {
        let text = self.last_text.clone();
        self.write_line(&text);
    }

    fn write_line(&mut self, text: &str) {
        let mut out = io::stdout();
        // Display write failures are tolerated; the timer keeps ticking
        if let Err(e) = write!(out, "\r\x1b[2K  {}", text).and_then(|_| out.flush()) {
            debug!("Display write to '{}' failed: {}", TIMER_DISPLAY, e);
        }
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Task that consumes redraw events and drives the terminal line
///
/// Emphasis frames are reverted to plain styling after a short delay;
/// a newer frame arriving first simply replaces the highlighted one.
pub async fn render_task(mut frames: watch::Receiver<DisplayFrame>) {
    info!("Display '{}' attached", TIMER_DISPLAY);

    let mut renderer = TerminalRenderer::new();
    let mut revert_at: Option<Instant> = None;

    loop {
        let revert = async {
            match revert_at {
                Some(at) => sleep_until(at).await,
                None => future::pending().await,
            }
        };

        tokio::select! {
            changed = frames.changed() => {
                if changed.is_err() {
                    break;
                }
                let frame = frames.borrow_and_update().clone();
                revert_at = if frame.emphasis {
                    Some(Instant::now() + EMPHASIS_DURATION)
                } else {
                    None
                };
                renderer.render(&frame);
            }
            _ = revert => {
                revert_at = None;
                renderer.render_plain();
            }
        }
    }

    debug!("Display '{}' detached", TIMER_DISPLAY);
}
