//! Main application state: the timer owner
//!
//! `AppState` is the single owner of the session timer. It holds the timer
//! state, publishes redraw frames to whichever renderer is attached, and
//! registers the one scheduled tick task so a new start can always cancel
//! the previous one.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::display::DisplayFrame;
use crate::tasks::display_refresh_task;
use crate::utils::format_clock;

use super::TimerState;

/// Outcome of a single render tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// A new value was written to the display
    Rendered,
    /// Formatted value unchanged, write suppressed
    Unchanged,
    /// No renderer attached; the write was skipped, state stays accurate
    NoDisplay,
    /// Timer is idle, nothing to render
    Idle,
}

/// Application state owning the session timer and its tick task
#[derive(Debug)]
pub struct AppState {
    /// Current timer state
    pub timer_state: Arc<Mutex<TimerState>>,
    /// Channel carrying display frames to the attached renderer
    frame_tx: watch::Sender<DisplayFrame>,
    /// Registration slot for the scheduled tick task. At most one tick
    /// task exists per process; claiming the slot aborts the previous one.
    ticker: Mutex<Option<JoinHandle<()>>>,
}

impl AppState {
    /// Create a new AppState with an idle timer and no attached display
    pub fn new() -> Self {
        let (frame_tx, frame_rx) = watch::channel(DisplayFrame::default());
        // Drop the initial receiver: until a renderer subscribes, frame
        // sends fail and render_tick treats the display as missing.
        drop(frame_rx);

        Self {
            timer_state: Arc::new(Mutex::new(TimerState::new())),
            frame_tx,
            ticker: Mutex::new(None),
        }
    }

    /// Subscribe a renderer to the display frame channel
    pub fn attach_display(&self) -> watch::Receiver<DisplayFrame> {
        self.frame_tx.subscribe()
    }

    /// Start the timer, replacing any session already being displayed
    ///
    /// Cancels the previously scheduled tick task, resets the timer state
    /// to a fresh run anchored at `start_time` (or now when absent),
    /// renders once immediately, then schedules the periodic tick.
    pub fn start(self: &Arc<Self>, start_time: Option<DateTime<Utc>>) -> Result<(), String> {
        // Claim the ticker slot for the whole transition so two starts
        // cannot race each other into duplicate tick tasks.
        let mut slot = self
            .ticker
            .lock()
            .map_err(|e| format!("Failed to lock ticker slot: {}", e))?;
        if let Some(previous) = slot.take() {
            previous.abort();
            debug!("Cancelled previously scheduled display tick");
        }

        let start = start_time.unwrap_or_else(Utc::now);
        {
            let mut timer = self
                .timer_state
                .lock()
                .map_err(|e| format!("Failed to lock timer state: {}", e))?;
            *timer = TimerState::started(start);
        }
        info!("Timer started, session began at {}", start.to_rfc3339());

        self.render_tick(Utc::now())?;

        let task_state = Arc::clone(self);
        *slot = Some(tokio::spawn(async move {
            display_refresh_task(task_state).await;
        }));
        Ok(())
    }

    /// Stop the timer and release the scheduled tick. No-op when idle.
    pub fn stop(&self) -> Result<(), String> {
        self.cancel_ticker();

        let mut timer = self
            .timer_state
            .lock()
            .map_err(|e| format!("Failed to lock timer state: {}", e))?;
        if timer.is_running() {
            info!("Timer stopped");
        }
        timer.halt();
        Ok(())
    }

    /// Abort the registered tick task, if any. Cancellation is immediate.
    fn cancel_ticker(&self) {
        match self.ticker.lock() {
            Ok(mut slot) => {
                if let Some(handle) = slot.take() {
                    handle.abort();
                    debug!("Cancelled scheduled display tick");
                }
            }
            Err(e) => warn!("Failed to lock ticker slot for cancellation: {}", e),
        }
    }

    /// Compute and publish the current display value
    ///
    /// Writes to the display only when the formatted value changed since
    /// the last successful write. A frame landing on a whole-minute
    /// boundary carries the emphasis flag for the renderer.
    pub fn render_tick(&self, now: DateTime<Utc>) -> Result<TickOutcome, String> {
        let mut timer = self
            .timer_state
            .lock()
            .map_err(|e| format!("Failed to lock timer state: {}", e))?;

        if !timer.is_running() {
            return Ok(TickOutcome::Idle);
        }

        let elapsed = timer.elapsed_seconds(now);
        let text = format_clock(elapsed);
        if text == timer.last_rendered {
            return Ok(TickOutcome::Unchanged);
        }

        let emphasis = elapsed > 0 && elapsed % 60 == 0;
        match self.frame_tx.send(DisplayFrame::new(text.clone(), emphasis)) {
            Ok(()) => {
                timer.last_rendered = text;
                Ok(TickOutcome::Rendered)
            }
            Err(_) => Ok(TickOutcome::NoDisplay),
        }
    }

    /// Whole minutes elapsed in the current session, 0 while idle
    pub fn elapsed_minutes(&self) -> u64 {
        self.timer_state
            .lock()
            .map(|timer| timer.elapsed_minutes(Utc::now()))
            .unwrap_or(0)
    }

    /// True iff the timer is running and a tick task is scheduled
    pub fn is_active(&self) -> bool {
        let running = self
            .timer_state
            .lock()
            .map(|timer| timer.is_running())
            .unwrap_or(false);
        let ticking = self
            .ticker
            .lock()
            .map(|slot| slot.as_ref().map_or(false, |h| !h.is_finished()))
            .unwrap_or(false);
        running && ticking
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn anchor() -> DateTime<Utc> {
        "2024-03-01T12:00:00Z".parse().unwrap()
    }

    fn running_state(t0: DateTime<Utc>) -> Arc<AppState> {
        let state = Arc::new(AppState::new());
        *state.timer_state.lock().unwrap() = TimerState::started(t0);
        state
    }

    #[test]
    fn tick_renders_formatted_elapsed_time() {
        let t0 = anchor();
        let state = running_state(t0);
        let rx = state.attach_display();

        let outcome = state.render_tick(t0 + Duration::seconds(1)).unwrap();
        assert_eq!(outcome, TickOutcome::Rendered);
        assert_eq!(rx.borrow().text, "00:00:01");

        state.render_tick(t0 + Duration::seconds(3661)).unwrap();
        assert_eq!(rx.borrow().text, "01:01:01");
    }

    #[test]
    fn tick_suppresses_unchanged_values() {
        let t0 = anchor();
        let state = running_state(t0);
        let mut rx = state.attach_display();

        let now = t0 + Duration::seconds(5);
        assert_eq!(state.render_tick(now).unwrap(), TickOutcome::Rendered);
        rx.borrow_and_update();

        // A second tick within the same second writes nothing
        assert_eq!(state.render_tick(now).unwrap(), TickOutcome::Unchanged);
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn tick_clamps_elapsed_below_start_time() {
        let t0 = anchor();
        let state = running_state(t0);
        let rx = state.attach_display();

        state.render_tick(t0 - Duration::seconds(3)).unwrap();
        assert_eq!(rx.borrow().text, "00:00:00");
    }

    #[test]
    fn whole_minute_frames_carry_emphasis() {
        let t0 = anchor();
        let state = running_state(t0);
        let rx = state.attach_display();

        state.render_tick(t0 + Duration::seconds(60)).unwrap();
        assert_eq!(rx.borrow().text, "00:01:00");
        assert!(rx.borrow().emphasis);

        state.render_tick(t0 + Duration::seconds(61)).unwrap();
        assert_eq!(rx.borrow().text, "00:01:01");
        assert!(!rx.borrow().emphasis);
    }

    #[test]
    fn first_tick_at_zero_has_no_emphasis() {
        let t0 = anchor();
        let state = running_state(t0);
        let rx = state.attach_display();

        state.render_tick(t0).unwrap();
        assert_eq!(rx.borrow().text, "00:00:00");
        assert!(!rx.borrow().emphasis);
    }

    #[test]
    fn tick_without_display_skips_write_but_stays_accurate() {
        let t0 = anchor();
        let state = running_state(t0);

        let outcome = state.render_tick(t0 + Duration::seconds(90)).unwrap();
        assert_eq!(outcome, TickOutcome::NoDisplay);

        let timer = state.timer_state.lock().unwrap();
        assert!(timer.last_rendered.is_empty());
        assert_eq!(timer.elapsed_minutes(t0 + Duration::seconds(90)), 1);
    }

    #[test]
    fn tick_while_idle_does_nothing() {
        let state = Arc::new(AppState::new());
        let rx = state.attach_display();

        assert_eq!(state.render_tick(anchor()).unwrap(), TickOutcome::Idle);
        assert_eq!(rx.borrow().text, "");
    }

    #[tokio::test]
    async fn start_and_stop_manage_the_tick_task() {
        let state = Arc::new(AppState::new());
        assert!(!state.is_active());

        state.start(Some(Utc::now())).unwrap();
        assert!(state.is_active());

        state.stop().unwrap();
        assert!(!state.is_active());
        assert_eq!(state.elapsed_minutes(), 0);

        // Stopping again while idle is a no-op
        state.stop().unwrap();
        assert!(!state.is_active());
    }

    #[tokio::test]
    async fn restart_resets_to_the_new_start_time() {
        let state = Arc::new(AppState::new());
        let earlier = Utc::now() - Duration::seconds(600);

        state.start(Some(earlier)).unwrap();
        assert_eq!(state.elapsed_minutes(), 10);

        // A second start replaces the first run entirely
        state.start(Some(Utc::now())).unwrap();
        assert!(state.is_active());
        assert_eq!(state.elapsed_minutes(), 0);

        state.stop().unwrap();
    }

    #[tokio::test]
    async fn start_renders_immediately() {
        let state = Arc::new(AppState::new());
        let mut rx = state.attach_display();

        let earlier = Utc::now() - Duration::milliseconds(125_500);
        state.start(Some(earlier)).unwrap();

        // The immediate render happens before start returns
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().text, "00:02:05");

        state.stop().unwrap();
    }
}
