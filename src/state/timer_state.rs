//! Timer state structure and elapsed-time queries

use chrono::{DateTime, Utc};

/// Timer state for tracking an in-progress study session
#[derive(Debug, Clone)]
pub struct TimerState {
    /// When the session began; absent while idle
    pub start_time: Option<DateTime<Utc>>,
    /// True between start and stop
    pub running: bool,
    /// Last formatted value pushed to the display, used to suppress
    /// redundant redraws; empty until the first write after a start
    pub last_rendered: String,
}

impl TimerState {
    /// Create a new idle timer state
    pub fn new() -> Self {
        Self {
            start_time: None,
            running: false,
            last_rendered: String::new(),
        }
    }

    /// Create a running timer state anchored at the given start time
    pub fn started(start_time: DateTime<Utc>) -> Self {
        Self {
            start_time: Some(start_time),
            running: true,
            last_rendered: String::new(),
        }
    }

    /// Return the timer to idle, clearing the start anchor and the
    /// rendered-value cache so a later start always redraws
    pub fn halt(&mut self) {
        self.start_time = None;
        self.running = false;
        self.last_rendered.clear();
    }

    /// Check if the timer is running
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Whole elapsed seconds at `now`, clamped at zero so a start time
    /// slightly ahead of the local clock never yields a negative duration
    pub fn elapsed_seconds(&self, now: DateTime<Utc>) -> u64 {
        match self.start_time {
            Some(start) => (now - start).num_seconds().max(0) as u64,
            None => 0,
        }
    }

    /// Whole elapsed minutes at `now`, or 0 while idle
    pub fn elapsed_minutes(&self, now: DateTime<Utc>) -> u64 {
        self.elapsed_seconds(now) / 60
    }
}

impl Default for TimerState {
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

    #[test]
    fn new_state_is_idle() {
        let state = TimerState::new();
        assert!(!state.is_running());
        assert!(state.start_time.is_none());
        assert_eq!(state.elapsed_seconds(anchor()), 0);
        assert_eq!(state.elapsed_minutes(anchor()), 0);
    }

    #[test]
    fn started_state_tracks_elapsed_seconds() {
        let t0 = anchor();
        let state = TimerState::started(t0);
        assert!(state.is_running());
        assert_eq!(state.elapsed_seconds(t0 + Duration::seconds(1)), 1);
        assert_eq!(state.elapsed_seconds(t0 + Duration::seconds(3661)), 3661);
    }

    #[test]
    fn elapsed_is_clamped_when_clock_is_behind_start() {
        let t0 = anchor();
        let state = TimerState::started(t0);
        assert_eq!(state.elapsed_seconds(t0 - Duration::seconds(5)), 0);
        assert_eq!(state.elapsed_minutes(t0 - Duration::seconds(5)), 0);
    }

    #[test]
    fn elapsed_minutes_floors_at_the_minute_boundary() {
        let t0 = anchor();
        let state = TimerState::started(t0);
        assert_eq!(state.elapsed_minutes(t0 + Duration::seconds(59)), 0);
        assert_eq!(state.elapsed_minutes(t0 + Duration::seconds(60)), 1);
    }

    #[test]
    fn halt_clears_anchor_and_rendered_value() {
        let t0 = anchor();
        let mut state = TimerState::started(t0);
        state.last_rendered = "00:00:05".to_string();
        state.halt();
        assert!(!state.is_running());
        assert!(state.start_time.is_none());
        assert!(state.last_rendered.is_empty());
        assert_eq!(state.elapsed_minutes(t0 + Duration::seconds(120)), 0);
    }
}
