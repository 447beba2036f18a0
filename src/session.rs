//! Session controller
//!
//! Ties the backend client, the timer, and the notification layer
//! together. Every backend failure degrades to an error-severity
//! notification; none of it is fatal and nothing is retried.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};

use crate::client::{parse_start_time, StudyApi};
use crate::notify::Notifier;
use crate::state::AppState;
use crate::utils::{format_duration, format_wall_clock, subject_display_name};

/// Drives session start/stop/resume flows against the backend
pub struct SessionController {
    state: Arc<AppState>,
    api: StudyApi,
    notifier: Notifier,
}

impl SessionController {
    /// Create a controller over the shared timer state
    pub fn new(state: Arc<AppState>, api: StudyApi, notifier: Notifier) -> Self {
        Self { state, api, notifier }
    }

    /// Resume displaying an in-progress session, if the backend has one
    ///
    /// Returns true when a session is now being displayed. An unreachable
    /// backend is not an error here; the startup check is best-effort.
    pub async fn resume_active_session(&self) -> bool {
        let session = match self.api.current_session().await {
            Ok(session) => session,
            Err(e) => {
                debug!("Active session check unavailable: {}", e);
                return false;
            }
        };

        if !session.active {
            debug!("No session in progress");
            return false;
        }

        let start_time = session
            .start_time
            .as_deref()
            .and_then(parse_start_time)
            .unwrap_or_else(|| {
                warn!("Backend start time missing or malformed, anchoring at now");
                Utc::now()
            });

        if let Err(e) = self.state.start(Some(start_time)) {
            self.notifier.error(format!("Failed to resume session display: {}", e));
            return false;
        }

        let subject = subject_display_name(session.subject.as_deref().unwrap_or("study"));
        self.notifier.info(format!(
            "Resumed {} session, {} so far (started {})",
            subject,
            format_duration(session.elapsed_seconds),
            format_wall_clock(start_time),
        ));
        true
    }

    /// Start a new study session for `subject`
    ///
    /// The session is stamped with the client's clock, matching what the
    /// timer displays. Returns true when the timer is running.
    pub async fn start_session(&self, subject: &str) -> bool {
        let now = Utc::now();

        let response = match self.api.start_session(subject, now).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Start request failed: {}", e);
                self.notifier.error("Failed to start study session");
                return false;
            }
        };
        if !response.success {
            self.notifier.error("Failed to start study session");
            return false;
        }

        if let Err(e) = self.state.start(Some(now)) {
            self.notifier.error(format!("Failed to start timer display: {}", e));
            return false;
        }

        let message = if subject == "reading" {
            "Time to dive into a great book! Happy reading!".to_string()
        } else {
            format!("Started studying {}!", subject_display_name(subject))
        };
        self.notifier.success(message);
        true
    }

    /// Stop the in-progress study session
    ///
    /// Returns true when the backend recorded the stop. On failure the
    /// timer keeps running so no display time is lost.
    pub async fn stop_session(&self, notes: Option<&str>) -> bool {
        // Capture the fallback duration before the timer goes idle
        let elapsed_minutes = self.state.elapsed_minutes();

        let response = match self.api.stop_session(Utc::now(), notes).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Stop request failed: {}", e);
                self.notifier.error("Failed to stop study session");
                return false;
            }
        };
        if !response.success {
            self.notifier.error("Failed to stop study session");
            return false;
        }

        if let Err(e) = self.state.stop() {
            warn!("Failed to halt timer display: {}", e);
        }

        let duration = response.duration.unwrap_or(elapsed_minutes);
        self.notifier.success(format!(
            "Great job! You studied for {} minutes! {}",
            duration,
            encouragement(duration)
        ));
        true
    }
}

/// Milestone-tiered encouragement shown when a session ends
fn encouragement(minutes: u64) -> &'static str {
    if minutes >= 60 {
        "Wow! You're a study champion!"
    } else if minutes >= 30 {
        "Amazing focus! You're doing great!"
    } else if minutes >= 15 {
        "Good job! Keep up the great work!"
    } else if minutes >= 5 {
        "Nice start! Every minute counts!"
    } else {
        "Great beginning!"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::Severity;

    #[test]
    fn encouragement_tiers_follow_session_length() {
        assert_eq!(encouragement(0), "Great beginning!");
        assert_eq!(encouragement(4), "Great beginning!");
        assert_eq!(encouragement(5), "Nice start! Every minute counts!");
        assert_eq!(encouragement(15), "Good job! Keep up the great work!");
        assert_eq!(encouragement(30), "Amazing focus! You're doing great!");
        assert_eq!(encouragement(59), "Amazing focus! You're doing great!");
        assert_eq!(encouragement(60), "Wow! You're a study champion!");
    }

    #[tokio::test]
    async fn failed_start_surfaces_an_error_and_leaves_the_timer_idle() {
        let state = Arc::new(AppState::new());
        let notifier = Notifier::new();
        let mut notifications = notifier.subscribe();

        // Nothing listens on this address; the request fails fast
        let api = StudyApi::new("http://127.0.0.1:1".to_string());
        let controller = SessionController::new(Arc::clone(&state), api, notifier);

        assert!(!controller.start_session("reading").await);
        assert!(!state.is_active());

        let toast = notifications.try_recv().unwrap();
        assert_eq!(toast.severity, Severity::Error);
        assert_eq!(toast.message, "Failed to start study session");
    }

    #[tokio::test]
    async fn unreachable_backend_means_no_session_to_resume() {
        let state = Arc::new(AppState::new());
        let api = StudyApi::new("http://127.0.0.1:1".to_string());
        let controller = SessionController::new(Arc::clone(&state), api, Notifier::new());

        assert!(!controller.resume_active_session().await);
        assert!(!state.is_active());
    }
}
