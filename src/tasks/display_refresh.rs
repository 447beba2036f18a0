//! Periodic display refresh background task

use std::{sync::Arc, time::Duration};

use chrono::Utc;
use tokio::time::interval;
use tracing::{debug, error};

use crate::state::{AppState, TickOutcome};

/// Background task that recomputes the displayed elapsed time once per second
///
/// The task itself is dumb: each tick it asks the state to render, and the
/// state decides whether the display actually needs a write. Lifetime is
/// managed by `AppState` — a start registers the task, a stop or a
/// replacing start aborts it.
pub async fn display_refresh_task(state: Arc<AppState>) {
    debug!("Starting display refresh task");

    let mut ticker = interval(Duration::from_secs(1));

    loop {
        ticker.tick().await;

        match state.render_tick(Utc::now()) {
            Ok(TickOutcome::Idle) => {
                // Timer went idle underneath us; nothing left to refresh
                debug!("Timer idle, display refresh task exiting");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                error!("Display refresh tick failed: {}", e);
            }
        }
    }
}
