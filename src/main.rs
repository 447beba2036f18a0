//! Study Timer - a terminal timer and notification client for study sessions
//!
//! This is the main entry point for the study-timer application.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tracing::info;

use study_timer::{
    client::StudyApi,
    config::{Command, Config},
    display::render_task,
    notify::{presenter_task, Notifier},
    session::SessionController,
    state::AppState,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("study_timer={}", config.log_level()))
        .init();

    info!("Starting study-timer v0.1.0");
    info!(
        "Configuration: server={}, headless={}",
        config.server_url(),
        config.headless
    );

    // Create application state and the notification layer
    let state = Arc::new(AppState::new());
    let notifier = Notifier::new();

    // Attach the terminal display unless running headless
    if !config.headless {
        let frames = state.attach_display();
        tokio::spawn(async move {
            render_task(frames).await;
        });
    }

    // Toast presenter for session notifications
    let toasts = notifier.subscribe();
    tokio::spawn(async move {
        presenter_task(toasts).await;
    });

    let api = StudyApi::new(config.server_url());
    let controller = SessionController::new(Arc::clone(&state), api, notifier.clone());

    let mut failed = false;
    match config.command.unwrap_or(Command::Watch) {
        Command::Start { subject } => {
            if controller.start_session(&subject).await {
                watch_until_shutdown(&state).await;
            } else {
                failed = true;
            }
        }
        Command::Stop { notes } => {
            failed = !controller.stop_session(notes.as_deref()).await;
        }
        Command::Watch => {
            if controller.resume_active_session().await {
                watch_until_shutdown(&state).await;
            } else {
                notifier.info("No study session in progress");
            }
        }
    }

    // Give the toast presenter a moment to drain before the process exits
    sleep(Duration::from_millis(100)).await;

    if failed {
        std::process::exit(1);
    }
    Ok(())
}

/// Keep the display ticking until a shutdown signal arrives
///
/// Detaching only releases the local display; the session keeps running
/// on the backend until it is explicitly stopped.
async fn watch_until_shutdown(state: &Arc<AppState>) {
    shutdown_signal().await;

    if let Err(e) = state.stop() {
        tracing::warn!("Failed to release the timer display: {}", e);
    }
    // Move the shell prompt off the timer line
    println!();
    info!("Display detached, session continues on the backend");
}
