//! Signal handling for graceful shutdown

use futures::stream::StreamExt;
use signal_hook_tokio::Signals;
use tracing::info;

/// Wait for shutdown signals (SIGTERM, SIGINT)
///
/// Resolves on the first signal received. The caller detaches the display;
/// the session itself keeps running on the backend.
pub async fn shutdown_signal() {
    let mut signals = Signals::new([
        signal_hook::consts::SIGTERM,
        signal_hook::consts::SIGINT,
    ])
    .expect("Failed to create signal handler");

    if let Some(signal) = signals.next().await {
        info!("Received signal {}, detaching", signal);
    }
}
