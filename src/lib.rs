//! Study Timer - a terminal timer and notification client for study sessions
//!
//! This library provides the elapsed-time display for an in-progress study
//! session, a toast-style notification layer, and the HTTP client for the
//! study tracker backend.

pub mod client;
pub mod config;
pub mod display;
pub mod notify;
pub mod session;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use client::StudyApi;
pub use config::Config;
pub use notify::Notifier;
pub use session::SessionController;
pub use state::AppState;
pub use utils::shutdown_signal;
