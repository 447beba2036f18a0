//! Configuration and CLI argument handling

use clap::{Parser, Subcommand};

/// CLI argument parsing structure
#[derive(Parser)]
#[command(name = "study-timer")]
#[command(about = "A terminal timer and notification client for study-session tracking")]
#[command(version = "0.1.0")]
pub struct Config {
    /// Base URL of the study tracker backend
    #[arg(short, long, default_value = "http://127.0.0.1:5000")]
    pub server: String,

    /// Track session state without rendering a terminal display
    #[arg(long)]
    pub headless: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Session actions exposed by the CLI
#[derive(Subcommand)]
pub enum Command {
    /// Start a study session for a subject and watch the timer
    Start {
        /// Subject identifier, e.g. "reading" or "social_studies"
        subject: String,
    },
    /// Stop the in-progress study session
    Stop {
        /// Optional notes to record with the session
        #[arg(short, long)]
        notes: Option<String>,
    },
    /// Watch an in-progress session (default when no command is given)
    Watch,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the backend base URL without a trailing slash
    pub fn server_url(&self) -> String {
        self.server.trim_end_matches('/').to_string()
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}
