//! Command-line surface for web-monitor.

use clap::{Parser, ValueEnum};
use tracing::Level;

use crate::config::{DEFAULT_INTERVAL_SECS, DEFAULT_TIMEOUT_SECS};

/// Log level options for CLI parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// `None` disables logging entirely.
    pub fn as_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "web-monitor",
    about = "Polls HTTP(S) endpoints and shows live latency and size statistics",
    version,
    after_help = "Example: web-monitor https://example.com https://seznam.cz"
)]
pub struct Args {
    /// URLs to poll (http or https)
    #[arg(value_name = "URL")]
    pub targets: Vec<String>,

    /// Seconds between the end of one poll and the start of the next
    #[arg(long, default_value_t = DEFAULT_INTERVAL_SECS)]
    pub interval: u64,

    /// Per-request timeout in seconds, body included
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Log level (logs go to stderr)
    #[arg(long, value_enum, default_value = "warn")]
    pub log_level: LogLevel,

    /// Print the final statistics as JSON
    #[arg(long)]
    pub json: bool,

    /// Append live tables instead of clearing the screen
    #[arg(long)]
    pub no_clear: bool,
}
