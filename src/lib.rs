//! Polls a fixed set of HTTP(S) endpoints on a fixed cadence, keeps running
//! latency / size statistics per endpoint and renders them as a live table
//! until shutdown.

pub mod cli;
pub mod config;
pub mod display;
pub mod monitor;
pub mod poller;
pub mod stats;
pub mod targets;

pub use config::PollSettings;
pub use display::{Render, TerminalRenderer};
pub use monitor::{Monitor, MonitorError, MonitorState, RunHandle};
pub use stats::{Outcome, StatsSnapshot, TargetStats};
pub use targets::{Target, TargetError};
