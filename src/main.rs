use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::signal;
use tracing::{error, info};

use web_monitor::cli::Args;
use web_monitor::{targets, Monitor, PollSettings, TerminalRenderer};

/// Initializes the tracing subscriber.  Logs go to stderr so stdout only
/// ever carries tables.
fn setup_logging(args: &Args) {
    let Some(level) = args.log_level.as_level() else {
        return;
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("failed to install tracing subscriber: {e}");
    }
}

fn print_usage() {
    eprintln!("Usage: web-monitor [OPTIONS] <url1> [url2] ...");
    eprintln!();
    eprintln!("Example: web-monitor https://example.com https://seznam.cz");
    eprintln!("Example: web-monitor https://google.com https://github.com");
    eprintln!();
    eprintln!("Run with --help for all options.");
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT (Ctrl+C), shutting down gracefully..."),
        _ = terminate => info!("Received SIGTERM, shutting down gracefully..."),
    }

    eprintln!("\nShutting down gracefully...");
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    setup_logging(&args);

    // ── 1. Validate input ────────────────────────────────────────
    let targets = match targets::validate(args.targets.as_slice()) {
        Ok(t) => t,
        Err(e) => {
            print_usage();
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let settings = match PollSettings::from_secs(args.interval, args.timeout) {
        Ok(s) => s,
        Err(e) => {
            print_usage();
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    // ── 2. Run until interrupted ─────────────────────────────────
    match run(&args, targets, settings).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(
    args: &Args,
    targets: Vec<targets::Target>,
    settings: PollSettings,
) -> anyhow::Result<()> {
    let renderer = Arc::new(TerminalRenderer {
        json: args.json,
        no_clear: args.no_clear,
    });

    let monitor = Monitor::new(targets, settings, renderer).context("failed to set up monitor")?;

    // Final table is rendered by the monitor once every worker has stopped
    monitor
        .run(shutdown_signal())
        .await
        .context("monitor run failed")?;

    Ok(())
}
