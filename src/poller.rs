use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::{Client, StatusCode};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::config::PollSettings;
use crate::stats::{ChangeSignal, Outcome, TargetStats};
use crate::targets::Target;

// ─── Public entry point ──────────────────────────────────────────

/// Spawns one poll worker per target.  Workers run until `cancel` fires
/// and they reach their next wait.
pub fn spawn_workers(
    targets: &[Arc<TargetStats>],
    client: &Client,
    settings: PollSettings,
    signal: &ChangeSignal,
    cancel: &CancellationToken,
) -> Vec<JoinHandle<()>> {
    targets
        .iter()
        .map(|stats| {
            let stats = stats.clone();
            let client = client.clone();
            let signal = signal.clone();
            let cancel = cancel.clone();

            tokio::spawn(async move {
                worker(stats, client, settings, signal, cancel).await;
            })
        })
        .collect()
}

// ─── Worker loop ─────────────────────────────────────────────────

async fn worker(
    stats: Arc<TargetStats>,
    client: Client,
    settings: PollSettings,
    signal: ChangeSignal,
    cancel: CancellationToken,
) {
    let target = stats.target().clone();
    debug!(%target, "poll worker started");

    loop {
        // The in-flight request is never raced against `cancel`; it ends on
        // its own or at the request timeout.
        let outcome = probe(&client, &target, settings.request_timeout).await;
        stats.record(outcome);
        signal.notify();

        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(settings.interval) => {}
        }
    }

    debug!(%target, "poll worker stopped");
}

// ─── Single request ──────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("body read failed after {latency:?}: {source}")]
    Body {
        latency: Duration,
        #[source]
        source: reqwest::Error,
    },
}

/// What a completed exchange looked like on the wire.
struct Exchange {
    latency: Duration,
    status: StatusCode,
    size: u64,
}

/// Issues one GET and reduces it to an [`Outcome`].  Never fails: every
/// error is logged and folded into an unsuccessful outcome.
pub async fn probe(client: &Client, target: &Target, timeout: Duration) -> Outcome {
    let start = Instant::now();

    let result = match tokio::time::timeout(timeout, fetch(client, target, start)).await {
        Ok(result) => result,
        Err(_) => Err(ProbeError::Timeout(timeout)),
    };

    match result {
        Ok(exchange) => {
            let success = is_success(exchange.status);
            debug!(
                %target,
                status = exchange.status.as_u16(),
                latency_ms = exchange.latency.as_millis() as u64,
                size = exchange.size,
                success,
                "poll completed"
            );
            Outcome::new(exchange.latency, exchange.size, success)
        }
        Err(err) => {
            debug!(%target, error = %err, "poll failed");
            let duration = match err {
                ProbeError::Body { latency, .. } => latency,
                ProbeError::Timeout(_) | ProbeError::Transport(_) => start.elapsed(),
            };
            Outcome::failure(duration)
        }
    }
}

async fn fetch(client: &Client, target: &Target, start: Instant) -> Result<Exchange, ProbeError> {
    let mut response = client
        .get(target.url().clone())
        .send()
        .await
        .map_err(ProbeError::Transport)?;

    let latency = start.elapsed();
    let status = response.status();

    // Stream the body so large responses are counted, not buffered
    let mut size = 0u64;
    loop {
        match response.chunk().await {
            Ok(Some(chunk)) => size += chunk.len() as u64,
            Ok(None) => break,
            Err(source) => return Err(ProbeError::Body { latency, source }),
        }
    }

    Ok(Exchange {
        latency,
        status,
        size,
    })
}

/// 2xx and 3xx count as success; everything else does not.
pub fn is_success(status: StatusCode) -> bool {
    (200..400).contains(&status.as_u16())
}
