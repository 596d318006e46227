use std::future::Future;
use std::sync::Arc;

use parking_lot::Mutex;
use reqwest::Client;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::config::PollSettings;
use crate::display::{self, Render};
use crate::poller;
use crate::stats::{change_signal, StatsSnapshot, TargetStats};
use crate::targets::Target;

// ─── Lifecycle ───────────────────────────────────────────────────

/// Coordinator lifecycle.  Only moves forward; there is no way back to
/// `Running` once draining starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    Idle,
    Running,
    Draining,
    Stopped,
}

#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("monitor already started (state: {0:?})")]
    AlreadyStarted(MonitorState),
}

/// Tasks of one run, handed back to [`Monitor::drain`].
#[derive(Debug)]
pub struct RunHandle {
    cancel: CancellationToken,
    workers: Vec<JoinHandle<()>>,
    display: JoinHandle<()>,
}

// ─── Monitor ─────────────────────────────────────────────────────

/// Owns the per-target statistics, the poll workers and the display loop.
pub struct Monitor {
    /// Fixed at construction, in input order.
    targets: Arc<[Arc<TargetStats>]>,
    client: Client,
    settings: PollSettings,
    renderer: Arc<dyn Render>,
    state: Mutex<MonitorState>,
}

impl Monitor {
    pub fn new(
        targets: Vec<Target>,
        settings: PollSettings,
        renderer: Arc<dyn Render>,
    ) -> Result<Self, MonitorError> {
        let client = Client::builder().build()?;

        Ok(Self {
            targets: targets
                .into_iter()
                .map(|t| Arc::new(TargetStats::new(t)))
                .collect(),
            client,
            settings,
            renderer,
            state: Mutex::new(MonitorState::Idle),
        })
    }

    pub fn state(&self) -> MonitorState {
        *self.state.lock()
    }

    pub fn settings(&self) -> PollSettings {
        self.settings
    }

    pub fn stats(&self) -> &[Arc<TargetStats>] {
        &self.targets
    }

    pub fn stats_for(&self, target: &str) -> Option<&Arc<TargetStats>> {
        self.targets.iter().find(|s| s.target().as_str() == target)
    }

    pub fn snapshot(&self) -> Vec<StatsSnapshot> {
        display::snapshot_all(&self.targets)
    }

    /// Idle → Running: one poll worker per target plus the display loop.
    pub fn start(&self) -> Result<RunHandle, MonitorError> {
        let mut state = self.state.lock();
        if *state != MonitorState::Idle {
            return Err(MonitorError::AlreadyStarted(*state));
        }

        let cancel = CancellationToken::new();
        let (signal, listener) = change_signal();

        let display = tokio::spawn(display::display_loop(
            self.targets.clone(),
            listener,
            self.renderer.clone(),
            cancel.clone(),
        ));

        let workers = poller::spawn_workers(
            &self.targets,
            &self.client,
            self.settings,
            &signal,
            &cancel,
        );

        *state = MonitorState::Running;
        info!(
            targets = self.targets.len(),
            interval_ms = self.settings.interval.as_millis() as u64,
            timeout_ms = self.settings.request_timeout.as_millis() as u64,
            "monitor started"
        );

        Ok(RunHandle {
            cancel,
            workers,
            display,
        })
    }

    /// Running → Draining → Stopped.  Cancels every task, waits for all of
    /// them (in-flight polls included), then renders once.
    /// A `RunHandle` only comes from `start`, so the monitor is `Running` here.
    pub async fn drain(&self, handle: RunHandle) -> Vec<StatsSnapshot> {
        *self.state.lock() = MonitorState::Draining;
        info!("draining in-flight polls");

        let RunHandle {
            cancel,
            workers,
            display,
        } = handle;
        cancel.cancel();

        for worker in workers {
            if let Err(e) = worker.await {
                error!(error = %e, "poll worker ended abnormally");
            }
        }
        if let Err(e) = display.await {
            error!(error = %e, "display loop ended abnormally");
        }

        *self.state.lock() = MonitorState::Stopped;

        let rows = self.snapshot();
        self.renderer.last(&rows);
        info!("monitor stopped");

        rows
    }

    /// Full lifecycle: start, run until `shutdown` resolves, drain.
    pub async fn run<F>(&self, shutdown: F) -> Result<Vec<StatsSnapshot>, MonitorError>
    where
        F: Future<Output = ()>,
    {
        let handle = self.start()?;
        shutdown.await;
        Ok(self.drain(handle).await)
    }
}
