use std::fmt::Write as _;
use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::stats::{ChangeListener, StatsSnapshot, TargetStats};

// ─── Layout ──────────────────────────────────────────────────────

const LABEL_WIDTH: usize = 30;
const LABEL_MAX: usize = 28;
const LABEL_KEEP: usize = 25;

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

const KIB: u64 = 1024;
const MIB: u64 = 1024 * 1024;

// ─── Render seam ─────────────────────────────────────────────────

/// Output sink for statistics tables.
pub trait Render: Send + Sync {
    /// Periodic redraw from the display loop.
    fn live(&self, rows: &[StatsSnapshot]);

    /// The single end-of-run render, after every worker has stopped.
    fn last(&self, rows: &[StatsSnapshot]);
}

/// Writes tables to stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalRenderer {
    /// Emit the final snapshot as JSON instead of a table.
    pub json: bool,
    /// Append live tables instead of clearing the screen first.
    pub no_clear: bool,
}

impl Render for TerminalRenderer {
    fn live(&self, rows: &[StatsSnapshot]) {
        let mut out = String::new();
        if !self.no_clear {
            out.push_str(CLEAR_SCREEN);
        }
        out.push_str(&render_table(rows));
        emit(&out);
    }

    fn last(&self, rows: &[StatsSnapshot]) {
        if let Some(out) = self.final_text(rows) {
            emit(&out);
        }
    }
}

impl TerminalRenderer {
    /// Everything the final render puts on stdout.  In JSON mode that is
    /// the report and nothing else.
    pub fn final_text(&self, rows: &[StatsSnapshot]) -> Option<String> {
        if !self.json {
            return Some(format!("\nFinal Statistics:\n{}", render_table(rows)));
        }
        match serde_json::to_string_pretty(&Report::from_rows(rows)) {
            Ok(json) => Some(json + "\n"),
            Err(e) => {
                warn!(error = %e, "failed to serialize final report");
                None
            }
        }
    }
}

fn emit(text: &str) {
    let mut stdout = io::stdout().lock();
    if let Err(e) = stdout
        .write_all(text.as_bytes())
        .and_then(|()| stdout.flush())
    {
        warn!(error = %e, "failed to write table");
    }
}

// ─── Display loop ────────────────────────────────────────────────

/// Draws once, then redraws on every (coalesced) change until cancelled.
/// Does not draw on the way out; the coordinator owns the final render.
pub async fn display_loop(
    targets: Arc<[Arc<TargetStats>]>,
    mut listener: ChangeListener,
    renderer: Arc<dyn Render>,
    cancel: CancellationToken,
) {
    renderer.live(&snapshot_all(&targets));

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            changed = listener.changed() => {
                if !changed {
                    // Every producer is gone; nothing left but shutdown
                    cancel.cancelled().await;
                    break;
                }
                renderer.live(&snapshot_all(&targets));
            }
        }
    }

    debug!("display loop stopped");
}

/// Fresh snapshots in target insertion order.
pub fn snapshot_all(targets: &[Arc<TargetStats>]) -> Vec<StatsSnapshot> {
    targets.iter().map(|t| t.snapshot()).collect()
}

// ─── Table ───────────────────────────────────────────────────────

pub fn render_table(rows: &[StatsSnapshot]) -> String {
    let mut out = String::new();

    push_row(
        &mut out,
        [
            "URL",
            "Duration Min",
            "Duration Avg",
            "Duration Max",
            "Size Min",
            "Size Avg",
            "Size Max",
            "OK",
        ],
    );
    push_row(
        &mut out,
        [
            &"─".repeat(LABEL_MAX),
            &"─".repeat(12),
            &"─".repeat(12),
            &"─".repeat(12),
            &"─".repeat(9),
            &"─".repeat(9),
            &"─".repeat(9),
            &"─".repeat(14),
        ],
    );

    for row in rows {
        let label = truncate_label(&row.target);
        let ok = format!("{}/{}", row.success_count, row.count);

        let cells = if row.has_samples() {
            [
                format_duration(row.min_duration),
                format_duration(row.average_duration()),
                format_duration(row.max_duration),
                format_size(row.min_size),
                format_size(row.average_size()),
                format_size(row.max_size),
            ]
        } else {
            std::array::from_fn(|_| "-".to_owned())
        };

        push_row(
            &mut out,
            [
                &label, &cells[0], &cells[1], &cells[2], &cells[3], &cells[4], &cells[5], &ok,
            ],
        );
    }

    out
}

fn push_row(out: &mut String, cells: [&str; 8]) {
    let _ = writeln!(
        out,
        "{:<lw$} {:<12} {:<12} {:<12} {:<10} {:<10} {:<10} {:<15}",
        cells[0],
        cells[1],
        cells[2],
        cells[3],
        cells[4],
        cells[5],
        cells[6],
        cells[7],
        lw = LABEL_WIDTH,
    );
}

pub fn truncate_label(label: &str) -> String {
    if label.chars().count() <= LABEL_MAX {
        return label.to_owned();
    }
    let head: String = label.chars().take(LABEL_KEEP).collect();
    format!("{head}...")
}

/// Milliseconds below one second, seconds with two decimals above.
pub fn format_duration(d: Duration) -> String {
    if d >= Duration::from_secs(1) {
        format!("{:.2}s", d.as_secs_f64())
    } else {
        format!("{}ms", d.as_millis())
    }
}

pub fn format_size(bytes: u64) -> String {
    if bytes >= MIB {
        format!("{:.1}MB", bytes as f64 / MIB as f64)
    } else if bytes >= KIB {
        format!("{:.1}KB", bytes as f64 / KIB as f64)
    } else {
        format!("{bytes}B")
    }
}

// ─── JSON report ─────────────────────────────────────────────────

/// Machine-readable form of the final snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub targets: Vec<TargetReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TargetReport {
    pub url: String,
    pub total_requests: u64,
    pub success_count: u64,
    // Extremes and averages are null until the first sample
    pub min_duration_us: Option<u64>,
    pub avg_duration_us: Option<u64>,
    pub max_duration_us: Option<u64>,
    pub min_size_bytes: Option<u64>,
    pub avg_size_bytes: Option<u64>,
    pub max_size_bytes: Option<u64>,
}

impl Report {
    pub fn from_rows(rows: &[StatsSnapshot]) -> Self {
        Self {
            targets: rows.iter().map(TargetReport::from).collect(),
        }
    }
}

impl From<&StatsSnapshot> for TargetReport {
    fn from(s: &StatsSnapshot) -> Self {
        let us = |d: Duration| u64::try_from(d.as_micros()).unwrap_or(u64::MAX);
        let has = s.has_samples();

        Self {
            url: s.target.clone(),
            total_requests: s.count,
            success_count: s.success_count,
            min_duration_us: has.then(|| us(s.min_duration)),
            avg_duration_us: has.then(|| us(s.average_duration())),
            max_duration_us: has.then(|| us(s.max_duration)),
            min_size_bytes: has.then_some(s.min_size),
            avg_size_bytes: has.then(|| s.average_size()),
            max_size_bytes: has.then_some(s.max_size),
        }
    }
}
