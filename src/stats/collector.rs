use std::time::Duration;

use parking_lot::RwLock;

use super::Outcome;
use crate::targets::Target;

// ─── Public types ────────────────────────────────────────────────

/// Running statistics for one target.
/// Its poll worker calls `record()`, the display loop calls `snapshot()`.
#[derive(Debug)]
pub struct TargetStats {
    target: Target,
    inner: RwLock<Inner>,
}

/// Point-in-time copy of a target's statistics.  Owns its data, so later
/// `record()` calls never show through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub target: String,
    pub count: u64,
    pub success_count: u64,

    // Extremes are only meaningful once `count > 0`
    pub min_duration: Duration,
    pub max_duration: Duration,
    pub total_duration: Duration,

    pub min_size: u64,
    pub max_size: u64,
    pub total_size: u64,
}

// ─── Internal state ──────────────────────────────────────────────

#[derive(Debug, Default)]
struct Inner {
    count: u64,
    success_count: u64,
    min_duration: Duration,
    max_duration: Duration,
    total_duration: Duration,
    min_size: u64,
    max_size: u64,
    total_size: u64,
}

// ─── TargetStats impl ────────────────────────────────────────────

impl TargetStats {
    pub fn new(target: Target) -> Self {
        Self {
            target,
            inner: RwLock::new(Inner::default()),
        }
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    /// Fold one poll outcome in.  Every field changes under a single
    /// write guard.
    pub fn record(&self, outcome: Outcome) {
        self.inner.write().record(outcome);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        self.inner.read().snapshot(&self.target)
    }

    pub fn average_duration(&self) -> Duration {
        self.snapshot().average_duration()
    }

    pub fn average_size(&self) -> u64 {
        self.snapshot().average_size()
    }
}

// ─── Inner impl ──────────────────────────────────────────────────

impl Inner {
    fn record(&mut self, outcome: Outcome) {
        let Outcome {
            duration,
            size,
            success,
        } = outcome;

        // First sample sets both extremes outright
        if self.count == 0 {
            self.min_duration = duration;
            self.max_duration = duration;
            self.min_size = size;
            self.max_size = size;
        } else {
            self.min_duration = self.min_duration.min(duration);
            self.max_duration = self.max_duration.max(duration);
            self.min_size = self.min_size.min(size);
            self.max_size = self.max_size.max(size);
        }

        self.count += 1;
        if success {
            self.success_count += 1;
        }
        self.total_duration = self.total_duration.saturating_add(duration);
        self.total_size = self.total_size.saturating_add(size);
    }

    fn snapshot(&self, target: &Target) -> StatsSnapshot {
        StatsSnapshot {
            target: target.as_str().to_owned(),
            count: self.count,
            success_count: self.success_count,
            min_duration: self.min_duration,
            max_duration: self.max_duration,
            total_duration: self.total_duration,
            min_size: self.min_size,
            max_size: self.max_size,
            total_size: self.total_size,
        }
    }
}

// ─── Derived values ──────────────────────────────────────────────

impl StatsSnapshot {
    pub fn has_samples(&self) -> bool {
        self.count > 0
    }

    /// `total_duration / count`, or zero before the first sample.
    pub fn average_duration(&self) -> Duration {
        if self.count == 0 {
            return Duration::ZERO;
        }
        let nanos = self.total_duration.as_nanos() / u128::from(self.count);
        Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
    }

    /// `total_size / count`, or zero before the first sample.
    pub fn average_size(&self) -> u64 {
        if self.count == 0 {
            return 0;
        }
        self.total_size / self.count
    }
}
