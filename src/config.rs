use std::time::Duration;

// ─── Configuration ───────────────────────────────────────────────

/// Pause between the end of one poll and the start of the next
pub const DEFAULT_INTERVAL_SECS: u64 = 5;

/// Upper bound on a single request, body included
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

const INTERVAL_RANGE: (u64, u64) = (1, 3600);
const TIMEOUT_RANGE: (u64, u64) = (1, 300);

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("interval must be between {min} and {max} seconds (got {got})")]
    Interval { min: u64, max: u64, got: u64 },

    #[error("timeout must be between {min} and {max} seconds (got {got})")]
    Timeout { min: u64, max: u64, got: u64 },
}

/// Timing knobs shared by every poll worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub interval: Duration,
    pub request_timeout: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(DEFAULT_INTERVAL_SECS),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl PollSettings {
    /// Builds settings from whole-second operator input, range-checked.
    pub fn from_secs(interval_secs: u64, timeout_secs: u64) -> Result<Self, ConfigError> {
        let (min, max) = INTERVAL_RANGE;
        if !(min..=max).contains(&interval_secs) {
            return Err(ConfigError::Interval {
                min,
                max,
                got: interval_secs,
            });
        }

        let (min, max) = TIMEOUT_RANGE;
        if !(min..=max).contains(&timeout_secs) {
            return Err(ConfigError::Timeout {
                min,
                max,
                got: timeout_secs,
            });
        }

        Ok(Self {
            interval: Duration::from_secs(interval_secs),
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_five_and_ten_seconds() {
        let s = PollSettings::default();
        assert_eq!(s.interval, Duration::from_secs(5));
        assert_eq!(s.request_timeout, Duration::from_secs(10));
        assert_eq!(
            PollSettings::from_secs(DEFAULT_INTERVAL_SECS, DEFAULT_TIMEOUT_SECS).unwrap(),
            s
        );
    }

    #[test]
    fn rejects_out_of_range_values() {
        assert!(matches!(
            PollSettings::from_secs(0, 10),
            Err(ConfigError::Interval { got: 0, .. })
        ));
        assert!(matches!(
            PollSettings::from_secs(5, 301),
            Err(ConfigError::Timeout { got: 301, .. })
        ));
    }
}
