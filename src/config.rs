use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// Configuration for the tracking engines with tunable thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrackerConfig {
    /// Width of one consumption interval. One record is appended per
    /// completed window, regardless of how often `on_tick` fires.
    pub measurement_interval_ms: i64,

    /// Bound on the interval-record history. Oldest records are evicted
    /// first once the bound is exceeded.
    pub max_interval_records: usize,

    /// Bound on the raw power-measurement buffer.
    pub max_power_measurements: usize,

    /// Consumption-rate queries report zero until at least this much time
    /// has elapsed since the last baseline check.
    pub min_rate_window_ms: i64,

    /// Cadence at which the monitor loop drives `on_tick`.
    pub poll_period_ms: u64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            measurement_interval_ms: 60_000,
            max_interval_records: 60,
            max_power_measurements: 60,
            min_rate_window_ms: 60_000,
            poll_period_ms: 1_000,
        }
    }
}

impl TrackerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.measurement_interval_ms <= 0 {
            bail!("measurement_interval_ms must be greater than zero");
        }
        if self.max_interval_records == 0 {
            bail!("max_interval_records must be greater than zero");
        }
        if self.max_power_measurements == 0 {
            bail!("max_power_measurements must be greater than zero");
        }
        if self.poll_period_ms == 0 {
            bail!("poll_period_ms must be greater than zero");
        }
        Ok(())
    }

    /// Loads a config from a JSON file, falling back to defaults when the
    /// file does not exist.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let config = if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_default()
        } else {
            Self::default()
        };

        config.validate()?;
        Ok(config)
    }
}
