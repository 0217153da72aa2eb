use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One closed measurement window, immutable once appended.
///
/// `rate_per_hour` is the consumption observed over the window scaled to
/// an hourly rate: percent per hour for the battery engine, microwatt
/// hours per hour for the power engine.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntervalRecord {
    pub interval_start: DateTime<Utc>,
    pub interval_end: DateTime<Utc>,
    pub start_metric: f64,
    pub end_metric: f64,
    pub rate_per_hour: f64,
}

impl IntervalRecord {
    pub fn duration_minutes(&self) -> f64 {
        (self.interval_end - self.interval_start).num_milliseconds() as f64 / 60_000.0
    }

    /// Consumption over this window, already clamped to non-negative
    /// when the record was created.
    pub fn consumed(&self) -> f64 {
        let hours = (self.interval_end - self.interval_start).num_milliseconds() as f64 / 3_600_000.0;
        self.rate_per_hour * hours
    }
}
