use chrono::{DateTime, Utc};

use crate::session::MetricOrientation;

use super::IntervalRecord;

/// Partitions elapsed time into fixed-width windows and keeps a bounded
/// FIFO of per-window consumption records.
///
/// The caller drives this with `record_if_due` on every tick; the tick
/// cadence only bounds how late a window boundary is detected, it is not
/// the window width. When ticks are coarser than the width, one record
/// covering the full elapsed span is written rather than reconstructing
/// sub-windows that were never sampled.
#[derive(Debug, Clone)]
pub struct IntervalAggregator {
    orientation: MetricOrientation,
    width_ms: i64,
    capacity: usize,
    records: Vec<IntervalRecord>,
    last_interval_time: DateTime<Utc>,
    last_interval_metric: f64,
}

impl IntervalAggregator {
    pub fn new(
        orientation: MetricOrientation,
        width_ms: i64,
        capacity: usize,
        now: DateTime<Utc>,
        metric: f64,
    ) -> Self {
        Self {
            orientation,
            width_ms,
            capacity,
            records: Vec::with_capacity(capacity),
            last_interval_time: now,
            last_interval_metric: metric,
        }
    }

    /// Closes a window if at least one width has elapsed, returning the
    /// appended record. Append and eviction happen in one step so a
    /// reader never observes the buffer over capacity.
    pub fn record_if_due(&mut self, now: DateTime<Utc>, metric: f64) -> Option<&IntervalRecord> {
        let elapsed_ms = (now - self.last_interval_time).num_milliseconds();
        if elapsed_ms < self.width_ms {
            return None;
        }

        let consumed = self.orientation.consumed(self.last_interval_metric, metric);
        let hours = elapsed_ms as f64 / 3_600_000.0;
        let rate_per_hour = if hours > 0.0 { consumed / hours } else { 0.0 };

        self.records.push(IntervalRecord {
            interval_start: self.last_interval_time,
            interval_end: now,
            start_metric: self.last_interval_metric,
            end_metric: metric,
            rate_per_hour,
        });
        if self.records.len() > self.capacity {
            self.records.remove(0);
        }

        self.last_interval_time = now;
        self.last_interval_metric = metric;

        self.records.last()
    }

    pub fn records(&self) -> &[IntervalRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Snapshot of the most recent records, oldest first. `None` returns
    /// the whole history.
    pub fn last_records(&self, max: Option<usize>) -> Vec<IntervalRecord> {
        let take = match max {
            Some(n) => n.min(self.records.len()),
            None => self.records.len(),
        };
        self.records[self.records.len() - take..].to_vec()
    }

    /// Mean hourly rate over the last `intervals` records. Zero or
    /// oversized counts clamp to the whole history; `None` only when no
    /// window has closed yet.
    pub fn average_rate(&self, intervals: Option<usize>) -> Option<f64> {
        if self.records.is_empty() {
            return None;
        }

        let take = match intervals {
            Some(n) if n > 0 => n.min(self.records.len()),
            _ => self.records.len(),
        };
        let recent = &self.records[self.records.len() - take..];
        let sum: f64 = recent.iter().map(|record| record.rate_per_hour).sum();
        Some(sum / recent.len() as f64)
    }

    /// Clears the history and restarts the window clock at `now`.
    pub fn reset(&mut self, now: DateTime<Utc>, metric: f64) {
        self.records.clear();
        self.last_interval_time = now;
        self.last_interval_metric = metric;
    }
}
