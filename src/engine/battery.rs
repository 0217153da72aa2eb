use anyhow::Result;
use chrono::{DateTime, Utc};
use log::{info, warn};
use uuid::Uuid;

use crate::config::TrackerConfig;
use crate::interval::{IntervalAggregator, IntervalRecord};
use crate::sampler::BatterySampler;
use crate::session::{LifecycleEvent, MetricOrientation, SessionState};

use super::reports::{BatterySessionReport, BatteryStatus};

/// Tracks battery-level consumption for one app process.
///
/// The engine is scheduling-agnostic: an external driver feeds it
/// `on_tick` / `on_lifecycle` with a monotonic non-decreasing `now`, and
/// the query surface derives reports from the accumulated state. All
/// consumption deltas clamp at zero so charging never shows up as
/// negative usage.
pub struct BatteryEngine<S: BatterySampler> {
    sampler: S,
    session_id: String,
    start_level: i32,
    /// Last reading that was actually available; bridges ticks where the
    /// platform returns the unavailable sentinel.
    last_known_level: i32,
    last_checked_time: DateTime<Utc>,
    last_checked_level: i32,
    min_rate_window_ms: i64,
    session: SessionState,
    intervals: IntervalAggregator,
}

impl<S: BatterySampler> BatteryEngine<S> {
    pub fn new(sampler: S, config: &TrackerConfig, now: DateTime<Utc>) -> Result<Self> {
        config.validate()?;

        let sample = sampler.sample(now);
        let start_level = if sample.level_available() {
            sample.level_percent
        } else {
            warn!("battery level unavailable at startup, tracking from 0");
            0
        };

        Ok(Self {
            sampler,
            session_id: Uuid::new_v4().to_string(),
            start_level,
            last_known_level: start_level,
            last_checked_time: now,
            last_checked_level: start_level,
            min_rate_window_ms: config.min_rate_window_ms,
            session: SessionState::new(MetricOrientation::Depleting, now, start_level as f64),
            intervals: IntervalAggregator::new(
                MetricOrientation::Depleting,
                config.measurement_interval_ms,
                config.max_interval_records,
                now,
                start_level as f64,
            ),
        })
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Current level, falling back to the last available reading when
    /// the sampler reports the unavailable sentinel.
    pub fn level(&mut self) -> i32 {
        let level = self.sampler.read_level_percent();
        if level != crate::sampler::LEVEL_UNAVAILABLE {
            self.last_known_level = level;
        }
        self.last_known_level
    }

    pub fn is_charging(&self) -> bool {
        self.sampler.read_is_charging()
    }

    pub fn is_power_saving(&self) -> bool {
        self.sampler.read_is_power_saving()
    }

    /// Periodic driver entry point. Closes an interval window when one
    /// is due; a no-op otherwise.
    pub fn on_tick(&mut self, now: DateTime<Utc>) {
        let level = self.level();
        self.intervals.record_if_due(now, level as f64);
    }

    /// Edge-triggered visibility change. Duplicate events for the
    /// current state are no-ops.
    pub fn on_lifecycle(&mut self, event: LifecycleEvent, now: DateTime<Utc>) {
        let level = self.level() as f64;
        match event {
            LifecycleEvent::EnteredForeground => self.session.enter_foreground(now, level),
            LifecycleEvent::EnteredBackground => self.session.enter_background(now, level),
        }
    }

    /// Hourly consumption rate since the last call.
    ///
    /// This query advances its own baseline as a side effect, unlike the
    /// rest of the query surface: two immediate calls return the rate
    /// then zero. Returns zero while charging or until a minute has
    /// elapsed since the previous check.
    pub fn consumption_rate(&mut self, now: DateTime<Utc>) -> f64 {
        if self.is_charging() {
            return 0.0;
        }

        let level = self.level();
        let consumed = (self.last_checked_level - level).max(0) as f64;
        let elapsed_ms = (now - self.last_checked_time).num_milliseconds();

        self.last_checked_level = level;
        self.last_checked_time = now;

        if elapsed_ms < self.min_rate_window_ms {
            return 0.0;
        }
        consumed / (elapsed_ms as f64 / 3_600_000.0)
    }

    pub fn status(&mut self, now: DateTime<Utc>) -> BatteryStatus {
        let app_consumption_rate = self.consumption_rate(now);
        BatteryStatus {
            level: self.level(),
            is_charging: self.is_charging(),
            is_power_saving_enabled: self.is_power_saving(),
            app_consumption_rate,
        }
    }

    /// Percent consumed since tracking started, clamped at zero.
    pub fn usage_since_start(&mut self) -> f64 {
        let level = self.level();
        (self.start_level - level).max(0) as f64
    }

    pub fn foreground_usage(&mut self) -> f64 {
        let level = self.level() as f64;
        self.session.foreground_usage(level)
    }

    pub fn background_usage(&mut self) -> f64 {
        let level = self.level() as f64;
        self.session.background_usage(level)
    }

    pub fn foreground_duration_minutes(&self, now: DateTime<Utc>) -> i64 {
        self.session.foreground_duration_minutes(now)
    }

    pub fn background_duration_minutes(&self, now: DateTime<Utc>) -> i64 {
        self.session.background_duration_minutes(now)
    }

    pub fn total_duration_minutes(&self, now: DateTime<Utc>) -> i64 {
        self.session.total_duration_minutes(now)
    }

    pub fn session_report(&mut self, now: DateTime<Utc>) -> BatterySessionReport {
        let level = self.level();
        BatterySessionReport {
            session_id: self.session_id.clone(),
            start_battery_level: self.start_level,
            end_battery_level: level,
            total_duration_minutes: self.session.total_duration_minutes(now),
            app_consumption_percentage: (self.start_level - level).max(0) as f64,
            foreground_duration_minutes: self.session.foreground_duration_minutes(now),
            background_duration_minutes: self.session.background_duration_minutes(now),
        }
    }

    /// Mean hourly rate over the last `intervals` closed windows; `None`
    /// until the first window closes.
    pub fn average_consumption(&self, intervals: Option<usize>) -> Option<f64> {
        self.intervals.average_rate(intervals)
    }

    pub fn interval_history(&self, max: Option<usize>) -> Vec<IntervalRecord> {
        self.intervals.last_records(max)
    }

    /// Restarts tracking from `now` under a fresh session id. Every
    /// baseline, counter and buffer is reinitialized.
    pub fn reset_tracking(&mut self, now: DateTime<Utc>) {
        let level = self.level();

        self.session_id = Uuid::new_v4().to_string();
        self.start_level = level;
        self.last_checked_time = now;
        self.last_checked_level = level;
        self.session.reset(now, level as f64);
        self.intervals.reset(now, level as f64);

        info!("battery tracking reset, session {}", self.session_id);
    }
}
