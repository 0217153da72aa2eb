use anyhow::Result;
use chrono::{DateTime, Utc};
use log::info;
use uuid::Uuid;

use crate::config::TrackerConfig;
use crate::interval::{IntervalAggregator, IntervalRecord};
use crate::sampler::{PowerSample, PowerSampler};
use crate::session::{LifecycleEvent, MetricOrientation, SessionState};

use super::reports::{EnergyConsumptionReport, PowerConsumptionData, PowerSessionReport};

/// Tracks instantaneous power draw and integrates it into cumulative
/// energy for one app process.
///
/// Structurally the same machine as the battery engine, but the tracked
/// metric accumulates instead of depleting: each tick takes a
/// current/voltage reading, integrates energy with the trapezoidal rule,
/// and feeds the running total into the session and interval state. A
/// bounded buffer of the most recent raw samples backs the average
/// current/voltage/power reports.
pub struct PowerEngine<S: PowerSampler> {
    sampler: S,
    session_id: String,
    start_time: DateTime<Utc>,
    last_measurement_time: DateTime<Utc>,
    last_power_microwatts: i64,
    total_energy_uwh: f64,
    last_checked_time: DateTime<Utc>,
    last_checked_energy: f64,
    min_rate_window_ms: i64,
    measurements: Vec<PowerSample>,
    max_measurements: usize,
    session: SessionState,
    intervals: IntervalAggregator,
}

impl<S: PowerSampler> PowerEngine<S> {
    pub fn new(sampler: S, config: &TrackerConfig, now: DateTime<Utc>) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            sampler,
            session_id: Uuid::new_v4().to_string(),
            start_time: now,
            last_measurement_time: now,
            last_power_microwatts: 0,
            total_energy_uwh: 0.0,
            last_checked_time: now,
            last_checked_energy: 0.0,
            min_rate_window_ms: config.min_rate_window_ms,
            measurements: Vec::with_capacity(config.max_power_measurements),
            max_measurements: config.max_power_measurements,
            session: SessionState::new(MetricOrientation::Accumulating, now, 0.0),
            intervals: IntervalAggregator::new(
                MetricOrientation::Accumulating,
                config.measurement_interval_ms,
                config.max_interval_records,
                now,
                0.0,
            ),
        })
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn total_energy_microwatt_hours(&self) -> f64 {
        self.total_energy_uwh
    }

    /// Takes one measurement: samples current/voltage, integrates energy
    /// over the gap since the previous measurement (trapezoidal, with an
    /// absent reading counted as zero draw), and closes an interval
    /// window when one is due.
    pub fn on_tick(&mut self, now: DateTime<Utc>) {
        let sample = self.sampler.sample(now);
        let power = sample.instant_power_microwatts.unwrap_or(0);

        let delta_hours =
            ((now - self.last_measurement_time).num_milliseconds().max(0)) as f64 / 3_600_000.0;
        let average_power = (self.last_power_microwatts + power) as f64 / 2.0;
        self.total_energy_uwh += average_power * delta_hours;

        self.measurements.push(sample);
        if self.measurements.len() > self.max_measurements {
            self.measurements.remove(0);
        }

        self.intervals.record_if_due(now, self.total_energy_uwh);

        self.last_power_microwatts = power;
        self.last_measurement_time = now;
    }

    /// Edge-triggered visibility change, attributing the energy metric.
    pub fn on_lifecycle(&mut self, event: LifecycleEvent, now: DateTime<Utc>) {
        match event {
            LifecycleEvent::EnteredForeground => {
                self.session.enter_foreground(now, self.total_energy_uwh)
            }
            LifecycleEvent::EnteredBackground => {
                self.session.enter_background(now, self.total_energy_uwh)
            }
        }
    }

    /// Latest raw sample, taking one on demand when none has been
    /// recorded yet.
    pub fn current_measurement(&mut self, now: DateTime<Utc>) -> PowerSample {
        if self.measurements.is_empty() {
            self.on_tick(now);
        }
        self.measurements
            .last()
            .copied()
            .unwrap_or_else(|| PowerSample::empty(now))
    }

    pub fn measurements(&self) -> &[PowerSample] {
        &self.measurements
    }

    pub fn average_current_draw(&self) -> Option<i64> {
        self.average_of(|sample| sample.current_microamps)
    }

    pub fn average_voltage(&self) -> Option<i64> {
        self.average_of(|sample| sample.voltage_millivolts)
    }

    pub fn average_power(&self) -> Option<i64> {
        self.average_of(|sample| sample.instant_power_microwatts)
    }

    fn average_of<F>(&self, value: F) -> Option<i64>
    where
        F: Fn(&PowerSample) -> Option<i64>,
    {
        let values: Vec<i64> = self.measurements.iter().filter_map(value).collect();
        if values.is_empty() {
            return None;
        }
        Some((values.iter().sum::<i64>() as f64 / values.len() as f64) as i64)
    }

    pub fn energy_report(&self, now: DateTime<Utc>) -> EnergyConsumptionReport {
        EnergyConsumptionReport {
            duration_ms: (now - self.start_time).num_milliseconds(),
            average_current_microamps: self.average_current_draw(),
            average_voltage_mv: self.average_voltage(),
            average_power_microwatts: self.average_power(),
            total_energy_microwatt_hours: self.total_energy_uwh,
        }
    }

    pub fn consumption_data(&self, now: DateTime<Utc>) -> PowerConsumptionData {
        PowerConsumptionData {
            energy_used_microwatt_hours: self.total_energy_uwh,
            average_power_draw_microwatts: self.average_power(),
            duration_ms: (now - self.start_time).num_milliseconds(),
        }
    }

    /// Energy consumed per hour since the last call, in microwatt hours
    /// per hour.
    ///
    /// Advances its own baseline as a side effect, like the battery
    /// engine's rate query. Zero while charging or until a minute has
    /// elapsed since the previous check.
    pub fn consumption_rate(&mut self, now: DateTime<Utc>) -> f64 {
        if self.sampler.read_is_charging() {
            return 0.0;
        }

        let energy_used = (self.total_energy_uwh - self.last_checked_energy).max(0.0);
        let elapsed_ms = (now - self.last_checked_time).num_milliseconds();

        self.last_checked_energy = self.total_energy_uwh;
        self.last_checked_time = now;

        if elapsed_ms < self.min_rate_window_ms {
            return 0.0;
        }
        energy_used / (elapsed_ms as f64 / 3_600_000.0)
    }

    pub fn foreground_usage(&self) -> f64 {
        self.session.foreground_usage(self.total_energy_uwh)
    }

    pub fn background_usage(&self) -> f64 {
        self.session.background_usage(self.total_energy_uwh)
    }

    pub fn session_report(&self, now: DateTime<Utc>) -> PowerSessionReport {
        PowerSessionReport {
            session_id: self.session_id.clone(),
            total_duration_minutes: self.session.total_duration_minutes(now),
            foreground_duration_minutes: self.session.foreground_duration_minutes(now),
            background_duration_minutes: self.session.background_duration_minutes(now),
            energy_used_microwatt_hours: self.total_energy_uwh,
            foreground_energy_microwatt_hours: self.foreground_usage(),
            background_energy_microwatt_hours: self.background_usage(),
        }
    }

    /// Mean hourly energy rate over the last `intervals` closed windows.
    pub fn average_consumption(&self, intervals: Option<usize>) -> Option<f64> {
        self.intervals.average_rate(intervals)
    }

    pub fn interval_history(&self, max: Option<usize>) -> Vec<IntervalRecord> {
        self.intervals.last_records(max)
    }

    /// Restarts tracking from `now` under a fresh session id.
    pub fn reset_tracking(&mut self, now: DateTime<Utc>) {
        self.session_id = Uuid::new_v4().to_string();
        self.start_time = now;
        self.last_measurement_time = now;
        self.last_power_microwatts = 0;
        self.total_energy_uwh = 0.0;
        self.last_checked_time = now;
        self.last_checked_energy = 0.0;
        self.measurements.clear();
        self.session.reset(now, 0.0);
        self.intervals.reset(now, 0.0);

        info!("power tracking reset, session {}", self.session_id);
    }
}
