use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const MS_PER_MINUTE: i64 = 60 * 1000;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Visibility {
    Foreground,
    Background,
}

/// Direction in which the tracked metric moves while the app consumes.
///
/// Battery level depletes (consumption is a drop); cumulative energy
/// accumulates (consumption is a rise). Both clamp at zero so a charging
/// episode never produces negative consumption.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricOrientation {
    Depleting,
    Accumulating,
}

impl MetricOrientation {
    pub fn consumed(self, from: f64, to: f64) -> f64 {
        match self {
            MetricOrientation::Depleting => (from - to).max(0.0),
            MetricOrientation::Accumulating => (to - from).max(0.0),
        }
    }
}

/// Tracks foreground/background sessions and the consumption attributed
/// to each. Exactly one category is open at any time; closed durations
/// plus the open session's elapsed time always cover the whole span
/// since `app_start_time`.
#[derive(Debug, Clone)]
pub struct SessionState {
    orientation: MetricOrientation,
    app_start_time: DateTime<Utc>,
    visibility: Visibility,
    last_state_change_time: DateTime<Utc>,
    last_state_change_metric: f64,
    foreground_duration_ms: i64,
    background_duration_ms: i64,
    foreground_usage: f64,
    background_usage: f64,
}

impl SessionState {
    /// Apps start foreground: construction happens while the process is
    /// coming up on screen.
    pub fn new(orientation: MetricOrientation, now: DateTime<Utc>, metric: f64) -> Self {
        Self {
            orientation,
            app_start_time: now,
            visibility: Visibility::Foreground,
            last_state_change_time: now,
            last_state_change_metric: metric,
            foreground_duration_ms: 0,
            background_duration_ms: 0,
            foreground_usage: 0.0,
            background_usage: 0.0,
        }
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn is_foreground(&self) -> bool {
        self.visibility == Visibility::Foreground
    }

    /// Closes the open background session and opens a foreground one.
    /// No-op when already foreground, so duplicate lifecycle events never
    /// double-count.
    pub fn enter_foreground(&mut self, now: DateTime<Utc>, metric: f64) {
        if self.visibility == Visibility::Foreground {
            return;
        }

        self.background_duration_ms += (now - self.last_state_change_time).num_milliseconds();
        self.background_usage += self
            .orientation
            .consumed(self.last_state_change_metric, metric);

        self.visibility = Visibility::Foreground;
        self.last_state_change_time = now;
        self.last_state_change_metric = metric;
    }

    /// Closes the open foreground session and opens a background one.
    /// No-op when already background.
    pub fn enter_background(&mut self, now: DateTime<Utc>, metric: f64) {
        if self.visibility == Visibility::Background {
            return;
        }

        self.foreground_duration_ms += (now - self.last_state_change_time).num_milliseconds();
        self.foreground_usage += self
            .orientation
            .consumed(self.last_state_change_metric, metric);

        self.visibility = Visibility::Background;
        self.last_state_change_time = now;
        self.last_state_change_metric = metric;
    }

    /// Accumulated foreground consumption, including the still-open
    /// session's partial usage when currently foreground.
    pub fn foreground_usage(&self, current_metric: f64) -> f64 {
        let mut usage = self.foreground_usage;
        if self.visibility == Visibility::Foreground {
            usage += self
                .orientation
                .consumed(self.last_state_change_metric, current_metric);
        }
        usage
    }

    pub fn background_usage(&self, current_metric: f64) -> f64 {
        let mut usage = self.background_usage;
        if self.visibility == Visibility::Background {
            usage += self
                .orientation
                .consumed(self.last_state_change_metric, current_metric);
        }
        usage
    }

    pub fn foreground_duration_minutes(&self, now: DateTime<Utc>) -> i64 {
        let mut total_ms = self.foreground_duration_ms;
        if self.visibility == Visibility::Foreground {
            total_ms += (now - self.last_state_change_time).num_milliseconds();
        }
        total_ms / MS_PER_MINUTE
    }

    pub fn background_duration_minutes(&self, now: DateTime<Utc>) -> i64 {
        let mut total_ms = self.background_duration_ms;
        if self.visibility == Visibility::Background {
            total_ms += (now - self.last_state_change_time).num_milliseconds();
        }
        total_ms / MS_PER_MINUTE
    }

    pub fn total_duration_minutes(&self, now: DateTime<Utc>) -> i64 {
        (now - self.app_start_time).num_milliseconds() / MS_PER_MINUTE
    }

    pub fn app_start_time(&self) -> DateTime<Utc> {
        self.app_start_time
    }

    /// Zeroes every counter and re-opens a foreground session at `now`.
    pub fn reset(&mut self, now: DateTime<Utc>, metric: f64) {
        *self = Self::new(self.orientation, now, metric);
    }
}
