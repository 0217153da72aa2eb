use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use log::{debug, info};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Duration;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::config::TrackerConfig;
use crate::engine::{
    BatteryEngine, BatterySessionReport, BatteryStatus, EnergyConsumptionReport,
    PowerConsumptionData, PowerEngine, PowerSessionReport,
};
use crate::interval::IntervalRecord;
use crate::sampler::{BatterySampler, PowerSample, PowerSampler};
use crate::session::{LifecycleEvent, VisibilityTracker};

use super::poller::poll_loop;

/// Owns both tracking engines behind one mutual-exclusion domain each
/// and drives them with a background polling task.
///
/// The host wires lifecycle signals in through either the per-activity
/// `activity_started`/`activity_stopped` pair (Android-style callbacks,
/// debounced by the visibility tracker) or the direct
/// `entered_foreground`/`entered_background` edges (iOS-style
/// notifications). Queries hand out immutable snapshots, never
/// references into live state.
pub struct PowerMonitor<B: BatterySampler + 'static, P: PowerSampler + 'static> {
    battery: Arc<Mutex<BatteryEngine<B>>>,
    power: Arc<Mutex<PowerEngine<P>>>,
    visibility: Arc<Mutex<VisibilityTracker>>,
    ticker: Arc<Mutex<Option<JoinHandle<()>>>>,
    cancel_token: Arc<Mutex<Option<CancellationToken>>>,
    poll_period: Duration,
    run_id: String,
}

impl<B: BatterySampler + 'static, P: PowerSampler + 'static> PowerMonitor<B, P> {
    pub fn new(battery_sampler: B, power_sampler: P, config: &TrackerConfig) -> Result<Self> {
        let now = Utc::now();
        let battery = BatteryEngine::new(battery_sampler, config, now)?;
        let power = PowerEngine::new(power_sampler, config, now)?;

        Ok(Self {
            battery: Arc::new(Mutex::new(battery)),
            power: Arc::new(Mutex::new(power)),
            visibility: Arc::new(Mutex::new(VisibilityTracker::new())),
            ticker: Arc::new(Mutex::new(None)),
            cancel_token: Arc::new(Mutex::new(None)),
            poll_period: Duration::from_millis(config.poll_period_ms),
            run_id: Uuid::new_v4().to_string(),
        })
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Spawns the polling task. Errors when monitoring is already
    /// active.
    pub async fn start_monitoring(&self) -> Result<()> {
        let mut ticker_guard = self.ticker.lock().await;
        if ticker_guard.is_some() {
            bail!("monitoring already active");
        }

        let cancel_token = CancellationToken::new();
        let handle = tokio::spawn(poll_loop(
            self.battery.clone(),
            self.power.clone(),
            self.poll_period,
            cancel_token.clone(),
        ));

        *ticker_guard = Some(handle);
        *self.cancel_token.lock().await = Some(cancel_token);

        info!("monitoring started, run {}", self.run_id);
        Ok(())
    }

    /// Cancels the polling task and waits for it to finish. A no-op when
    /// monitoring is not active.
    pub async fn stop_monitoring(&self) -> Result<()> {
        if let Some(token) = self.cancel_token.lock().await.take() {
            token.cancel();
        }

        if let Some(handle) = self.ticker.lock().await.take() {
            handle
                .await
                .context("poll loop task failed to join")?;
            info!("monitoring stopped, run {}", self.run_id);
        }
        Ok(())
    }

    /// Android-style activity callback. Only the 0->1 crossing of the
    /// started-activity count reaches the engines.
    pub async fn activity_started(&self) {
        let event = self.visibility.lock().await.activity_started();
        if let Some(event) = event {
            self.dispatch(event).await;
        }
    }

    /// Android-style activity callback, symmetric to `activity_started`.
    pub async fn activity_stopped(&self) {
        let event = self.visibility.lock().await.activity_stopped();
        if let Some(event) = event {
            self.dispatch(event).await;
        }
    }

    /// iOS-style edge notification.
    pub async fn entered_foreground(&self) {
        self.dispatch(LifecycleEvent::EnteredForeground).await;
    }

    /// iOS-style edge notification.
    pub async fn entered_background(&self) {
        self.dispatch(LifecycleEvent::EnteredBackground).await;
    }

    async fn dispatch(&self, event: LifecycleEvent) {
        debug!("lifecycle event {:?}", event);
        let now = Utc::now();
        self.battery.lock().await.on_lifecycle(event, now);
        self.power.lock().await.on_lifecycle(event, now);
    }

    pub async fn battery_status(&self) -> BatteryStatus {
        self.battery.lock().await.status(Utc::now())
    }

    pub async fn battery_session_report(&self) -> BatterySessionReport {
        self.battery.lock().await.session_report(Utc::now())
    }

    pub async fn battery_foreground_usage(&self) -> f64 {
        self.battery.lock().await.foreground_usage()
    }

    pub async fn battery_background_usage(&self) -> f64 {
        self.battery.lock().await.background_usage()
    }

    pub async fn battery_average_consumption(&self, intervals: Option<usize>) -> Option<f64> {
        self.battery.lock().await.average_consumption(intervals)
    }

    pub async fn battery_interval_history(&self, max: Option<usize>) -> Vec<IntervalRecord> {
        self.battery.lock().await.interval_history(max)
    }

    pub async fn power_measurement(&self) -> PowerSample {
        self.power.lock().await.current_measurement(Utc::now())
    }

    pub async fn energy_report(&self) -> EnergyConsumptionReport {
        self.power.lock().await.energy_report(Utc::now())
    }

    pub async fn power_consumption_data(&self) -> PowerConsumptionData {
        self.power.lock().await.consumption_data(Utc::now())
    }

    pub async fn power_session_report(&self) -> PowerSessionReport {
        self.power.lock().await.session_report(Utc::now())
    }

    pub async fn power_average_consumption(&self, intervals: Option<usize>) -> Option<f64> {
        self.power.lock().await.average_consumption(intervals)
    }

    pub async fn power_interval_history(&self, max: Option<usize>) -> Vec<IntervalRecord> {
        self.power.lock().await.interval_history(max)
    }

    /// Resets both engines to a fresh baseline at "now".
    pub async fn reset_tracking(&self) {
        let now = Utc::now();
        self.battery.lock().await.reset_tracking(now);
        self.power.lock().await.reset_tracking(now);
    }
}

impl<B: BatterySampler + 'static, P: PowerSampler + 'static> Clone for PowerMonitor<B, P> {
    fn clone(&self) -> Self {
        Self {
            battery: Arc::clone(&self.battery),
            power: Arc::clone(&self.power),
            visibility: Arc::clone(&self.visibility),
            ticker: Arc::clone(&self.ticker),
            cancel_token: Arc::clone(&self.cancel_token),
            poll_period: self.poll_period,
            run_id: self.run_id.clone(),
        }
    }
}
