use std::sync::Arc;

use chrono::Utc;
use log::info;
use tokio::sync::Mutex;
use tokio::time::{Duration, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::engine::{BatteryEngine, PowerEngine};
use crate::sampler::{BatterySampler, PowerSampler};

/// Drives both engines on a fixed cadence until cancelled. The engines
/// themselves never schedule anything; this loop is the one place that
/// owns a clock.
pub(crate) async fn poll_loop<B, P>(
    battery: Arc<Mutex<BatteryEngine<B>>>,
    power: Arc<Mutex<PowerEngine<P>>>,
    period: Duration,
    cancel_token: CancellationToken,
) where
    B: BatterySampler + 'static,
    P: PowerSampler + 'static,
{
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let now = Utc::now();
                battery.lock().await.on_tick(now);
                power.lock().await.on_tick(now);
            }
            _ = cancel_token.cancelled() => {
                info!("poll loop shutting down");
                break;
            }
        }
    }
}
