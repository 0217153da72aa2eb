use anyhow::Result;
use log::info;
use tokio::time::{sleep, Duration};

use powertrack::config::TrackerConfig;
use powertrack::monitor::PowerMonitor;
use powertrack::sampler::{SimulatedBattery, SimulatedPower};

/// Drives the tracking engines against simulated hardware for two
/// minutes and prints the reports. Pass a JSON config path to override
/// the demo thresholds.
#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => TrackerConfig::load_or_default(path)?,
        // Short windows so the demo closes a few intervals
        None => TrackerConfig {
            measurement_interval_ms: 15_000,
            min_rate_window_ms: 15_000,
            ..Default::default()
        },
    };

    let battery = SimulatedBattery::new(87);
    let power = SimulatedPower::new(Some(180_000), Some(3_900));

    let monitor = PowerMonitor::new(battery.clone(), power.clone(), &config)?;
    monitor.start_monitoring().await?;
    info!("simulated device online, run {}", monitor.run_id());

    for elapsed in (5..=120).step_by(5) {
        sleep(Duration::from_secs(5)).await;
        battery.drain(1);

        match elapsed {
            30 => {
                monitor.entered_background().await;
                power.set_current(Some(40_000));
            }
            60 => {
                monitor.entered_foreground().await;
                power.set_current(Some(200_000));
            }
            90 => battery.set_charging(true),
            _ => {}
        }

        if elapsed % 15 == 0 {
            let status = monitor.battery_status().await;
            info!(
                "battery {}% charging={} rate={:.1}%/h",
                status.level, status.is_charging, status.app_consumption_rate
            );
        }
    }

    monitor.stop_monitoring().await?;

    let report = monitor.battery_session_report().await;
    info!(
        "session {}: consumed {:.0}% over {} min (fg {} min, bg {} min)",
        report.session_id,
        report.app_consumption_percentage,
        report.total_duration_minutes,
        report.foreground_duration_minutes,
        report.background_duration_minutes
    );

    let energy = monitor.energy_report().await;
    info!(
        "energy: {:.0} uWh total, avg power {:?} uW",
        energy.total_energy_microwatt_hours, energy.average_power_microwatts
    );

    if let Some(rate) = monitor.battery_average_consumption(None).await {
        info!("average interval consumption {:.1}%/h", rate);
    }
    for record in monitor.battery_interval_history(Some(5)).await {
        info!(
            "interval {} -> {}: {:.1}%/h",
            record.interval_start.format("%H:%M:%S"),
            record.interval_end.format("%H:%M:%S"),
            record.rate_per_hour
        );
    }

    Ok(())
}
