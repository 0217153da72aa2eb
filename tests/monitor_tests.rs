use tokio::time::{sleep, Duration};

use powertrack::config::TrackerConfig;
use powertrack::monitor::PowerMonitor;
use powertrack::sampler::{SimulatedBattery, SimulatedPower};

fn fast_config() -> TrackerConfig {
    TrackerConfig {
        measurement_interval_ms: 50,
        min_rate_window_ms: 1,
        poll_period_ms: 10,
        ..Default::default()
    }
}

fn monitor() -> (
    PowerMonitor<SimulatedBattery, SimulatedPower>,
    SimulatedBattery,
) {
    let battery = SimulatedBattery::new(100);
    let power = SimulatedPower::new(Some(150_000), Some(4_000));
    let monitor = PowerMonitor::new(battery.clone(), power, &fast_config()).unwrap();
    (monitor, battery)
}

#[tokio::test]
async fn poll_loop_closes_interval_windows() {
    let (monitor, battery) = monitor();
    monitor.start_monitoring().await.unwrap();

    sleep(Duration::from_millis(120)).await;
    battery.set_level(97);
    sleep(Duration::from_millis(120)).await;

    monitor.stop_monitoring().await.unwrap();

    assert!(!monitor.battery_interval_history(None).await.is_empty());
    assert!(!monitor.power_interval_history(None).await.is_empty());

    let status = monitor.battery_status().await;
    assert_eq!(status.level, 97);

    let measurement = monitor.power_measurement().await;
    assert_eq!(measurement.instant_power_microwatts, Some(600_000));
}

#[tokio::test]
async fn double_start_is_an_error() {
    let (monitor, _battery) = monitor();

    monitor.start_monitoring().await.unwrap();
    assert!(monitor.start_monitoring().await.is_err());

    monitor.stop_monitoring().await.unwrap();

    // Stopping twice is harmless, and a fresh start works again.
    monitor.stop_monitoring().await.unwrap();
    monitor.start_monitoring().await.unwrap();
    monitor.stop_monitoring().await.unwrap();
}

#[tokio::test]
async fn activity_callbacks_attribute_usage() {
    let (monitor, battery) = monitor();

    // App comes up with one activity; engines already start foreground.
    monitor.activity_started().await;

    battery.drain(3);
    monitor.activity_stopped().await;

    battery.drain(2);

    assert_eq!(monitor.battery_foreground_usage().await, 3.0);
    assert_eq!(monitor.battery_background_usage().await, 2.0);
}

#[tokio::test]
async fn transient_activity_restart_keeps_the_session_open() {
    let (monitor, battery) = monitor();

    monitor.activity_started().await;
    battery.drain(1);

    // Rotation: new activity starts before the old one stops.
    monitor.activity_started().await;
    monitor.activity_stopped().await;
    battery.drain(1);

    // Still one foreground session covering both drops.
    assert_eq!(monitor.battery_foreground_usage().await, 2.0);
    assert_eq!(monitor.battery_background_usage().await, 0.0);
}

#[tokio::test]
async fn reset_applies_to_both_engines() {
    let (monitor, battery) = monitor();
    monitor.start_monitoring().await.unwrap();

    sleep(Duration::from_millis(120)).await;
    battery.drain(5);
    monitor.stop_monitoring().await.unwrap();

    monitor.reset_tracking().await;

    let battery_report = monitor.battery_session_report().await;
    assert_eq!(battery_report.app_consumption_percentage, 0.0);
    assert_eq!(battery_report.total_duration_minutes, 0);

    let power_report = monitor.power_session_report().await;
    assert_eq!(power_report.energy_used_microwatt_hours, 0.0);
    assert!(monitor.battery_interval_history(None).await.is_empty());
}
