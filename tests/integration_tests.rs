use chrono::{DateTime, Utc};

use powertrack::config::TrackerConfig;
use powertrack::engine::{BatteryEngine, PowerEngine};
use powertrack::sampler::{SimulatedBattery, SimulatedPower};
use powertrack::session::LifecycleEvent;

fn t(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000 + secs, 0).unwrap()
}

fn battery_engine(level: i32) -> (BatteryEngine<SimulatedBattery>, SimulatedBattery) {
    let battery = SimulatedBattery::new(level);
    let engine = BatteryEngine::new(battery.clone(), &TrackerConfig::default(), t(0)).unwrap();
    (engine, battery)
}

#[test]
fn usage_is_conserved_across_visibility_changes() {
    let (mut engine, battery) = battery_engine(100);

    // 1% drop every 30 s, visibility flip every 3 minutes, over 10 minutes
    let mut level = 100;
    for secs in 1..=600 {
        if secs % 30 == 0 {
            level -= 1;
            battery.set_level(level);
        }
        if secs % 180 == 0 {
            let event = if (secs / 180) % 2 == 1 {
                LifecycleEvent::EnteredBackground
            } else {
                LifecycleEvent::EnteredForeground
            };
            engine.on_lifecycle(event, t(secs));
        }
        engine.on_tick(t(secs));
    }

    // Exactly one category is open at any time, so nothing is lost or
    // double-counted.
    let total_drop = (100 - level) as f64;
    assert_eq!(engine.foreground_usage() + engine.background_usage(), total_drop);
    assert_eq!(engine.usage_since_start(), total_drop);
}

#[test]
fn durations_partition_total_time() {
    let (mut engine, _battery) = battery_engine(100);

    engine.on_lifecycle(LifecycleEvent::EnteredBackground, t(100));
    engine.on_lifecycle(LifecycleEvent::EnteredForeground, t(400));
    engine.on_lifecycle(LifecycleEvent::EnteredBackground, t(650));

    let now = t(900);
    let fg = engine.foreground_duration_minutes(now);
    let bg = engine.background_duration_minutes(now);
    let total = engine.total_duration_minutes(now);
    assert!((fg + bg - total).abs() <= 1);
}

#[test]
fn staircase_drop_produces_expected_interval_records() {
    // Level 100 at start, 95 from t=70s, 90 from t=130s, ticking once
    // per second with 60 s windows.
    let (mut engine, battery) = battery_engine(100);

    for secs in 1..=190 {
        match secs {
            70 => battery.set_level(95),
            130 => battery.set_level(90),
            _ => {}
        }
        engine.on_tick(t(secs));
    }

    let history = engine.interval_history(None);
    assert_eq!(history.len(), 3);

    // No drop landed inside the first window
    assert_eq!(history[0].rate_per_hour, 0.0);

    // 5% over each following one-minute window = 300%/h
    assert_eq!(history[1].start_metric, 100.0);
    assert_eq!(history[1].end_metric, 95.0);
    assert!((history[1].rate_per_hour - 300.0).abs() < 1e-9);
    assert_eq!(history[2].end_metric, 90.0);
    assert!((history[2].rate_per_hour - 300.0).abs() < 1e-9);
}

#[test]
fn sixty_one_windows_evict_the_oldest_record() {
    let (mut engine, _battery) = battery_engine(100);

    for secs in 1..=(61 * 60) {
        engine.on_tick(t(secs));
    }

    let history = engine.interval_history(None);
    assert_eq!(history.len(), 60);
    // Window #1 ([t0, t60]) is gone, window #61 is present.
    assert_eq!(history[0].interval_start, t(60));
    assert_eq!(history[59].interval_end, t(61 * 60));
}

#[test]
fn charging_session_never_reports_negative_consumption() {
    let (mut engine, battery) = battery_engine(50);

    battery.set_charging(true);
    battery.set_level(60);
    for secs in 1..=300 {
        engine.on_tick(t(secs));
    }

    assert_eq!(engine.status(t(300)).app_consumption_rate, 0.0);
    assert_eq!(engine.usage_since_start(), 0.0);
    assert_eq!(engine.foreground_usage(), 0.0);
    let report = engine.session_report(t(300));
    assert_eq!(report.app_consumption_percentage, 0.0);
}

#[test]
fn average_consumption_clamps_interval_counts() {
    let (mut engine, battery) = battery_engine(100);

    for secs in 1..=180 {
        if secs % 60 == 0 {
            battery.drain(1);
        }
        engine.on_tick(t(secs));
    }

    let all = engine.average_consumption(None);
    assert!(all.is_some());
    assert_eq!(engine.average_consumption(Some(0)), all);
    assert_eq!(engine.average_consumption(Some(1_000)), all);
}

#[test]
fn reset_restores_baseline_everywhere() {
    let (mut engine, battery) = battery_engine(100);

    battery.set_level(92);
    for secs in 1..=240 {
        engine.on_tick(t(secs));
    }
    engine.on_lifecycle(LifecycleEvent::EnteredBackground, t(240));

    engine.reset_tracking(t(240));

    let report = engine.session_report(t(240));
    assert_eq!(report.app_consumption_percentage, 0.0);
    assert_eq!(report.total_duration_minutes, 0);
    assert_eq!(report.foreground_duration_minutes, 0);
    assert_eq!(report.background_duration_minutes, 0);
    assert!(engine.interval_history(None).is_empty());
    assert_eq!(engine.average_consumption(None), None);
}

#[test]
fn power_engine_attributes_energy_and_reports_rates() {
    // 200 mA at 4 V = 800_000 uW of steady draw
    let sampler = SimulatedPower::new(Some(200_000), Some(4_000));
    let mut engine = PowerEngine::new(sampler, &TrackerConfig::default(), t(0)).unwrap();

    for secs in 1..=1800 {
        engine.on_tick(t(secs));
    }
    engine.on_lifecycle(LifecycleEvent::EnteredBackground, t(1800));
    for secs in 1801..=3600 {
        engine.on_tick(t(secs));
    }

    // Half an hour at 800_000 uW on each side of the transition
    let report = engine.session_report(t(3600));
    assert!((report.energy_used_microwatt_hours - 800_000.0).abs() < 1_000.0);
    assert!((report.foreground_energy_microwatt_hours - 400_000.0).abs() < 1_000.0);
    assert!((report.background_energy_microwatt_hours - 400_000.0).abs() < 1_000.0);
    assert_eq!(report.foreground_duration_minutes, 30);
    assert_eq!(report.background_duration_minutes, 30);

    let data = engine.consumption_data(t(3600));
    let watts = data.consumption_rate_watts_per_hour().unwrap();
    assert!((watts - 0.8).abs() < 0.01);

    // Interval rates hover around the steady draw
    let average = engine.average_consumption(Some(10)).unwrap();
    assert!((average - 800_000.0).abs() < 10_000.0);
}

#[test]
fn invalid_config_is_rejected_at_construction() {
    let config = TrackerConfig {
        measurement_interval_ms: 0,
        ..Default::default()
    };
    let battery = SimulatedBattery::new(100);
    assert!(BatteryEngine::new(battery, &config, t(0)).is_err());

    let power = SimulatedPower::unavailable();
    let config = TrackerConfig {
        max_power_measurements: 0,
        ..Default::default()
    };
    assert!(PowerEngine::new(power, &config, t(0)).is_err());
}
