use serde::{Deserialize, Serialize};

/// Point-in-time battery status for the UI layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatteryStatus {
    pub level: i32,
    pub is_charging: bool,
    pub is_power_saving_enabled: bool,
    /// Hourly consumption rate since the last status/rate check.
    pub app_consumption_rate: f64,
}

/// Battery usage over the tracking session so far.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatterySessionReport {
    pub session_id: String,
    pub start_battery_level: i32,
    pub end_battery_level: i32,
    pub total_duration_minutes: i64,
    /// Percent consumed since tracking started, clamped at zero.
    pub app_consumption_percentage: f64,
    pub foreground_duration_minutes: i64,
    pub background_duration_minutes: i64,
}

/// Energy usage over the tracking session so far, derived from the raw
/// measurement buffer plus the integrated total.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnergyConsumptionReport {
    pub duration_ms: i64,
    pub average_current_microamps: Option<i64>,
    pub average_voltage_mv: Option<i64>,
    pub average_power_microwatts: Option<i64>,
    pub total_energy_microwatt_hours: f64,
}

/// Compact energy-consumption summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PowerConsumptionData {
    pub energy_used_microwatt_hours: f64,
    pub average_power_draw_microwatts: Option<i64>,
    pub duration_ms: i64,
}

impl PowerConsumptionData {
    /// Average draw expressed in watts, or `None` before any time has
    /// elapsed.
    pub fn consumption_rate_watts_per_hour(&self) -> Option<f64> {
        if self.duration_ms <= 0 {
            return None;
        }
        let hours = self.duration_ms as f64 / 3_600_000.0;
        Some(self.energy_used_microwatt_hours / (hours * 1_000_000.0))
    }
}

/// Foreground/background split of the power session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PowerSessionReport {
    pub session_id: String,
    pub total_duration_minutes: i64,
    pub foreground_duration_minutes: i64,
    pub background_duration_minutes: i64,
    pub energy_used_microwatt_hours: f64,
    pub foreground_energy_microwatt_hours: f64,
    pub background_energy_microwatt_hours: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consumption_rate_scales_to_watts() {
        let data = PowerConsumptionData {
            energy_used_microwatt_hours: 2_000_000.0,
            average_power_draw_microwatts: Some(2_000_000),
            duration_ms: 3_600_000,
        };
        // 2 Wh over one hour = 2 W
        assert_eq!(data.consumption_rate_watts_per_hour(), Some(2.0));
    }

    #[test]
    fn consumption_rate_is_none_for_empty_span() {
        let data = PowerConsumptionData {
            energy_used_microwatt_hours: 0.0,
            average_power_draw_microwatts: None,
            duration_ms: 0,
        };
        assert_eq!(data.consumption_rate_watts_per_hour(), None);
    }
}
