use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One instantaneous power reading. Fields are absent when the platform
/// cannot measure them (iOS exposes neither current nor voltage).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PowerSample {
    pub current_microamps: Option<i64>,
    pub voltage_millivolts: Option<i64>,
    pub instant_power_microwatts: Option<i64>,
    pub timestamp: DateTime<Utc>,
}

impl PowerSample {
    pub fn new(
        current_microamps: Option<i64>,
        voltage_millivolts: Option<i64>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let instant_power_microwatts = match (current_microamps, voltage_millivolts) {
            (Some(current), Some(voltage)) => Some(current * voltage / 1000),
            _ => None,
        };

        Self {
            current_microamps,
            voltage_millivolts,
            instant_power_microwatts,
            timestamp,
        }
    }

    pub fn empty(timestamp: DateTime<Utc>) -> Self {
        Self::new(None, None, timestamp)
    }
}

/// Platform capability for reading instantaneous current and voltage.
pub trait PowerSampler: Send {
    fn read_current_microamps(&self) -> Option<i64>;

    fn read_voltage_millivolts(&self) -> Option<i64>;

    /// Charging gate for the consumption-rate query. Platforms that
    /// cannot tell report `false`.
    fn read_is_charging(&self) -> bool {
        false
    }

    fn sample(&self, now: DateTime<Utc>) -> PowerSample {
        PowerSample::new(
            self.read_current_microamps(),
            self.read_voltage_millivolts(),
            now,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instant_power_requires_both_readings() {
        let now = Utc::now();

        let full = PowerSample::new(Some(200_000), Some(4_000), now);
        assert_eq!(full.instant_power_microwatts, Some(800_000));

        let no_voltage = PowerSample::new(Some(200_000), None, now);
        assert_eq!(no_voltage.instant_power_microwatts, None);

        let empty = PowerSample::empty(now);
        assert_eq!(empty.current_microamps, None);
        assert_eq!(empty.instant_power_microwatts, None);
    }
}
