use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sentinel returned when the platform cannot read the battery level
/// (Android's `getIntProperty` failure value).
pub const LEVEL_UNAVAILABLE: i32 = i32::MIN;

/// One reading of the coarse battery state, immutable once taken.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatterySample {
    pub level_percent: i32,
    pub is_charging: bool,
    pub is_power_saving: bool,
    pub timestamp: DateTime<Utc>,
}

impl BatterySample {
    pub fn level_available(&self) -> bool {
        self.level_percent != LEVEL_UNAVAILABLE
    }
}

/// Platform capability for reading battery state. Each platform supplies
/// its own adapter (BatteryManager on Android, UIDevice on iOS); the
/// engine only ever sees this trait.
pub trait BatterySampler: Send {
    /// Battery level in percent (0..=100), or [`LEVEL_UNAVAILABLE`].
    fn read_level_percent(&self) -> i32;

    fn read_is_charging(&self) -> bool;

    fn read_is_power_saving(&self) -> bool;

    fn sample(&self, now: DateTime<Utc>) -> BatterySample {
        BatterySample {
            level_percent: self.read_level_percent(),
            is_charging: self.read_is_charging(),
            is_power_saving: self.read_is_power_saving(),
            timestamp: now,
        }
    }
}
