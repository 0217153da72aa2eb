use std::sync::{Arc, RwLock};

use super::{BatterySampler, PowerSampler};

#[derive(Debug)]
struct BatteryCell {
    level_percent: i32,
    is_charging: bool,
    is_power_saving: bool,
}

/// In-memory battery source for the demo binary and tests. Clones share
/// the same cell, so a test can drain the battery while the engine owns
/// the sampler.
#[derive(Debug, Clone)]
pub struct SimulatedBattery {
    cell: Arc<RwLock<BatteryCell>>,
}

impl SimulatedBattery {
    pub fn new(level_percent: i32) -> Self {
        Self {
            cell: Arc::new(RwLock::new(BatteryCell {
                level_percent,
                is_charging: false,
                is_power_saving: false,
            })),
        }
    }

    pub fn set_level(&self, level_percent: i32) {
        self.cell.write().unwrap().level_percent = level_percent;
    }

    /// Drops the level by `percent`, saturating at zero.
    pub fn drain(&self, percent: i32) {
        let mut cell = self.cell.write().unwrap();
        cell.level_percent = (cell.level_percent - percent).max(0);
    }

    pub fn set_charging(&self, charging: bool) {
        self.cell.write().unwrap().is_charging = charging;
    }

    pub fn set_power_saving(&self, power_saving: bool) {
        self.cell.write().unwrap().is_power_saving = power_saving;
    }
}

impl BatterySampler for SimulatedBattery {
    fn read_level_percent(&self) -> i32 {
        self.cell.read().unwrap().level_percent
    }

    fn read_is_charging(&self) -> bool {
        self.cell.read().unwrap().is_charging
    }

    fn read_is_power_saving(&self) -> bool {
        self.cell.read().unwrap().is_power_saving
    }
}

#[derive(Debug)]
struct PowerCell {
    current_microamps: Option<i64>,
    voltage_millivolts: Option<i64>,
    is_charging: bool,
}

/// In-memory current/voltage source. `None` readings model platforms
/// that cannot measure (the iOS adapter reports nothing).
#[derive(Debug, Clone)]
pub struct SimulatedPower {
    cell: Arc<RwLock<PowerCell>>,
}

impl SimulatedPower {
    pub fn new(current_microamps: Option<i64>, voltage_millivolts: Option<i64>) -> Self {
        Self {
            cell: Arc::new(RwLock::new(PowerCell {
                current_microamps,
                voltage_millivolts,
                is_charging: false,
            })),
        }
    }

    pub fn unavailable() -> Self {
        Self::new(None, None)
    }

    pub fn set_current(&self, current_microamps: Option<i64>) {
        self.cell.write().unwrap().current_microamps = current_microamps;
    }

    pub fn set_voltage(&self, voltage_millivolts: Option<i64>) {
        self.cell.write().unwrap().voltage_millivolts = voltage_millivolts;
    }

    pub fn set_charging(&self, charging: bool) {
        self.cell.write().unwrap().is_charging = charging;
    }
}

impl PowerSampler for SimulatedPower {
    fn read_current_microamps(&self) -> Option<i64> {
        self.cell.read().unwrap().current_microamps
    }

    fn read_voltage_millivolts(&self) -> Option<i64> {
        self.cell.read().unwrap().voltage_millivolts
    }

    fn read_is_charging(&self) -> bool {
        self.cell.read().unwrap().is_charging
    }
}
