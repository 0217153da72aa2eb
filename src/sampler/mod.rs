pub mod battery;
pub mod power;
pub mod simulated;

pub use battery::{BatterySample, BatterySampler, LEVEL_UNAVAILABLE};
pub use power::{PowerSample, PowerSampler};
pub use simulated::{SimulatedBattery, SimulatedPower};
