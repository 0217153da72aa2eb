pub mod battery;
pub mod power;
pub mod reports;

pub use battery::BatteryEngine;
pub use power::PowerEngine;
pub use reports::{
    BatterySessionReport, BatteryStatus, EnergyConsumptionReport, PowerConsumptionData,
    PowerSessionReport,
};
