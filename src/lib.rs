//! Battery and power consumption tracking for mobile apps.
//!
//! Two structurally identical engines sample an injected platform
//! capability, attribute consumption to foreground/background sessions,
//! and keep a bounded rolling window of per-interval consumption rates.
//! The engines are scheduling-agnostic; the `monitor` module supplies an
//! optional tokio-based driver.

pub mod config;
pub mod engine;
pub mod interval;
pub mod monitor;
pub mod sampler;
pub mod session;

pub use config::TrackerConfig;
pub use engine::{BatteryEngine, PowerEngine};
pub use interval::IntervalRecord;
pub use monitor::PowerMonitor;
pub use sampler::{BatterySample, BatterySampler, PowerSample, PowerSampler};
pub use session::{LifecycleEvent, VisibilityTracker};
