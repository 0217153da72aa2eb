pub mod state;
pub mod visibility;

pub use state::{MetricOrientation, SessionState, Visibility};
pub use visibility::{LifecycleEvent, VisibilityTracker};
