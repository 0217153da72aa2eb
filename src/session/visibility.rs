use serde::{Deserialize, Serialize};

/// Edge-triggered lifecycle events consumed by the engines.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum LifecycleEvent {
    EnteredForeground,
    EnteredBackground,
}

/// Collapses per-activity start/stop callbacks into edge events.
///
/// Android reports a start/stop pair for every activity, including
/// transient restarts inside the same foreground episode. Only the
/// 0<->1 crossings of the started-activity count are real visibility
/// changes; everything in between is noise.
#[derive(Debug, Default)]
pub struct VisibilityTracker {
    started_activities: u32,
}

impl VisibilityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn activity_started(&mut self) -> Option<LifecycleEvent> {
        self.started_activities += 1;
        if self.started_activities == 1 {
            Some(LifecycleEvent::EnteredForeground)
        } else {
            None
        }
    }

    pub fn activity_stopped(&mut self) -> Option<LifecycleEvent> {
        if self.started_activities == 0 {
            return None;
        }
        self.started_activities -= 1;
        if self.started_activities == 0 {
            Some(LifecycleEvent::EnteredBackground)
        } else {
            None
        }
    }

    pub fn started_activities(&self) -> u32 {
        self.started_activities
    }
}
