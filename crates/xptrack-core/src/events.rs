use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Every goal-state change produces an Event.
/// The GUI polls for events; the projection controller subscribes to them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// The daily goal was set to a new value (preset or custom input).
    GoalChanged {
        value: u32,
        previous: u32,
        marker: i64,
        origin: String,
        at: DateTime<Utc>,
    },
    /// First access found no persisted goal; the default was written back
    /// so every view of the store agrees on the value.
    GoalDefaulted { value: u32, at: DateTime<Utc> },
}

/// Cross-view change notification, persisted next to the goal value.
///
/// `marker` is monotonic; its value is opaque to consumers, only the act
/// of it changing matters. `origin` identifies the writing view so a view
/// can ignore its own writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSignal {
    pub marker: i64,
    pub origin: String,
}
