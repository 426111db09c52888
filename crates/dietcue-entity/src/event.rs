//! Event kind enumeration for one-off event notifications.

use serde::{Deserialize, Serialize};

/// Kind of a one-off (non-recurring) event notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A new plan was issued to the owner.
    PlanIssued,
    /// A message was sent to the owner.
    Message,
    /// An appointment was created or changed.
    Appointment,
}

impl EventKind {
    /// Return the kind as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PlanIssued => "plan_issued",
            Self::Message => "message",
            Self::Appointment => "appointment",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
