//! Reminder domain entities.

pub mod candidate;
pub mod model;
pub mod status;

pub use candidate::ReminderCandidate;
pub use model::Reminder;
pub use status::ReminderStatus;
