//! # dietcue-service
//!
//! The scheduling and delivery core: recurrence computation, reminder
//! reconciliation and fire-claims, recipient resolution and delivery,
//! plan-expiry countdown, and plan ingest. Also hosts the HTTP-backed
//! implementations of the extraction and push-transport seams.

pub mod countdown;
pub mod extraction;
pub mod plan;
pub mod recurrence;
pub mod router;
pub mod scheduler;
pub mod transport;

pub use countdown::CountdownMonitor;
pub use plan::PlanService;
pub use router::DeliveryRouter;
pub use scheduler::{ReconcileReport, ReminderScheduler};
