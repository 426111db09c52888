//! # dietcue-api
//!
//! Thin HTTP ingress: plan ingest, event notifications, device/token
//! registration, reminder listing, and health. The display layer is out
//! of scope; these routes exist so external systems can feed the
//! scheduling core.

pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::build_router;
pub use state::AppState;
