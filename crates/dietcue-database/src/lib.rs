//! # dietcue-database
//!
//! SQLite connection management and concrete repository implementations
//! for all DietCue entities. Mutations that participate in the
//! reconcile/fire race go through conditional updates so the loser of a
//! race observes a no-op instead of an error.

pub mod connection;
pub mod migration;
pub mod repositories;
