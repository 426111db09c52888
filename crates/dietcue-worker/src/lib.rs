//! Background processing for DietCue.
//!
//! This crate provides:
//! - A firing runner that polls for due reminders, claims them, and
//!   dispatches deliveries
//! - A cron scheduler that runs the periodic plan-expiry countdown sweep

pub mod cron;
pub mod runner;

pub use cron::CronScheduler;
pub use runner::FiringRunner;
