//! # dietcue-entity
//!
//! Domain entities for DietCue: reminders and their candidates, recipient
//! roles and push tokens, plans, and countdown state.

pub mod countdown;
pub mod event;
pub mod plan;
pub mod recipient;
pub mod reminder;
