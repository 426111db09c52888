//! Plan domain entities.

pub mod model;

pub use model::Plan;
