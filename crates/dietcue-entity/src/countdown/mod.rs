//! Plan-expiry countdown entities.

pub mod model;
pub mod window;

pub use model::CountdownState;
pub use window::CountdownWindow;
