//! Recipient roles, devices, and push tokens.

pub mod device;
pub mod role;
pub mod token;

pub use device::Device;
pub use role::RecipientRole;
pub use token::PushToken;
