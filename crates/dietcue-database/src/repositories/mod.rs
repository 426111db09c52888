//! Concrete repository implementations.

pub mod countdown;
pub mod device;
pub mod plan;
pub mod reminder;

pub use countdown::CountdownRepository;
pub use device::DeviceRepository;
pub use plan::PlanRepository;
pub use reminder::ReminderRepository;
