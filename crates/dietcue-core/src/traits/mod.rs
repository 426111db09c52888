//! Traits at the seams to external collaborators.

pub mod extractor;
pub mod transport;

pub use extractor::{ExtractedCandidate, PlanExtractor};
pub use transport::PushTransport;
