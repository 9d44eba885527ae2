//! Execution gateway adapters.

mod recorded;

pub use recorded::RecordedGateway;
