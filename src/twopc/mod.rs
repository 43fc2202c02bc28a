//! Two-Phase Commit: one coordinator driving two resource-manager participants through
//! prepare → commit/abort.

pub mod coordinator;
pub mod participant;
pub mod types;

pub use coordinator::Coordinator;
pub use participant::Participant;
