//! Node startup sequence.

pub mod weight_validation;

pub use weight_validation::{validate_weighted_consensus_startup, ParticipationSource};
