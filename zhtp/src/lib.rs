//! ZHTP Network Node — weighted consensus orchestrator
//!
//! The node-level glue around the weighted consensus core: configuration
//! loading and the startup sequence that must pass before any consensus
//! service is allowed to run (spec §4.7).

pub mod config;
pub mod startup;

pub use config::{load_configuration, CliArgs, ConfigError, Environment, NodeConfig};
pub use startup::{validate_weighted_consensus_startup, ParticipationSource};
