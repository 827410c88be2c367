//! Configuration validation pass.

use tracing::{info, warn};

use super::{ConfigError, Environment, NodeConfig};

/// Validate the complete configuration. Mainnet nodes with an unset oracle
/// port fail outright — this is load-time, not the startup validator's
/// network check in §4.7, but catching it here gives an earlier, cheaper
/// diagnostic for the common misconfiguration.
pub fn validate_complete_configuration(config: &NodeConfig) -> Result<(), ConfigError> {
    info!("validating node configuration");

    if config.consensus_config.external_weight_oracle_port == 0 {
        if config.environment == Environment::Mainnet {
            return Err(ConfigError::OraclePortUnset {
                environment: config.environment,
            });
        }
        warn!("external_weight_oracle_port is unset; startup will fail once the weighted consensus core is reached");
    }

    info!("configuration validated");
    Ok(())
}
