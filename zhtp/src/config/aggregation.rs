//! The node's complete, on-disk configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{CliArgs, Environment};

/// Complete node configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeConfig {
    pub node_id: [u8; 32],
    /// The chain's genesis hash, checked against the weight daemon's
    /// `/identity` response at startup (spec §4.7 step 3).
    pub genesis_hash: [u8; 32],
    pub environment: Environment,
    pub data_directory: String,
    pub consensus_config: ConsensusConfig,
}

/// Consensus-facing configuration. `external_weight_oracle_port` is the one
/// field this workspace's weighted-consensus core adds to the node's
/// configuration surface (spec §4.3, C8).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsensusConfig {
    /// 0 means "unset"; the startup validator refuses to proceed with an
    /// unset port (spec §4.7 step 1).
    #[serde(default)]
    pub external_weight_oracle_port: u16,
}

impl Default for ConsensusConfig {
    fn default() -> Self {
        Self {
            external_weight_oracle_port: 0,
        }
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            node_id: [0u8; 32],
            genesis_hash: [0u8; 32],
            environment: Environment::Development,
            data_directory: "./data".to_string(),
            consensus_config: ConsensusConfig::default(),
        }
    }
}

impl NodeConfig {
    /// Apply CLI argument overrides. Only touches fields the caller
    /// explicitly specified, never silently resetting the rest.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        self.environment = args.environment;
        self.data_directory = args.data_dir.to_string_lossy().to_string();

        if let Some(port) = args.external_weight_oracle_port {
            self.consensus_config.external_weight_oracle_port = port;
            tracing::info!(port, "CLI override: external_weight_oracle_port");
        }
    }
}

/// Load [`NodeConfig`] from a TOML file, falling back to defaults when the
/// file doesn't exist yet.
pub async fn load_node_config(config_path: &Path) -> Result<NodeConfig, super::ConfigError> {
    if !config_path.exists() {
        tracing::info!("using default configuration (no config file found)");
        return Ok(NodeConfig::default());
    }

    let content = tokio::fs::read_to_string(config_path).await?;
    let config: NodeConfig = toml::from_str(&content)?;
    tracing::info!(path = %config_path.display(), "loaded configuration file");
    Ok(config)
}
