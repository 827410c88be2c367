//! Node configuration loading and validation.
//!
//! Aggregates the on-disk TOML config with CLI overrides into one
//! [`NodeConfig`], then runs a dedicated validation pass before the node is
//! allowed to start.

pub mod aggregation;
pub mod validation;

use std::path::PathBuf;

use anyhow::Result;

pub use aggregation::{ConsensusConfig, NodeConfig};

/// Deployment tier; only affects default strictness, not wire behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Testnet,
    Mainnet,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Testnet => write!(f, "testnet"),
            Environment::Mainnet => write!(f, "mainnet"),
        }
    }
}

/// Command line arguments structure.
#[derive(Debug, Clone)]
pub struct CliArgs {
    pub config: PathBuf,
    pub environment: Environment,
    pub log_level: String,
    pub data_dir: PathBuf,
    /// Only override `external_weight_oracle_port` if explicitly specified.
    pub external_weight_oracle_port: Option<u16>,
}

/// Configuration error.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("external weight oracle port is unset (0) for a {environment} node")]
    OraclePortUnset { environment: Environment },

    #[error("file system error: {0}")]
    FileSystem(#[from] std::io::Error),

    #[error("configuration parsing error: {0}")]
    Parsing(#[from] toml::de::Error),
}

/// Load and validate the complete node configuration.
pub async fn load_configuration(args: &CliArgs) -> Result<NodeConfig> {
    tracing::info!("loading configuration from {}", args.config.display());

    let mut node_config = aggregation::load_node_config(&args.config).await?;
    node_config.apply_cli_overrides(args);

    if !args.data_dir.exists() {
        std::fs::create_dir_all(&args.data_dir)?;
        tracing::info!(dir = %args.data_dir.display(), "created data directory");
    }

    validation::validate_complete_configuration(&node_config)?;

    tracing::info!(
        environment = %node_config.environment,
        oracle_port = node_config.consensus_config.external_weight_oracle_port,
        "configuration validated"
    );

    Ok(node_config)
}
