//! ZHTP Network Node — weighted consensus orchestrator
//!
//! Loads configuration, runs the startup validator against the configured
//! weight daemon, and exits. The agreement loop itself, the mesh/network
//! layer, and the participation registry's storage are owned elsewhere in
//! the full node and are out of this workspace's scope.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use lib_weight_oracle::GenesisHash;
use zhtp::config::{CliArgs, Environment};
use zhtp::startup::ParticipationSource;
use zhtp::{load_configuration, validate_weighted_consensus_startup};

#[derive(Debug, Parser)]
#[command(name = "zhtp", about = "ZHTP weighted consensus node")]
struct Args {
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    #[arg(long, value_enum, default_value = "development")]
    environment: EnvironmentArg,

    #[arg(long, default_value = "info")]
    log_level: String,

    #[arg(long, default_value = "./data")]
    data_dir: PathBuf,

    #[arg(long)]
    external_weight_oracle_port: Option<u16>,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum EnvironmentArg {
    Development,
    Testnet,
    Mainnet,
}

impl From<EnvironmentArg> for Environment {
    fn from(value: EnvironmentArg) -> Self {
        match value {
            EnvironmentArg::Development => Environment::Development,
            EnvironmentArg::Testnet => Environment::Testnet,
            EnvironmentArg::Mainnet => Environment::Mainnet,
        }
    }
}

/// A node with no storage layer wired up yet has no participation records;
/// every eligible-key check in §4.7 step 5 correctly no-ops against it.
struct NoParticipants;

#[async_trait::async_trait]
impl ParticipationSource for NoParticipants {
    async fn participation_records(&self) -> Vec<lib_consensus::ParticipationRecord> {
        Vec::new()
    }

    async fn online_snapshot(
        &self,
        _account: lib_consensus::Address,
    ) -> Option<lib_consensus::OnlineAccountSnapshot> {
        None
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(args.log_level.clone()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("ZHTP node v{}", env!("CARGO_PKG_VERSION"));

    let cli_args = CliArgs {
        config: args.config,
        environment: args.environment.into(),
        log_level: args.log_level,
        data_dir: args.data_dir,
        external_weight_oracle_port: args.external_weight_oracle_port,
    };

    let node_config = load_configuration(&cli_args).await?;

    validate_weighted_consensus_startup(
        &node_config,
        GenesisHash(node_config.genesis_hash),
        lib_consensus::Round(0),
        &NoParticipants,
    )
    .await?;

    info!("weighted consensus core ready");
    Ok(())
}
