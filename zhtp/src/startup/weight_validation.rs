//! Startup validator (spec §4.7, C7): reject startup unless the whole
//! chain — port, daemon reachability, daemon identity, every eligible
//! participation key — is healthy. Consensus must never begin in a
//! half-configured state.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use lib_consensus::{balance_round, Address, ConsensusParams, OnlineAccountSnapshot, ParticipationRecord, Round};
use lib_weight_oracle::{DaemonIdentity, GenesisHash, OracleClient, OracleConfig, WeightOracle};

use crate::config::NodeConfig;

/// The participation registry and online-account snapshot source are owned
/// by the surrounding node and storage layer, out of this workspace's
/// scope; this trait is the thin boundary the validator needs from them.
#[async_trait::async_trait]
pub trait ParticipationSource: Send + Sync {
    async fn participation_records(&self) -> Vec<ParticipationRecord>;
    async fn online_snapshot(&self, account: Address) -> Option<OnlineAccountSnapshot>;
}

/// Run the full startup sequence. On success the oracle has been installed
/// into the ledger and every eligible participation key has been checked.
pub async fn validate_weighted_consensus_startup(
    config: &NodeConfig,
    expected_genesis_hash: GenesisHash,
    latest_round: Round,
    participation: &dyn ParticipationSource,
) -> Result<()> {
    let port = config.consensus_config.external_weight_oracle_port;
    if port == 0 {
        bail!("external_weight_oracle_port is unset (0); weighted consensus requires a configured daemon port");
    }

    let client: Arc<dyn WeightOracle> = Arc::new(OracleClient::new(OracleConfig::new(port)));

    client
        .ping()
        .await
        .context("weight daemon not reachable")?;
    tracing::info!(port, "weight daemon reachable");

    let identity = client
        .identity()
        .await
        .context("weight daemon identity query failed")?;
    check_identity(&identity, expected_genesis_hash)?;
    tracing::info!("weight daemon identity verified");

    lib_blockchain::install(client.clone());
    tracing::info!("weight oracle installed into ledger");

    let params = ConsensusParams::sample();
    let vote_round = Round(latest_round.0 + 1);
    let balance_rnd = balance_round(vote_round, &params);

    let mut checked = 0usize;
    for record in participation.participation_records().await {
        if !check_eligible_record(&record, vote_round, participation).await? {
            continue;
        }

        let vrf = record.vrf.expect("checked above");
        let weight = client
            .weight(balance_rnd, record.account, vrf)
            .await
            .with_context(|| format!("weight query failed for account {}", record.account))?;

        if weight == 0 {
            bail!(
                "weight daemon returned zero weight for eligible participation key {}",
                record.account
            );
        }
        checked += 1;
    }

    tracing::info!(checked, "participation keys validated at startup");
    Ok(())
}

/// Applies the skip rules of spec §4.7 step 5, short-circuiting to `false`
/// (skip, not fatal) at every step except the final weight query.
async fn check_eligible_record(
    record: &ParticipationRecord,
    vote_round: Round,
    participation: &dyn ParticipationSource,
) -> Result<bool> {
    if vote_round < record.first_valid || vote_round > record.last_valid {
        return Ok(false);
    }

    let Some(vrf) = record.vrf else {
        return Ok(false);
    };

    let Some(snapshot) = participation.online_snapshot(record.account).await else {
        return Ok(false);
    };

    if snapshot.selection_id != vrf {
        return Ok(false);
    }

    Ok(snapshot.key_eligible_at(vote_round))
}

fn check_identity(identity: &DaemonIdentity, expected_genesis_hash: GenesisHash) -> Result<()> {
    if identity.genesis_hash != expected_genesis_hash {
        bail!(
            "weight daemon genesis hash mismatch: expected {}, got {}",
            expected_genesis_hash,
            identity.genesis_hash
        );
    }
    if identity.protocol_version != lib_weight_oracle::EXPECTED_WEIGHT_PROTOCOL_VERSION {
        bail!(
            "weight daemon protocol version mismatch: expected {}, got {}",
            lib_weight_oracle::EXPECTED_WEIGHT_PROTOCOL_VERSION,
            identity.protocol_version
        );
    }
    if identity.algorithm_version != lib_weight_oracle::EXPECTED_WEIGHT_ALGORITHM_VERSION {
        bail!(
            "weight daemon algorithm version mismatch: expected {}, got {}",
            lib_weight_oracle::EXPECTED_WEIGHT_ALGORITHM_VERSION,
            identity.algorithm_version
        );
    }
    Ok(())
}
