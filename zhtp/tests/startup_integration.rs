//! End-to-end exercise of the startup sequence (spec §4.7, §8 scenarios)
//! against the in-process mock daemon.

use lib_weight_oracle::testutil::MockDaemon;
use lib_weight_oracle::GenesisHash;
use zhtp::config::{ConsensusConfig, Environment, NodeConfig};
use zhtp::startup::{validate_weighted_consensus_startup, ParticipationSource};

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

fn config_for(port: u16) -> NodeConfig {
    NodeConfig {
        node_id: [0u8; 32],
        genesis_hash: [7u8; 32],
        environment: Environment::Testnet,
        data_directory: "./data".to_string(),
        consensus_config: ConsensusConfig {
            external_weight_oracle_port: port,
        },
    }
}

#[tokio::test]
async fn startup_succeeds_with_no_eligible_participants() {
    let daemon = MockDaemon::start().await;
    let genesis = GenesisHash([7u8; 32]);
    daemon.set_identity_ok(&genesis.to_wire(), "1.0", "1.0");

    let config = config_for(daemon.port);
    let result = validate_weighted_consensus_startup(
        &config,
        genesis,
        lib_consensus::Round(100),
        &NoParticipants,
    )
    .await;

    assert!(result.is_ok(), "{:?}", result.err());
    daemon.shutdown();
}

#[tokio::test]
async fn startup_fails_on_unreachable_daemon() {
    // A port nothing is listening on.
    let config = config_for(1);
    let result = validate_weighted_consensus_startup(
        &config,
        GenesisHash([7u8; 32]),
        lib_consensus::Round(100),
        &NoParticipants,
    )
    .await;

    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("not reachable"));
}

#[tokio::test]
async fn startup_fails_on_genesis_hash_mismatch() {
    let daemon = MockDaemon::start().await;
    let wrong_genesis = GenesisHash([9u8; 32]);
    daemon.set_identity_ok(&wrong_genesis.to_wire(), "1.0", "1.0");

    let config = config_for(daemon.port);
    let result = validate_weighted_consensus_startup(
        &config,
        GenesisHash([7u8; 32]),
        lib_consensus::Round(100),
        &NoParticipants,
    )
    .await;

    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("genesis hash mismatch"));
    daemon.shutdown();
}

#[tokio::test]
async fn startup_fails_on_unset_oracle_port() {
    let config = config_for(0);
    let result = validate_weighted_consensus_startup(
        &config,
        GenesisHash([7u8; 32]),
        lib_consensus::Round(100),
        &NoParticipants,
    )
    .await;

    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("unset"));
}

#[tokio::test]
async fn startup_fails_on_algorithm_version_mismatch() {
    let daemon = MockDaemon::start().await;
    let genesis = GenesisHash([7u8; 32]);
    daemon.set_identity_ok(&genesis.to_wire(), "1.0", "2.0");

    let config = config_for(daemon.port);
    let result = validate_weighted_consensus_startup(
        &config,
        genesis,
        lib_consensus::Round(100),
        &NoParticipants,
    )
    .await;

    assert!(result.is_err());
    assert!(result
        .unwrap_err()
        .to_string()
        .contains("algorithm version mismatch"));
    daemon.shutdown();
}

/// A single eligible participation key, wired so `check_eligible_record`
/// accepts it: the record's valid range covers the vote round, carries a
/// VRF, and the matching online snapshot's selection ID and validity window
/// agree with it.
struct OneEligibleParticipant {
    account: lib_consensus::Address,
    selection_id: lib_consensus::SelectionId,
}

#[async_trait::async_trait]
impl ParticipationSource for OneEligibleParticipant {
    async fn participation_records(&self) -> Vec<lib_consensus::ParticipationRecord> {
        vec![lib_consensus::ParticipationRecord {
            account: self.account,
            first_valid: lib_consensus::Round(0),
            last_valid: lib_consensus::Round(1_000_000),
            vrf: Some(self.selection_id),
            vote_id: None,
        }]
    }

    async fn online_snapshot(
        &self,
        account: lib_consensus::Address,
    ) -> Option<lib_consensus::OnlineAccountSnapshot> {
        if account != self.account {
            return None;
        }
        Some(lib_consensus::OnlineAccountSnapshot {
            address: self.account,
            selection_id: self.selection_id,
            vote_id: [0u8; 32],
            vote_first_valid: lib_consensus::Round(0),
            vote_last_valid: lib_consensus::Round(0),
            micro_algos: 1_000,
        })
    }
}

#[tokio::test]
async fn startup_fails_on_zero_weight_for_eligible_key() {
    let daemon = MockDaemon::start().await;
    let genesis = GenesisHash([7u8; 32]);
    daemon.set_identity_ok(&genesis.to_wire(), "1.0", "1.0");

    let account = lib_consensus::Address([3u8; 32]);
    let selection_id = lib_consensus::SelectionId([4u8; 32]);
    let latest_round = lib_consensus::Round(100);
    let vote_round = lib_consensus::Round(latest_round.0 + 1);
    let balance_round = lib_consensus::balance_round(vote_round, &lib_consensus::ConsensusParams::sample());
    daemon.set_weight(&account.to_wire(), &selection_id.to_wire(), balance_round.0, 0);

    let config = config_for(daemon.port);
    let participation = OneEligibleParticipant { account, selection_id };
    let result =
        validate_weighted_consensus_startup(&config, genesis, latest_round, &participation).await;

    assert!(result.is_err());
    let message = result.unwrap_err().to_string();
    assert!(
        message.contains(&account.to_wire()) || message.contains("zero weight"),
        "unexpected error message: {message}"
    );
    daemon.shutdown();
}
