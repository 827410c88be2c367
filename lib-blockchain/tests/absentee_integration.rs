//! `generate_absentees`/`validate_absentees` driven through [`LedgerWeighter`]
//! against a real loopback daemon, rather than the in-module fixed-weighter
//! stub — exercises the wire encoding end to end.

use std::sync::Arc;

use lib_blockchain::{generate_absentees, install_for_test, validate_absentees, AbsenteeCandidate, LedgerWeighter};
use lib_consensus::{Address, Round, SelectionId};
use lib_weight_oracle::testutil::MockDaemon;
use lib_weight_oracle::{OracleClient, OracleConfig, WeightOracle};

#[tokio::test]
async fn absentees_round_trip_through_the_wire() {
    let daemon = MockDaemon::start().await;
    let account = Address([3u8; 32]);
    let selection_id = SelectionId([3u8; 32]);

    daemon.set_weight(&account.to_wire(), &selection_id.to_wire(), 1, 100);
    daemon.set_total_weight(1, 1_201, 1_000);

    let client: Arc<dyn WeightOracle> = Arc::new(OracleClient::new(OracleConfig::new(daemon.port)));
    install_for_test(client);

    let candidates = vec![AbsenteeCandidate {
        account,
        selection_id,
        last_seen: 1_000,
    }];

    let generated = generate_absentees(&LedgerWeighter, Round(1), Round(1_201), 1_000, &candidates).await;
    let validated = validate_absentees(&LedgerWeighter, Round(1), Round(1_201), 1_000, &candidates)
        .await
        .unwrap();

    assert_eq!(generated, validated);
    assert_eq!(generated, vec![account]);

    daemon.shutdown();
}

#[tokio::test]
async fn zero_weight_from_daemon_is_rejected_by_validation() {
    let daemon = MockDaemon::start().await;
    daemon.set_total_weight(1, 100, 1_000);
    // No weight configured for this account: daemon answers 404 not_found,
    // which LedgerWeighter surfaces as a non-operational error.

    let client: Arc<dyn WeightOracle> = Arc::new(OracleClient::new(OracleConfig::new(daemon.port)));
    install_for_test(client);

    let candidates = vec![AbsenteeCandidate {
        account: Address([4u8; 32]),
        selection_id: SelectionId([4u8; 32]),
        last_seen: 1,
    }];

    let result = validate_absentees(&LedgerWeighter, Round(1), Round(100), 1_000, &candidates).await;
    assert!(result.is_err());

    daemon.shutdown();
}
