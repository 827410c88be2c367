//! The committee-selection hook (spec §4.4, C4): the choke point where the
//! weight daemon is consulted, through the ledger's `ExternalWeighter`
//! capability.

use lib_weight_oracle::OracleError;

use crate::types::{
    balance_round, BalanceRecord, ConsensusParams, Membership, OnlineAccountSnapshot, Round,
};

/// The capability the ledger exposes to consensus code (spec §4.2, C3).
/// Consensus never imports the oracle client directly — it reaches the
/// daemon only through whatever implements this trait.
#[async_trait::async_trait]
pub trait ExternalWeighter: Send + Sync {
    async fn external_weight(
        &self,
        balance_round: Round,
        snapshot: &OnlineAccountSnapshot,
    ) -> Result<u64, OracleError>;

    async fn total_external_weight(
        &self,
        balance_round: Round,
        vote_round: Round,
    ) -> Result<u64, OracleError>;
}

/// Failure of `membership()`: propagated, not fatal. Invariant violations
/// (bad daemon codes, zero/misaligned weights) panic instead, per spec §4.4.
#[derive(Debug, thiserror::Error)]
pub enum MembershipError {
    #[error("weight daemon operational failure: {0}")]
    Oracle(#[from] OracleError),
}

/// Build the `Membership` value for one incoming `(address, round, period,
/// step)`. See spec §4.4 for the full protocol; this function is the only
/// place that decides whether the daemon is even consulted.
pub async fn membership(
    weighter: &dyn ExternalWeighter,
    balance: BalanceRecord,
    total_money: u64,
    snapshot: &OnlineAccountSnapshot,
    selector: crate::types::Selector,
) -> Result<Membership, MembershipError> {
    let r = selector.round;
    let params = ConsensusParams::sample();
    let balance_rnd = balance_round(r, &params);

    if !snapshot.key_eligible_at(r) {
        tracing::debug!(round = r.0, "key ineligible, skipping weight daemon");
        return Ok(Membership::key_ineligible(balance, selector, total_money));
    }

    let weight_result = weighter.external_weight(balance_rnd, snapshot).await;
    let total_result = weighter.total_external_weight(balance_rnd, r).await;

    let external_weight = classify(weight_result)?;
    let total_external_weight = classify(total_result)?;

    assert!(
        external_weight > 0,
        "daemon returned zero weight for a key-eligible participant"
    );
    assert!(
        total_external_weight > 0,
        "daemon returned zero total weight"
    );
    assert!(
        total_external_weight >= external_weight,
        "population alignment violated: total {} < weight {}",
        total_external_weight,
        external_weight
    );

    Ok(Membership {
        balance,
        selector,
        total_money,
        external_weight,
        total_external_weight,
    })
}

/// Applies the error-classification table from spec §4.4: a daemon code
/// other than `internal` is an invariant violation (panic); `internal` and
/// transport errors are operational (propagated).
fn classify(result: Result<u64, OracleError>) -> Result<u64, MembershipError> {
    match result {
        Ok(v) => Ok(v),
        Err(err) if err.is_operational() => {
            tracing::warn!(error = %err, "weight daemon operational failure");
            Err(MembershipError::Oracle(err))
        }
        Err(err) => {
            tracing::error!(error = %err, "weight daemon invariant violation");
            panic!("weight daemon returned a non-operational error: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{SelectionId, Selector, Step};
    use lib_weight_oracle::error::{DaemonError, DaemonErrorCode};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct MockWeighter {
        weight: Result<u64, OracleError>,
        total_weight: Result<u64, OracleError>,
        weight_calls: Arc<AtomicUsize>,
        total_calls: Arc<AtomicUsize>,
    }

    impl MockWeighter {
        fn ok(weight: u64, total_weight: u64) -> Self {
            Self {
                weight: Ok(weight),
                total_weight: Ok(total_weight),
                weight_calls: Arc::new(AtomicUsize::new(0)),
                total_calls: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    #[async_trait::async_trait]
    impl ExternalWeighter for MockWeighter {
        async fn external_weight(
            &self,
            _balance_round: Round,
            _snapshot: &OnlineAccountSnapshot,
        ) -> Result<u64, OracleError> {
            self.weight_calls.fetch_add(1, Ordering::SeqCst);
            self.weight.clone()
        }

        async fn total_external_weight(
            &self,
            _balance_round: Round,
            _vote_round: Round,
        ) -> Result<u64, OracleError> {
            self.total_calls.fetch_add(1, Ordering::SeqCst);
            self.total_weight.clone()
        }
    }

    fn snapshot(first: u64, last: u64) -> OnlineAccountSnapshot {
        OnlineAccountSnapshot {
            address: crate::types::Address([2u8; 32]),
            selection_id: SelectionId([1u8; 32]),
            vote_id: [0u8; 32],
            vote_first_valid: Round(first),
            vote_last_valid: Round(last),
            micro_algos: 0,
        }
    }

    fn selector(round: u64) -> Selector {
        Selector {
            seed: [0u8; 32],
            round: Round(round),
            period: 0,
            step: Step::Propose,
        }
    }

    #[tokio::test]
    async fn key_ineligible_skips_daemon_entirely() {
        let weighter = MockWeighter::ok(10, 100);
        let snap = snapshot(200, 500);

        let m = membership(
            &weighter,
            BalanceRecord::default(),
            0,
            &snap,
            selector(100),
        )
        .await
        .unwrap();

        assert_eq!(m.external_weight, 0);
        assert_eq!(m.total_external_weight, 0);
        assert_eq!(weighter.weight_calls.load(Ordering::SeqCst), 0);
        assert_eq!(weighter.total_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn key_eligible_queries_daemon_once_each() {
        let weighter = MockWeighter::ok(10, 100);
        let snap = snapshot(200, 500);

        let m = membership(
            &weighter,
            BalanceRecord::default(),
            0,
            &snap,
            selector(350),
        )
        .await
        .unwrap();

        assert_eq!(m.external_weight, 10);
        assert_eq!(m.total_external_weight, 100);
        assert_eq!(weighter.weight_calls.load(Ordering::SeqCst), 1);
        assert_eq!(weighter.total_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn internal_error_is_propagated_not_panicked() {
        let mut weighter = MockWeighter::ok(10, 100);
        weighter.weight = Err(OracleError::Daemon(DaemonError {
            code: DaemonErrorCode::Internal,
            msg: "db unavailable".into(),
        }));
        let snap = snapshot(200, 500);

        let result = membership(&weighter, BalanceRecord::default(), 0, &snap, selector(350)).await;
        assert!(matches!(result, Err(MembershipError::Oracle(_))));
    }

    #[tokio::test]
    #[should_panic(expected = "non-operational")]
    async fn not_found_error_panics() {
        let mut weighter = MockWeighter::ok(10, 100);
        weighter.weight = Err(OracleError::Daemon(DaemonError {
            code: DaemonErrorCode::NotFound,
            msg: "unknown account".into(),
        }));
        let snap = snapshot(200, 500);

        let _ = membership(&weighter, BalanceRecord::default(), 0, &snap, selector(350)).await;
    }

    #[tokio::test]
    #[should_panic(expected = "zero weight")]
    async fn zero_weight_for_eligible_account_panics() {
        let weighter = MockWeighter::ok(0, 100);
        let snap = snapshot(200, 500);
        let _ = membership(&weighter, BalanceRecord::default(), 0, &snap, selector(350)).await;
    }
}
