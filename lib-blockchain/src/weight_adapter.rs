//! The ledger's weight-oracle capability (spec §4.2, C3).
//!
//! Consensus code never imports `lib-weight-oracle` directly — it reaches
//! the daemon only through [`lib_consensus::ExternalWeighter`], which this
//! module implements on top of a [`WeightOracle`] installed once at
//! startup. Forwarding is the entire job; there is no caching, retrying, or
//! reinterpretation here, because the oracle client already owns that.

use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use lib_consensus::{ExternalWeighter, OnlineAccountSnapshot, Round};
use lib_weight_oracle::{OracleError, WeightOracle};

/// Installed once by startup (spec §4.7) and never replaced afterward.
static ORACLE: OnceLock<Arc<dyn WeightOracle>> = OnceLock::new();

/// Install the production oracle client. Called exactly once during
/// startup, before any consensus service runs. A second call is a
/// programming error, not a runtime condition, so it panics.
pub fn install(oracle: Arc<dyn WeightOracle>) {
    ORACLE
        .set(oracle)
        .unwrap_or_else(|_| panic!("weight oracle already installed"));
}

#[cfg(any(test, feature = "testutil"))]
pub fn install_for_test(oracle: Arc<dyn WeightOracle>) {
    let _ = ORACLE.set(oracle);
}

fn oracle() -> &'static Arc<dyn WeightOracle> {
    ORACLE
        .get()
        .unwrap_or_else(|| panic!("weighted network requires external weighter"))
}

/// The ledger's `ExternalWeighter` implementation: consensus's only path to
/// the weight daemon.
#[derive(Debug, Default, Clone, Copy)]
pub struct LedgerWeighter;

#[async_trait]
impl ExternalWeighter for LedgerWeighter {
    async fn external_weight(
        &self,
        balance_round: Round,
        snapshot: &OnlineAccountSnapshot,
    ) -> Result<u64, OracleError> {
        oracle()
            .weight(balance_round, snapshot.address, snapshot.selection_id)
            .await
    }

    async fn total_external_weight(
        &self,
        balance_round: Round,
        vote_round: Round,
    ) -> Result<u64, OracleError> {
        oracle().total_weight(balance_round, vote_round).await
    }
}
