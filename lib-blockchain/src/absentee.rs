//! Per-block offline-knock decisions (spec §4.6, C6).
//!
//! The pure formula lives in [`lib_consensus::absentee`], shared verbatim
//! between the two paths here so generation and validation can never drift
//! apart. What differs between them is only the failure policy: the
//! generator panics on an invariant violation, the validator turns the same
//! condition into a rejected block.

use lib_consensus::absentee::is_absent;
use lib_consensus::{ExternalWeighter, Round};
use lib_weight_oracle::OracleError;

/// One online account eligible to be checked for absence this round.
#[derive(Debug, Clone, Copy)]
pub struct AbsenteeCandidate {
    pub account: lib_consensus::Address,
    pub selection_id: lib_consensus::SelectionId,
    pub last_seen: u64,
}

/// Failure surfaced to the validator; the generator treats the same
/// conditions as a panic (see [`generate_absentees`]).
#[derive(Debug, thiserror::Error)]
pub enum AbsenteeError {
    #[error("weight daemon operational failure: {0}")]
    Oracle(#[from] OracleError),
}

/// Generation path: called while assembling a block. Panics on an
/// invariant violation (daemon/ledger population mismatch, a non-operational
/// per-candidate error, zero weight for an online candidate) — a block
/// generator that continues past those conditions would disagree with every
/// honest validator. An operational failure fetching one candidate's weight
/// degrades the same way an operational failure on `TotalExternalWeight`
/// does (spec §4.6): log and carry on without that candidate, rather than
/// aborting block assembly over a transient daemon hiccup.
pub async fn generate_absentees(
    weighter: &dyn ExternalWeighter,
    balance_round: Round,
    current: Round,
    stake_world_online_circulation: u64,
    candidates: &[AbsenteeCandidate],
) -> Vec<lib_consensus::Address> {
    let total_weight = match weighter
        .total_external_weight(balance_round, current)
        .await
    {
        Ok(w) => w,
        Err(err) if err.is_operational() => {
            tracing::warn!(error = %err, "total weight unavailable, emitting empty absentee list");
            return Vec::new();
        }
        Err(err) => {
            tracing::error!(error = %err, "total weight invariant violation");
            panic!("weight daemon returned a non-operational error: {err}");
        }
    };

    if stake_world_online_circulation > 0 && total_weight == 0 {
        panic!("daemon/ledger population mismatch: online circulation is non-zero but total weight is zero");
    }

    let mut absentees = Vec::new();
    for candidate in candidates {
        let snapshot = candidate_snapshot(candidate);
        let acct_weight = match weighter.external_weight(balance_round, &snapshot).await {
            Ok(w) => w,
            Err(err) if err.is_operational() => {
                tracing::warn!(error = %err, account = %candidate.account, "candidate weight unavailable, skipping from absentee check");
                continue;
            }
            Err(err) => {
                tracing::error!(error = %err, "candidate weight invariant violation");
                panic!("weight daemon returned a non-operational error: {err}");
            }
        };

        if acct_weight == 0 {
            panic!(
                "weight daemon returned zero weight for online candidate {}",
                candidate.account
            );
        }

        if is_absent(acct_weight, total_weight, candidate.last_seen, current.0) {
            absentees.push(candidate.account);
        }
    }
    absentees
}

/// Validation path: identical logic, but every panic condition in
/// [`generate_absentees`] is a returned error instead, since the validator
/// must reject a malformed block rather than crash.
pub async fn validate_absentees(
    weighter: &dyn ExternalWeighter,
    balance_round: Round,
    current: Round,
    stake_world_online_circulation: u64,
    candidates: &[AbsenteeCandidate],
) -> Result<Vec<lib_consensus::Address>, AbsenteeError> {
    let total_weight = weighter
        .total_external_weight(balance_round, current)
        .await?;

    if stake_world_online_circulation > 0 && total_weight == 0 {
        return Err(AbsenteeError::Oracle(OracleError::Transport(
            "daemon/ledger population mismatch: online circulation is non-zero but total weight is zero".into(),
        )));
    }

    collect_absentees(weighter, balance_round, current, total_weight, candidates).await
}

fn candidate_snapshot(candidate: &AbsenteeCandidate) -> lib_consensus::OnlineAccountSnapshot {
    lib_consensus::OnlineAccountSnapshot {
        address: candidate.account,
        selection_id: candidate.selection_id,
        vote_id: [0u8; 32],
        vote_first_valid: Round(0),
        vote_last_valid: Round(0),
        micro_algos: 0,
    }
}

async fn collect_absentees(
    weighter: &dyn ExternalWeighter,
    balance_round: Round,
    current: Round,
    total_weight: u64,
    candidates: &[AbsenteeCandidate],
) -> Result<Vec<lib_consensus::Address>, AbsenteeError> {
    let mut absentees = Vec::new();

    for candidate in candidates {
        let snapshot = candidate_snapshot(candidate);

        let acct_weight = weighter
            .external_weight(balance_round, &snapshot)
            .await?;

        if acct_weight == 0 {
            return Err(AbsenteeError::Oracle(OracleError::Transport(format!(
                "zero weight for online candidate {}",
                candidate.account
            ))));
        }

        if is_absent(acct_weight, total_weight, candidate.last_seen, current.0) {
            absentees.push(candidate.account);
        }
    }

    Ok(absentees)
}
