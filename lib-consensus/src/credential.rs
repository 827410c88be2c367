//! Credential verification (spec §4.5, C5).

use lib_crypto::hashing::hash_blake3_multiple;

use crate::sortition::Sortition;
use crate::types::{ConsensusParams, Credential, Membership};

/// The normal rejection path: zero weight for an ineligible sender or a
/// forged credential. Not an invariant violation.
#[derive(Debug, Clone, thiserror::Error)]
#[error("credential has weight 0")]
pub struct ZeroWeightError;

/// Verify a credential against a constructed [`Membership`] and return the
/// sender's committee weight for this `(round, period, step)`.
///
/// # Panics
///
/// Panics on the population-alignment and committee-size invariants in
/// spec §4.5 step 3 — these can only fail if `membership()` (or a caller
/// bypassing it) handed us internally inconsistent data, which would mean
/// two nodes could disagree about consensus.
pub fn verify(
    membership: &Membership,
    params: &ConsensusParams,
    vrf_output: [u8; 32],
) -> Result<Credential, ZeroWeightError> {
    verify_with(&crate::sortition::NormalApproxSortition, membership, params, vrf_output)
}

/// Same as [`verify`] but with an explicit sortition implementation, for
/// tests that want to substitute a deterministic stub.
pub fn verify_with(
    sortition: &dyn Sortition,
    membership: &Membership,
    params: &ConsensusParams,
    vrf_output: [u8; 32],
) -> Result<Credential, ZeroWeightError> {
    let expected_selection = membership.selector.step.committee_size(params) as f64;

    if membership.external_weight == 0 {
        return Err(ZeroWeightError);
    }

    assert!(
        membership.total_external_weight >= membership.external_weight,
        "population alignment violated: total_external_weight {} < external_weight {}",
        membership.total_external_weight,
        membership.external_weight
    );
    assert!(
        expected_selection > 0.0 && expected_selection <= membership.total_external_weight as f64,
        "expected_selection {} out of range for total_external_weight {}",
        expected_selection,
        membership.total_external_weight
    );

    let digest = hash_blake3_multiple(&[&vrf_output, &selector_bytes(membership)]);

    let weight = sortition.select(
        membership.external_weight,
        membership.total_external_weight,
        expected_selection,
        &digest,
    );

    Ok(Credential { weight, vrf_output })
}

fn selector_bytes(membership: &Membership) -> Vec<u8> {
    let s = &membership.selector;
    let mut buf = Vec::with_capacity(32 + 8 + 4 + 8);
    buf.extend_from_slice(&s.seed);
    buf.extend_from_slice(&s.round.0.to_be_bytes());
    buf.extend_from_slice(&s.period.to_be_bytes());
    buf.extend_from_slice(&step_discriminant(s.step).to_be_bytes());
    buf
}

fn step_discriminant(step: crate::types::Step) -> u64 {
    use crate::types::Step;
    match step {
        Step::Propose => 0,
        Step::Soft => 1,
        Step::Cert => 2,
        Step::Down(n) => 1000 + n as u64,
    }
}
