//! Core data model for weighted committee selection (spec §3).
//!
//! `Round`, `Address`, and `SelectionId` are re-exported from
//! `lib-weight-oracle` rather than redefined here: they name the same wire
//! identifiers the oracle client speaks, and a second definition would just
//! invite drift between the two crates.

use serde::{Deserialize, Serialize};

pub use lib_weight_oracle::{Address, Round, SelectionId};

/// VRF-derived randomness for one balance epoch.
pub type Seed = [u8; 32];

/// The agreement step a message belongs to. Real networks have more
/// fine-grained "down-XX" steps past the first few periods; they are folded
/// into `Down` here since they all share one committee-size rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Step {
    Propose,
    Soft,
    Cert,
    Down(u32),
}

/// The subset of consensus parameters the weighted-consensus core needs.
/// A real node derives these from the protocol active at a round; tests
/// and this crate's callers construct them directly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConsensusParams {
    pub seed_lookback: u64,
    pub seed_refresh_interval: u64,
    pub committee_size_propose: u64,
    pub committee_size_soft: u64,
    pub committee_size_cert: u64,
    pub committee_size_down: u64,
}

impl ConsensusParams {
    /// Values representative of a small testnet; production parameters are
    /// supplied by the surrounding node's protocol table (out of scope here,
    /// per spec §1's "surrounding full node" collaborator boundary).
    pub fn sample() -> Self {
        Self {
            seed_lookback: 2,
            seed_refresh_interval: 10,
            committee_size_propose: 20,
            committee_size_soft: 2990,
            committee_size_cert: 1500,
            committee_size_down: 5000,
        }
    }
}

impl Step {
    /// `expectedSelection` for this step: independent of weight (spec §4.5).
    pub fn committee_size(&self, params: &ConsensusParams) -> u64 {
        match self {
            Step::Propose => params.committee_size_propose,
            Step::Soft => params.committee_size_soft,
            Step::Cert => params.committee_size_cert,
            Step::Down(_) => params.committee_size_down,
        }
    }
}

/// The 4-tuple naming one specific committee draw.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Selector {
    pub seed: Seed,
    pub round: Round,
    pub period: u32,
    pub step: Step,
}

/// Balance-round and seed-round derivation (spec §3): generator and
/// validator must compute these identically, so the formula lives once
/// here rather than being re-derived at each call site.
pub fn balance_round(vote_round: Round, params: &ConsensusParams) -> Round {
    vote_round.saturating_sub(2 * params.seed_refresh_interval * params.seed_lookback)
}

pub fn seed_round(vote_round: Round, params: &ConsensusParams) -> Round {
    vote_round.saturating_sub(params.seed_lookback)
}

/// Stand-in for the stake-world balance data the generator/validator still
/// carries for reward paths not covered by this core (spec §4.4 step 2).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct BalanceRecord {
    pub micro_algos: u64,
}

/// `(BalanceRecord, Selector, TotalMoney, ExternalWeight, TotalExternalWeight)`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Membership {
    pub balance: BalanceRecord,
    pub selector: Selector,
    pub total_money: u64,
    pub external_weight: u64,
    pub total_external_weight: u64,
}

impl Membership {
    /// A membership value for a key-ineligible sender: both weight fields
    /// zero, no daemon ever consulted (spec §4.4 step 3).
    pub fn key_ineligible(balance: BalanceRecord, selector: Selector, total_money: u64) -> Self {
        Self {
            balance,
            selector,
            total_money,
            external_weight: 0,
            total_external_weight: 0,
        }
    }
}

/// `(weight, vrfOutput)`. `weight == 0` means "not selected".
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Credential {
    pub weight: u64,
    pub vrf_output: [u8; 32],
}

/// The online snapshot of one account at a specific balance round.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OnlineAccountSnapshot {
    pub address: Address,
    pub selection_id: SelectionId,
    pub vote_id: [u8; 32],
    pub vote_first_valid: Round,
    /// `Round(0)` means "no expiration".
    pub vote_last_valid: Round,
    pub micro_algos: u64,
}

impl OnlineAccountSnapshot {
    /// Key-eligibility gate (spec §4.4 step 3, GLOSSARY "Key-eligible").
    pub fn key_eligible_at(&self, r: Round) -> bool {
        r >= self.vote_first_valid && (self.vote_last_valid.0 == 0 || r <= self.vote_last_valid)
    }
}

/// A participation record from the registry (persisted elsewhere; the
/// registry's storage is a named external collaborator, spec §1).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ParticipationRecord {
    pub account: Address,
    pub first_valid: Round,
    pub last_valid: Round,
    pub vrf: Option<SelectionId>,
    pub vote_id: Option<[u8; 32]>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_eligible_respects_no_expiration_sentinel() {
        let snap = OnlineAccountSnapshot {
            address: Address([0u8; 32]),
            selection_id: SelectionId([0u8; 32]),
            vote_id: [0u8; 32],
            vote_first_valid: Round(200),
            vote_last_valid: Round(0),
            micro_algos: 0,
        };
        assert!(!snap.key_eligible_at(Round(100)));
        assert!(snap.key_eligible_at(Round(200)));
        assert!(snap.key_eligible_at(Round(10_000_000)));
    }

    #[test]
    fn key_eligible_respects_explicit_upper_bound() {
        let snap = OnlineAccountSnapshot {
            address: Address([0u8; 32]),
            selection_id: SelectionId([0u8; 32]),
            vote_id: [0u8; 32],
            vote_first_valid: Round(200),
            vote_last_valid: Round(500),
            micro_algos: 0,
        };
        assert!(!snap.key_eligible_at(Round(100)));
        assert!(snap.key_eligible_at(Round(350)));
        assert!(!snap.key_eligible_at(Round(600)));
    }

    #[test]
    fn balance_round_saturates_at_zero() {
        let params = ConsensusParams::sample();
        assert_eq!(balance_round(Round(5), &params), Round(0));
    }
}
