//! ZHTP Consensus Engine
//!
//! Weighted committee selection, credential verification, and the
//! absenteeism formula. Weight is resolved externally, through whatever
//! implements [`membership::ExternalWeighter`] — this crate knows nothing
//! about HTTP, the daemon, or the ledger that owns the connection to it.

pub mod absentee;
pub mod credential;
pub mod membership;
pub mod sortition;
pub mod types;

pub use credential::{verify, verify_with, ZeroWeightError};
pub use membership::{membership as build_membership, ExternalWeighter, MembershipError};
pub use sortition::{NormalApproxSortition, Sortition};
pub use types::*;
