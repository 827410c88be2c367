//! ZHTP Blockchain Core
//!
//! The ledger-side half of the weighted consensus core: the
//! `ExternalWeighter` capability consensus code calls through, and the
//! absenteeism engine that decides which online accounts to knock offline
//! each block. Everything stake/UTXO/contract-shaped that used to live here
//! belongs to a different, unrelated layer and is not part of this crate.

pub mod absentee;
pub mod weight_adapter;

pub use absentee::{generate_absentees, validate_absentees, AbsenteeCandidate, AbsenteeError};
pub use weight_adapter::{install, LedgerWeighter};

#[cfg(any(test, feature = "testutil"))]
pub use weight_adapter::install_for_test;
