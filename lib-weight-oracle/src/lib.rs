//! ZHTP Weight Oracle Client
//!
//! A caching, timed, fail-fast HTTP/JSON client to the per-node weight
//! daemon: the authoritative out-of-process source of each online account's
//! consensus weight. This crate owns the wire protocol, the typed error
//! model, and the two bounded LRU caches. It has no knowledge of agreement,
//! sortition, or ledger state — those live in `lib-consensus` and
//! `lib-blockchain`, which consume the [`client::WeightOracle`] trait.

pub mod cache;
pub mod client;
pub mod error;
pub mod identity;
pub mod ids;
pub mod wire;

#[cfg(any(test, feature = "testutil"))]
pub mod testutil;

pub use client::{OracleClient, OracleConfig, WeightOracle, DEFAULT_QUERY_TIMEOUT};
pub use error::{DaemonError, DaemonErrorCode, OracleError};
pub use identity::{DaemonIdentity, EXPECTED_WEIGHT_ALGORITHM_VERSION, EXPECTED_WEIGHT_PROTOCOL_VERSION};
pub use ids::{Address, GenesisHash, Round, SelectionId};
