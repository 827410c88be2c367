//! Typed error model for the weight daemon.

use serde::{Deserialize, Serialize};

/// The `code` field of a daemon `{"error":..., "code":...}` response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DaemonErrorCode {
    NotFound,
    BadRequest,
    Internal,
    Unsupported,
}

impl DaemonErrorCode {
    /// `true` for `"internal"`, the only code that is an operational (not
    /// invariant-violating) failure for a call made under valid preconditions.
    pub fn is_operational(self) -> bool {
        matches!(self, DaemonErrorCode::Internal)
    }
}

/// A structured error returned by the daemon itself (not a transport failure).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonError {
    pub code: DaemonErrorCode,
    pub msg: String,
}

impl std::fmt::Display for DaemonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "daemon error [{:?}]: {}", self.code, self.msg)
    }
}

impl std::error::Error for DaemonError {}

/// Every failure mode the oracle client can surface to a caller.
///
/// `Daemon` preserves the structured `DaemonError`; every other variant is an
/// opaque, transport-shaped failure (dial refusal, timeout, malformed JSON,
/// missing field, bad encoding) per spec: the client never retries and never
/// tries to recover detail beyond "this call failed".
#[derive(Debug, Clone, thiserror::Error)]
pub enum OracleError {
    #[error(transparent)]
    Daemon(#[from] DaemonError),

    #[error("weight daemon transport error: {0}")]
    Transport(String),

    #[error("weight daemon request timed out after {0:?}")]
    Timeout(std::time::Duration),
}

impl OracleError {
    /// Classification used throughout the consensus-facing call sites
    /// (spec §4.4, §4.6, §7): `true` means "operational, caller propagates
    /// an error and moves on"; `false` means "invariant violation, caller
    /// must treat this as fatal".
    pub fn is_operational(&self) -> bool {
        match self {
            OracleError::Daemon(d) => d.code.is_operational(),
            OracleError::Transport(_) | OracleError::Timeout(_) => true,
        }
    }
}
