//! Daemon identity: the handshake contract a node verifies at startup.

use serde::{Deserialize, Serialize};

use crate::ids::GenesisHash;

/// The protocol/algorithm version every node on a network is hard-coded to
/// expect. Hard-coded deliberately: an operator-facing versioning policy is
/// out of scope (spec §6).
pub const EXPECTED_WEIGHT_PROTOCOL_VERSION: &str = "1.0";
pub const EXPECTED_WEIGHT_ALGORITHM_VERSION: &str = "1.0";

/// `(GenesisHash, WeightAlgorithmVersion, WeightProtocolVersion)` reported by
/// `/identity`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaemonIdentity {
    pub genesis_hash: GenesisHash,
    pub protocol_version: String,
    pub algorithm_version: String,
}
