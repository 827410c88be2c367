//! Wire identifiers: rounds, addresses, selection IDs, genesis hashes.
//!
//! Addresses and selection IDs are 32-byte values; on the wire an address is
//! a checksummed, unpadded Base32 string (payload || 4-byte checksum) and a
//! selection ID is lowercase hex, matching the daemon wire protocol.

use data_encoding::BASE32_NOPAD;
use std::fmt;

use crate::error::OracleError;

/// A monotone round number. 0 is genesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub struct Round(pub u64);

impl Round {
    pub fn saturating_sub(self, rhs: u64) -> Round {
        Round(self.0.saturating_sub(rhs))
    }
}

impl fmt::Display for Round {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 32-byte account identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Address(pub [u8; 32]);

/// 32-byte VRF public key identifying a committee-selection credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct SelectionId(pub [u8; 32]);

/// 32-byte genesis digest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct GenesisHash(pub [u8; 32]);

fn checksum(payload: &[u8; 32]) -> [u8; 4] {
    let digest = blake3::hash(payload);
    let bytes = digest.as_bytes();
    [bytes[28], bytes[29], bytes[30], bytes[31]]
}

impl Address {
    pub fn to_wire(&self) -> String {
        let mut buf = [0u8; 36];
        buf[..32].copy_from_slice(&self.0);
        buf[32..].copy_from_slice(&checksum(&self.0));
        BASE32_NOPAD.encode(&buf)
    }

    pub fn from_wire(s: &str) -> Result<Self, OracleError> {
        let decoded = BASE32_NOPAD
            .decode(s.as_bytes())
            .map_err(|e| OracleError::Transport(format!("invalid address encoding: {e}")))?;
        if decoded.len() != 36 {
            return Err(OracleError::Transport(format!(
                "address must decode to 36 bytes, got {}",
                decoded.len()
            )));
        }
        let mut payload = [0u8; 32];
        payload.copy_from_slice(&decoded[..32]);
        let mut given_checksum = [0u8; 4];
        given_checksum.copy_from_slice(&decoded[32..]);
        if checksum(&payload) != given_checksum {
            return Err(OracleError::Transport("address checksum mismatch".into()));
        }
        Ok(Address(payload))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_wire())
    }
}

impl SelectionId {
    pub fn to_wire(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_wire(s: &str) -> Result<Self, OracleError> {
        let bytes = hex::decode(s)
            .map_err(|e| OracleError::Transport(format!("invalid selection_id hex: {e}")))?;
        if bytes.len() != 32 {
            return Err(OracleError::Transport(format!(
                "selection_id must be 32 bytes, got {}",
                bytes.len()
            )));
        }
        let mut out = [0u8; 32];
        out.copy_from_slice(&bytes);
        Ok(SelectionId(out))
    }
}

impl fmt::Display for SelectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_wire())
    }
}

impl GenesisHash {
    /// Standard (not URL-safe) Base64, matching the daemon's identity response.
    pub fn to_wire(&self) -> String {
        use base64::Engine;
        base64::engine::general_purpose::STANDARD.encode(self.0)
    }

    pub fn from_wire(s: &str) -> Result<Self, OracleError> {
        use base64::Engine;
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(s)
            .map_err(|e| OracleError::Transport(format!("invalid genesis_hash base64: {e}")))?;
        if bytes.len() != 32 {
            return Err(OracleError::Transport(format!(
                "genesis_hash must decode to exactly 32 bytes, got {}",
                bytes.len()
            )));
        }
        let mut out = [0u8; 32];
        out.copy_from_slice(&bytes);
        Ok(GenesisHash(out))
    }
}

impl fmt::Display for GenesisHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_wire())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_round_trips() {
        let addr = Address([7u8; 32]);
        let wire = addr.to_wire();
        let back = Address::from_wire(&wire).unwrap();
        assert_eq!(addr, back);
    }

    #[test]
    fn address_checksum_rejects_corruption() {
        let addr = Address([7u8; 32]);
        let mut wire = addr.to_wire();
        // Flip the last character, which falls within the checksum bytes.
        let mut chars: Vec<char> = wire.chars().collect();
        let last = chars.len() - 1;
        chars[last] = if chars[last] == 'A' { 'B' } else { 'A' };
        wire = chars.into_iter().collect();
        assert!(Address::from_wire(&wire).is_err());
    }

    #[test]
    fn selection_id_round_trips() {
        let sel = SelectionId([9u8; 32]);
        let wire = sel.to_wire();
        assert_eq!(SelectionId::from_wire(&wire).unwrap(), sel);
    }

    #[test]
    fn genesis_hash_rejects_wrong_length() {
        assert!(GenesisHash::from_wire("AAAA").is_err());
        let ok = GenesisHash([1u8; 32]);
        let wire = ok.to_wire();
        assert_eq!(GenesisHash::from_wire(&wire).unwrap(), ok);
    }
}
