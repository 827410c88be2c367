//! Hashing module for ZHTP cryptography
//!
//! Provides Blake3 hashing functionality used throughout the system

use blake3;

/// Blake3 hash function - primary hash function for ZHTP
pub fn hash_blake3(data: &[u8]) -> [u8; 32] {
    let hash = blake3::hash(data);
    hash.into()
}

/// Hash multiple data segments
pub fn hash_blake3_multiple(data_segments: &[&[u8]]) -> [u8; 32] {
    let mut hasher = blake3::Hasher::new();
    for segment in data_segments {
        hasher.update(segment);
    }
    hasher.finalize().into()
}
