//! ZHTP Cryptography Foundation Module
//!
//! Hashing primitives shared by the rest of the workspace. The credential
//! verifier (`lib-consensus`) is the only remaining consumer, and needs only
//! BLAKE3.

pub mod hashing;

pub use hashing::{hash_blake3, hash_blake3_multiple};
