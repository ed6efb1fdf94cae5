//! # qzkp-crypto: Cryptographic Primitives
//!
//! Provides the cryptographic building blocks for the qzkp proof engine:
//!
//! - **Randomness sources** behind the injectable [`RandomnessSource`] trait:
//!   OS-backed for production, seeded ChaCha20 for reproducible tests.
//! - **Merkle aggregation** with domain-separated SHA-256, power-of-two
//!   padding and per-leaf inclusion paths.
//! - **Dilithium3** post-quantum signing and verification over
//!   `CanonicalBytes`.
//!
//! ## Crate Policy
//!
//! - Depends only on `qzkp-core` internally.
//! - No mocking of cryptographic operations in tests; all tests use real
//!   SHA-256, real Dilithium3 and real entropy.
//! - No `unsafe`.

pub mod merkle;
pub mod random;
pub mod signature;

pub use merkle::{build_tree, leaf_hash, verify_path, MerklePath, MerkleTree, PathStep, Side};
pub use random::{
    random_array, LimitedRandomness, OsRandomness, RandomnessSource, SeededRandomness,
};
pub use signature::{PqKeyPair, PqPublicKey, PqSignature};
