//! # qzkp-core: Foundational Types for the qzkp Proof Engine
//!
//! Leaf crate of the workspace. Defines the type-system primitives every
//! other crate builds on; it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Closed security levels.** `SecurityLevel` enumerates the six
//!    supported levels; integers are checked once, at the boundary.
//!
//! 2. **Unserializable witness.** `WitnessDigest` cannot be serialized,
//!    displayed or cloned, so no transcript type can embed it.
//!
//! 3. **`CanonicalBytes` newtype.** Signing input flows through
//!    `CanonicalBytes::new()`, guaranteeing prover and verifier hash and sign
//!    identical bytes.
//!
//! 4. **UTC-only timestamps** with seconds precision and `Z` suffix.
//!
//! 5. **One error taxonomy.** Every failure maps to an `ErrorKind`.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `qzkp-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod canonical;
pub mod digest;
pub mod error;
pub mod hex;
pub mod identity;
pub mod security;
pub mod temporal;
pub mod witness;

// Re-export primary types for ergonomic imports.
pub use canonical::CanonicalBytes;
pub use digest::{blake3_keyed, ContentDigest, DigestAlgorithm, Sha256Accumulator};
pub use error::{CanonicalizationError, CryptoError, ErrorKind, ProtocolError};
pub use identity::ProofId;
pub use security::{challenges_for_security_bits, soundness_error_for_challenges, SecurityLevel};
pub use temporal::Timestamp;
pub use witness::{WitnessDigest, WITNESS_DIGEST_LEN};
