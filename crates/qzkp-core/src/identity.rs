//! # Proof Identifiers
//!
//! `ProofId` is content-derived: its 16 bytes are a prefix of a transcript
//! digest, stamped as a version-8 (custom) UUID. Because the challenge seed
//! hashes the proof id, every byte that feeds the id is fixed before any
//! challenge can be known.

use serde::{Deserialize, Serialize};
use uuid::{Builder, Uuid};

/// Identifier of a single proof.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProofId(Uuid);

impl ProofId {
    /// Derive an identifier from a 32-byte transcript digest.
    ///
    /// The UUID version and variant bits overwrite 6 bits of the prefix, so
    /// the id carries 122 bits of the digest.
    pub fn from_digest(digest: &[u8; 32]) -> Self {
        let mut custom = [0u8; 16];
        custom.copy_from_slice(&digest[..16]);
        Self(Builder::from_custom_bytes(custom).into_uuid())
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// The 16 UUID bytes, as absorbed by the challenge seed.
    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }
}

impl std::fmt::Display for ProofId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
