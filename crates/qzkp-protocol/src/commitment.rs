//! # Commitment Engine
//!
//! Binds a witness digest under 32 bytes of fresh randomness:
//!
//! ```text
//! hash = H(len(tag) ‖ tag ‖ digest ‖ randomness)
//! ```
//!
//! `H` is SHA-256 by default or keyed BLAKE3 when configured.
//!
//! ## Security Invariant
//!
//! - Hiding: every `commit` draws new randomness; nothing is cached, so two
//!   commitments to the same digest differ with overwhelming probability.
//! - Binding: `open` recomputes the hash and compares in constant time.
//! - A `Commitment` never contains the digest. It is immutable: fields are
//!   private and exposed through accessors only.

use std::sync::Arc;

use qzkp_core::{
    blake3_keyed, ContentDigest, DigestAlgorithm, ErrorKind, ProtocolError, Sha256Accumulator,
    Timestamp, WitnessDigest,
};
use qzkp_crypto::{random_array, RandomnessSource};
use serde::{Deserialize, Serialize};

use crate::config::ProtocolConfig;

/// Domain tag for commitment hashes.
pub const COMMITMENT_TAG: &[u8] = b"qzkp/commitment/v1";

/// Commitment randomness length; at least the digest length.
pub const COMMITMENT_RANDOMNESS_LEN: usize = 32;

/// A hiding, binding commitment to a witness digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Commitment {
    #[serde(rename = "Hash")]
    hash: ContentDigest,
    #[serde(rename = "Randomness", with = "qzkp_core::hex::serde_array32")]
    randomness: [u8; COMMITMENT_RANDOMNESS_LEN],
    #[serde(rename = "Timestamp")]
    timestamp: Timestamp,
}

impl Commitment {
    pub fn hash(&self) -> &ContentDigest {
        &self.hash
    }

    pub fn randomness(&self) -> &[u8; COMMITMENT_RANDOMNESS_LEN] {
        &self.randomness
    }

    pub fn timestamp(&self) -> &Timestamp {
        &self.timestamp
    }

    pub fn to_json(&self) -> Result<String, ProtocolError> {
        serde_json::to_string(self)
            .map_err(|e| ProtocolError::new(ErrorKind::Canonicalization, e.to_string()))
    }

    /// Decode a commitment; failures are `MalformedProof`.
    pub fn from_json(s: &str) -> Result<Self, ProtocolError> {
        serde_json::from_str(s)
            .map_err(|e| ProtocolError::malformed_proof(format!("invalid commitment: {e}")))
    }
}

/// The hash backend a commitment engine uses.
#[derive(Clone)]
enum Backend {
    Sha256,
    Blake3Keyed([u8; 32]),
}

/// Creates and opens commitments.
#[derive(Clone)]
pub struct CommitmentEngine {
    backend: Backend,
    randomness: Arc<dyn RandomnessSource>,
}

impl CommitmentEngine {
    /// SHA-256 commitments drawing from `randomness`.
    pub fn sha256(randomness: Arc<dyn RandomnessSource>) -> Self {
        Self {
            backend: Backend::Sha256,
            randomness,
        }
    }

    /// Keyed BLAKE3 commitments drawing from `randomness`.
    pub fn blake3_keyed(key: [u8; 32], randomness: Arc<dyn RandomnessSource>) -> Self {
        Self {
            backend: Backend::Blake3Keyed(key),
            randomness,
        }
    }

    /// The engine described by `config`.
    pub fn from_config(
        config: &ProtocolConfig,
        randomness: Arc<dyn RandomnessSource>,
    ) -> Result<Self, ProtocolError> {
        match (config.commitment_algorithm(), config.commitment_key()) {
            (DigestAlgorithm::Sha256, _) => Ok(Self::sha256(randomness)),
            (DigestAlgorithm::Blake3Keyed, Some(key)) => Ok(Self::blake3_keyed(*key, randomness)),
            (DigestAlgorithm::Blake3Keyed, None) => Err(ProtocolError::new(
                ErrorKind::InvalidConfiguration,
                "blake3_keyed commitments require a key",
            )),
        }
    }

    pub fn algorithm(&self) -> DigestAlgorithm {
        match self.backend {
            Backend::Sha256 => DigestAlgorithm::Sha256,
            Backend::Blake3Keyed(_) => DigestAlgorithm::Blake3Keyed,
        }
    }

    /// Commit to `digest` under fresh randomness.
    pub fn commit(&self, digest: &WitnessDigest) -> Result<Commitment, ProtocolError> {
        let randomness: [u8; COMMITMENT_RANDOMNESS_LEN] = random_array(self.randomness.as_ref())?;
        Ok(Commitment {
            hash: self.compute(digest, &randomness),
            randomness,
            timestamp: Timestamp::now(),
        })
    }

    /// Check that `commitment` opens to `digest`.
    pub fn open(&self, commitment: &Commitment, digest: &WitnessDigest) -> Result<(), ProtocolError> {
        if commitment.hash.algorithm != self.algorithm() {
            return Err(ProtocolError::new(
                ErrorKind::CommitmentMismatch,
                format!(
                    "commitment uses {}, engine uses {}",
                    commitment.hash.algorithm,
                    self.algorithm()
                ),
            ));
        }
        let expected = self.compute(digest, &commitment.randomness);
        if expected.ct_eq(&commitment.hash) {
            Ok(())
        } else {
            Err(ProtocolError::new(
                ErrorKind::CommitmentMismatch,
                "witness does not open the commitment",
            ))
        }
    }

    fn compute(&self, digest: &WitnessDigest, randomness: &[u8; 32]) -> ContentDigest {
        match &self.backend {
            Backend::Sha256 => ContentDigest::sha256(
                Sha256Accumulator::tagged(COMMITMENT_TAG)
                    .update(digest.expose_secret())
                    .update(randomness)
                    .finalize(),
            ),
            Backend::Blake3Keyed(key) => ContentDigest::new(
                DigestAlgorithm::Blake3Keyed,
                blake3_keyed(key, COMMITMENT_TAG, &[digest.expose_secret(), randomness]),
            ),
        }
    }
}

impl std::fmt::Debug for CommitmentEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CommitmentEngine({})", self.algorithm())
    }
}
