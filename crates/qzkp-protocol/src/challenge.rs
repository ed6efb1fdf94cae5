//! # Challenge Scheduler
//!
//! Turns a 32-byte seed into `k` one-bit challenges.
//!
//! ```text
//! seed      = SHA-256(tag_seed ‖ alg(commitment.hash) ‖ commitment.hash ‖ proof_id)
//! block_j   = SHA-256(tag_expand ‖ seed ‖ j_be64)
//! bit_i     = (block_{i / 256}[(i % 256) / 8] >> (i % 8)) & 1
//! ```
//!
//! [`generate`] is a pure function of the seed, so prover and verifier derive
//! identical challenges without exchanging them. How challenges reach the
//! orchestrator is decided by a [`ChallengeSource`]: [`FiatShamir`] derives
//! them, [`Supplied`] hands back externally chosen ones after validation.

use qzkp_core::{
    challenges_for_security_bits, ContentDigest, ErrorKind, ProofId, ProtocolError,
    SecurityLevel, Sha256Accumulator,
};
use qzkp_crypto::RandomnessSource;
use serde::{Deserialize, Serialize};

const SEED_TAG: &[u8] = b"qzkp/challenge-seed/v1";
const EXPAND_TAG: &[u8] = b"qzkp/challenge-expand/v1";

/// One challenge bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Challenge {
    #[serde(rename = "Index")]
    pub index: u32,
    /// 0 or 1.
    #[serde(rename = "Value")]
    pub value: u8,
}

/// `SHA-256(tag ‖ commitment hash ‖ proof id)`.
pub fn derive_seed(commitment_hash: &ContentDigest, proof_id: &ProofId) -> [u8; 32] {
    Sha256Accumulator::tagged(SEED_TAG)
        .update(commitment_hash.algorithm.as_str().as_bytes())
        .update(&commitment_hash.bytes)
        .update(proof_id.as_bytes())
        .finalize()
}

/// Expand `seed` into `k` challenge bits.
///
/// `k` must be one of the supported security levels.
pub fn generate(k: usize, seed: &[u8; 32]) -> Result<Vec<Challenge>, ProtocolError> {
    let bits = u32::try_from(k).map_err(|_| ProtocolError::invalid_security_level(k))?;
    let k = challenges_for_security_bits(bits)?;

    let mut challenges = Vec::with_capacity(k);
    let mut block = [0u8; 32];
    for i in 0..k {
        if i % 256 == 0 {
            block = Sha256Accumulator::tagged(EXPAND_TAG)
                .update(seed)
                .update_u64((i / 256) as u64)
                .finalize();
        }
        let within = i % 256;
        let value = (block[within / 8] >> (within % 8)) & 1;
        challenges.push(Challenge {
            index: i as u32,
            value,
        });
    }
    Ok(challenges)
}

/// Where a proof's challenges come from.
pub trait ChallengeSource: Send + Sync {
    /// Produce the `level.challenge_count()` challenges for a proof whose
    /// Fiat–Shamir seed is `seed`.
    fn challenges(
        &self,
        level: SecurityLevel,
        seed: &[u8; 32],
    ) -> Result<Vec<Challenge>, ProtocolError>;
}

/// Non-interactive challenges derived from the seed.
#[derive(Debug, Clone, Copy, Default)]
pub struct FiatShamir;

impl ChallengeSource for FiatShamir {
    fn challenges(
        &self,
        level: SecurityLevel,
        seed: &[u8; 32],
    ) -> Result<Vec<Challenge>, ProtocolError> {
        generate(level.challenge_count(), seed)
    }
}

/// Challenges chosen by an interactive verifier.
///
/// The seed is ignored. Count, index order and bit range are checked on
/// every use. A verifier draws them only after the prover has published its
/// round commitments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Supplied {
    challenges: Vec<Challenge>,
}

impl Supplied {
    pub fn new(challenges: Vec<Challenge>) -> Self {
        Self { challenges }
    }

    /// Build from raw bits, indexed in order.
    pub fn from_bits(bits: &[u8]) -> Self {
        Self::new(
            bits.iter()
                .enumerate()
                .map(|(i, &value)| Challenge {
                    index: i as u32,
                    value,
                })
                .collect(),
        )
    }

    /// Draw `level.challenge_count()` fresh bits from `randomness`.
    pub fn draw(
        level: SecurityLevel,
        randomness: &dyn RandomnessSource,
    ) -> Result<Self, ProtocolError> {
        let mut bytes = vec![0u8; level.challenge_count().div_ceil(8)];
        randomness.fill(&mut bytes)?;
        let bits: Vec<u8> = (0..level.challenge_count())
            .map(|i| (bytes[i / 8] >> (i % 8)) & 1)
            .collect();
        Ok(Self::from_bits(&bits))
    }

    pub fn as_slice(&self) -> &[Challenge] {
        &self.challenges
    }

    /// The challenges, after checking them against `level`.
    pub fn validated(&self, level: SecurityLevel) -> Result<Vec<Challenge>, ProtocolError> {
        let k = level.challenge_count();
        if self.challenges.len() != k {
            return Err(ProtocolError::new(
                ErrorKind::ChallengeMismatch,
                format!(
                    "{} supplied challenges, {level} requires {k}",
                    self.challenges.len()
                ),
            ));
        }
        for (i, c) in self.challenges.iter().enumerate() {
            if c.index as usize != i {
                return Err(ProtocolError::new(
                    ErrorKind::ChallengeMismatch,
                    format!("supplied challenge at position {i} has index {}", c.index),
                ));
            }
            if c.value > 1 {
                return Err(ProtocolError::new(
                    ErrorKind::ChallengeMismatch,
                    format!("supplied challenge {i} has non-bit value {}", c.value),
                ));
            }
        }
        Ok(self.challenges.clone())
    }
}

impl ChallengeSource for Supplied {
    fn challenges(
        &self,
        level: SecurityLevel,
        _seed: &[u8; 32],
    ) -> Result<Vec<Challenge>, ProtocolError> {
        self.validated(level)
    }
}
