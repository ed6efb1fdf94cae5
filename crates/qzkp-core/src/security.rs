//! # Security Levels and Soundness Mapping
//!
//! The protocol runs `k` independent binary-challenge repetitions, with `k`
//! equal to the security level in bits. A transcript whose rounds can each be
//! opened on one side only survives a round with probability 1/2, so the
//! cut-and-choose error after `k` rounds is `2^-k`.
//!
//! That figure bounds transcripts committed before their challenges. It is
//! not a knowledge bound: commitments are hash-only, so the opened shares are
//! never checked against the committed digest, and a signer can prove a
//! commitment without its witness. Acceptance attests to the holder of the
//! verifier's trusted signing key.
//!
//! Security levels form a closed set. [`SecurityLevel::try_from`] is the
//! only place an integer is checked; everything downstream takes the enum.

use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;

/// One of the six supported security levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum SecurityLevel {
    Bits32,
    Bits64,
    Bits80,
    Bits96,
    Bits128,
    Bits256,
}

impl SecurityLevel {
    /// All supported levels, ascending.
    pub const ALL: [SecurityLevel; 6] = [
        Self::Bits32,
        Self::Bits64,
        Self::Bits80,
        Self::Bits96,
        Self::Bits128,
        Self::Bits256,
    ];

    /// The level in bits.
    pub fn bits(&self) -> u32 {
        match self {
            Self::Bits32 => 32,
            Self::Bits64 => 64,
            Self::Bits80 => 80,
            Self::Bits96 => 96,
            Self::Bits128 => 128,
            Self::Bits256 => 256,
        }
    }

    /// Number of challenge repetitions `k` for this level.
    pub fn challenge_count(&self) -> usize {
        self.bits() as usize
    }

    /// Cut-and-choose error `2^-k` for this level.
    pub fn soundness_error(&self) -> f64 {
        soundness_error_for_challenges(self.challenge_count())
    }
}

impl TryFrom<u32> for SecurityLevel {
    type Error = ProtocolError;

    fn try_from(bits: u32) -> Result<Self, Self::Error> {
        match bits {
            32 => Ok(Self::Bits32),
            64 => Ok(Self::Bits64),
            80 => Ok(Self::Bits80),
            96 => Ok(Self::Bits96),
            128 => Ok(Self::Bits128),
            256 => Ok(Self::Bits256),
            other => Err(ProtocolError::invalid_security_level(other)),
        }
    }
}

impl From<SecurityLevel> for u32 {
    fn from(level: SecurityLevel) -> Self {
        level.bits()
    }
}

impl std::fmt::Display for SecurityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-bit", self.bits())
    }
}

/// Map a security level in bits to the challenge count `k`.
///
/// Identity over `{32, 64, 80, 96, 128, 256}`; anything else fails with
/// `InvalidSecurityLevel`.
pub fn challenges_for_security_bits(bits: u32) -> Result<usize, ProtocolError> {
    SecurityLevel::try_from(bits).map(|level| level.challenge_count())
}

/// Cut-and-choose error `2^-k` for `k` binary-challenge repetitions.
///
/// Powers of two are exact in binary floating point for every `k` up to
/// 1074, so the result equals the mathematical value.
pub fn soundness_error_for_challenges(k: usize) -> f64 {
    let exp = i32::try_from(k).unwrap_or(i32::MAX);
    0.5f64.powi(exp)
}
