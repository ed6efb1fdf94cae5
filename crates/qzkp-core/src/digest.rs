//! # Content Digest: Tagged 32-Byte Digests
//!
//! Defines `ContentDigest` and `DigestAlgorithm`, the self-describing digest
//! type carried by commitments and Merkle roots, plus the domain-separated
//! hashing helpers every protocol component builds on.
//!
//! ## Wire Format
//!
//! A digest serializes as `"<algorithm>:<64 lowercase hex chars>"`, e.g.
//! `sha256:44136fa3...`. The algorithm tag lets commitments made with the
//! keyed BLAKE3 backend coexist with SHA-256 ones.
//!
//! ## Domain Separation
//!
//! Every hash in the protocol starts with a distinct tag, fed through
//! [`Sha256Accumulator::tagged`]. Tags are length-prefixed so no tag can be a
//! prefix-collision of another.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::error::CryptoError;

/// The hash algorithm that produced a content digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DigestAlgorithm {
    /// SHA-256.
    #[default]
    Sha256,
    /// BLAKE3 in keyed mode (32-byte key).
    Blake3Keyed,
}

impl DigestAlgorithm {
    /// Returns the algorithm identifier string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
            Self::Blake3Keyed => "blake3-keyed",
        }
    }

    /// Parse an algorithm identifier produced by [`as_str`](Self::as_str).
    pub fn parse(s: &str) -> Result<Self, CryptoError> {
        match s {
            "sha256" => Ok(Self::Sha256),
            "blake3-keyed" => Ok(Self::Blake3Keyed),
            other => Err(CryptoError::DigestError(format!(
                "unknown digest algorithm {other:?}"
            ))),
        }
    }
}

impl std::fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A 32-byte digest with its algorithm tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentDigest {
    /// The hash algorithm that produced this digest.
    pub algorithm: DigestAlgorithm,
    /// The raw 32-byte digest value.
    pub bytes: [u8; 32],
}

impl ContentDigest {
    /// Create a new content digest from raw bytes and algorithm.
    pub fn new(algorithm: DigestAlgorithm, bytes: [u8; 32]) -> Self {
        Self { algorithm, bytes }
    }

    /// Shorthand for a SHA-256 digest.
    pub fn sha256(bytes: [u8; 32]) -> Self {
        Self::new(DigestAlgorithm::Sha256, bytes)
    }

    /// Render the digest as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        crate::hex::encode(&self.bytes)
    }

    /// Parse the `"<algorithm>:<hex>"` form produced by `Display`.
    pub fn parse(s: &str) -> Result<Self, CryptoError> {
        let (alg, hex) = s
            .split_once(':')
            .ok_or_else(|| CryptoError::DigestError(format!("missing algorithm prefix in {s:?}")))?;
        let algorithm = DigestAlgorithm::parse(alg)?;
        let bytes = crate::hex::decode_array::<32>(hex)?;
        Ok(Self::new(algorithm, bytes))
    }

    /// Constant-time equality over algorithm and bytes.
    pub fn ct_eq(&self, other: &Self) -> bool {
        self.algorithm == other.algorithm && bool::from(self.bytes.ct_eq(&other.bytes))
    }
}

impl std::fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.algorithm, self.to_hex())
    }
}

impl Serialize for ContentDigest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ContentDigest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Incremental SHA-256 with a leading domain tag.
///
/// ```
/// use qzkp_core::Sha256Accumulator;
/// let d = Sha256Accumulator::tagged(b"qzkp/example").update(b"payload").finalize();
/// assert_eq!(d.len(), 32);
/// ```
#[derive(Clone)]
pub struct Sha256Accumulator(Sha256);

impl Sha256Accumulator {
    /// Start a hash over `len(tag) ‖ tag`.
    pub fn tagged(tag: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update((tag.len() as u32).to_be_bytes());
        hasher.update(tag);
        Self(hasher)
    }

    /// Absorb more bytes.
    pub fn update(mut self, data: &[u8]) -> Self {
        self.0.update(data);
        self
    }

    /// Absorb a big-endian `u64`.
    pub fn update_u64(self, value: u64) -> Self {
        self.update(&value.to_be_bytes())
    }

    /// Finish and return the raw digest.
    pub fn finalize(self) -> [u8; 32] {
        self.0.finalize().into()
    }
}

/// Keyed BLAKE3 over `len(tag) ‖ tag ‖ parts...`.
pub fn blake3_keyed(key: &[u8; 32], tag: &[u8], parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = blake3::Hasher::new_keyed(key);
    hasher.update(&(tag.len() as u32).to_be_bytes());
    hasher.update(tag);
    for part in parts {
        hasher.update(part);
    }
    *hasher.finalize().as_bytes()
}
