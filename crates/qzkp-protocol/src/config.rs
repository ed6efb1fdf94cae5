//! # Protocol Configuration
//!
//! Security level, commitment hash backend and challenge mode for a
//! prover/verifier pair. Loadable from JSON or YAML; every constructor
//! validates, so a `ProtocolConfig` value in hand is always usable.
//!
//! ```yaml
//! security_bits: 128
//! commitment_algorithm: blake3_keyed
//! commitment_key_hex: "0101010101010101010101010101010101010101010101010101010101010101"
//! challenge_mode: fiat_shamir
//! parallel: true
//! ```

use qzkp_core::{DigestAlgorithm, ErrorKind, ProtocolError, SecurityLevel};
use serde::{Deserialize, Serialize};

/// How challenges reach the prover and verifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChallengeMode {
    /// Derived from `H(commitment.hash ‖ proof_id)`.
    #[default]
    FiatShamir,
    /// Supplied by an external verifier per proof.
    Interactive,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    security_bits: u32,
    #[serde(default)]
    commitment_algorithm: DigestAlgorithm,
    #[serde(default)]
    commitment_key_hex: Option<String>,
    #[serde(default)]
    challenge_mode: ChallengeMode,
    #[serde(default = "default_parallel")]
    parallel: bool,
}

fn default_parallel() -> bool {
    true
}

/// Validated protocol configuration.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct ProtocolConfig {
    security_bits: SecurityLevel,
    commitment_algorithm: DigestAlgorithm,
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "serialize_key")]
    commitment_key_hex: Option<[u8; 32]>,
    challenge_mode: ChallengeMode,
    parallel: bool,
}

fn serialize_key<S: serde::Serializer>(key: &Option<[u8; 32]>, s: S) -> Result<S::Ok, S::Error> {
    match key {
        Some(k) => s.serialize_str(&qzkp_core::hex::encode(k)),
        None => s.serialize_none(),
    }
}

impl ProtocolConfig {
    /// SHA-256 commitments, Fiat–Shamir challenges, parallel responses.
    ///
    /// Fails with `InvalidSecurityLevel` for anything outside
    /// `{32, 64, 80, 96, 128, 256}`.
    pub fn configure(bits: u32) -> Result<Self, ProtocolError> {
        Ok(Self::for_level(SecurityLevel::try_from(bits)?))
    }

    pub fn for_level(level: SecurityLevel) -> Self {
        Self {
            security_bits: level,
            commitment_algorithm: DigestAlgorithm::Sha256,
            commitment_key_hex: None,
            challenge_mode: ChallengeMode::FiatShamir,
            parallel: true,
        }
    }

    /// Switch commitments to keyed BLAKE3.
    pub fn with_blake3_key(mut self, key: [u8; 32]) -> Self {
        self.commitment_algorithm = DigestAlgorithm::Blake3Keyed;
        self.commitment_key_hex = Some(key);
        self
    }

    pub fn with_challenge_mode(mut self, mode: ChallengeMode) -> Self {
        self.challenge_mode = mode;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn from_json_str(s: &str) -> Result<Self, ProtocolError> {
        let raw: RawConfig = serde_json::from_str(s).map_err(config_error)?;
        Self::from_raw(raw)
    }

    pub fn from_yaml_str(s: &str) -> Result<Self, ProtocolError> {
        let raw: RawConfig = serde_yaml::from_str(s).map_err(config_error)?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawConfig) -> Result<Self, ProtocolError> {
        let level = SecurityLevel::try_from(raw.security_bits)?;
        let key = match (raw.commitment_algorithm, raw.commitment_key_hex) {
            (DigestAlgorithm::Sha256, None) => None,
            (DigestAlgorithm::Sha256, Some(_)) => {
                return Err(config_invalid(
                    "commitment_key_hex is only valid with commitment_algorithm blake3_keyed",
                ))
            }
            (DigestAlgorithm::Blake3Keyed, None) => {
                return Err(config_invalid("blake3_keyed commitments require commitment_key_hex"))
            }
            (DigestAlgorithm::Blake3Keyed, Some(hex)) => Some(
                qzkp_core::hex::decode_array::<32>(&hex)
                    .map_err(|e| config_invalid(format!("commitment_key_hex: {e}")))?,
            ),
        };
        Ok(Self {
            security_bits: level,
            commitment_algorithm: raw.commitment_algorithm,
            commitment_key_hex: key,
            challenge_mode: raw.challenge_mode,
            parallel: raw.parallel,
        })
    }

    pub fn security_level(&self) -> SecurityLevel {
        self.security_bits
    }

    /// Number of challenge rounds `k`.
    pub fn challenge_count(&self) -> usize {
        self.security_bits.challenge_count()
    }

    pub fn commitment_algorithm(&self) -> DigestAlgorithm {
        self.commitment_algorithm
    }

    pub(crate) fn commitment_key(&self) -> Option<&[u8; 32]> {
        self.commitment_key_hex.as_ref()
    }

    pub fn challenge_mode(&self) -> ChallengeMode {
        self.challenge_mode
    }

    pub fn parallel(&self) -> bool {
        self.parallel
    }
}

impl std::fmt::Debug for ProtocolConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProtocolConfig")
            .field("security_bits", &self.security_bits.bits())
            .field("commitment_algorithm", &self.commitment_algorithm)
            .field("commitment_key", &self.commitment_key_hex.map(|_| "<redacted>"))
            .field("challenge_mode", &self.challenge_mode)
            .field("parallel", &self.parallel)
            .finish()
    }
}

fn config_error(e: impl std::fmt::Display) -> ProtocolError {
    config_invalid(format!("cannot parse protocol config: {e}"))
}

fn config_invalid(msg: impl Into<String>) -> ProtocolError {
    ProtocolError::new(ErrorKind::InvalidConfiguration, msg)
}
