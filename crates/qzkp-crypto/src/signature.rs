//! # Post-Quantum Signing and Verification
//!
//! CRYSTALS-Dilithium3 (the ML-DSA-65 parameter set) signatures binding a
//! proof's Merkle root and metadata to the prover's key.
//!
//! ## Security Invariant
//!
//! - Signing input MUST be `&CanonicalBytes`; raw bytes cannot be signed,
//!   so prover and verifier always agree on the message encoding.
//! - Private keys are never serialized or logged. `PqKeyPair` does not
//!   implement `Serialize` and its `Debug` output is redacted.
//! - Malformed key or signature encodings are `CryptoError::KeyError`;
//!   a well-formed signature that does not verify is
//!   `CryptoError::VerificationFailed`. Neither panics.
//!
//! ## Serde
//!
//! Public keys and signatures serialize as lowercase hex strings.

use pqcrypto_dilithium::dilithium3;
use pqcrypto_traits::sign::{DetachedSignature as _, PublicKey as _, SecretKey as _};
use qzkp_core::{CanonicalBytes, CryptoError};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Encoded public key length in bytes.
pub fn public_key_len() -> usize {
    dilithium3::public_key_bytes()
}

/// Encoded detached signature length in bytes.
pub fn signature_len() -> usize {
    dilithium3::signature_bytes()
}

/// A Dilithium3 public key.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct PqPublicKey(Vec<u8>);

/// A detached Dilithium3 signature.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct PqSignature(Vec<u8>);

/// A Dilithium3 key pair for signing proofs.
pub struct PqKeyPair {
    public: dilithium3::PublicKey,
    secret: dilithium3::SecretKey,
}

// ---------------------------------------------------------------------------
// PqPublicKey
// ---------------------------------------------------------------------------

impl PqPublicKey {
    /// Parse a public key from its raw encoding.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        dilithium3::PublicKey::from_bytes(bytes)
            .map_err(|e| CryptoError::KeyError(format!("invalid public key: {e:?}")))?;
        Ok(Self(bytes.to_vec()))
    }

    /// The raw encoding.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        qzkp_core::hex::encode(&self.0)
    }

    pub fn from_hex(hex: &str) -> Result<Self, CryptoError> {
        let bytes = qzkp_core::hex::decode(hex).map_err(|e| CryptoError::KeyError(e.to_string()))?;
        Self::from_bytes(&bytes)
    }

    fn to_dilithium(&self) -> Result<dilithium3::PublicKey, CryptoError> {
        dilithium3::PublicKey::from_bytes(&self.0)
            .map_err(|e| CryptoError::KeyError(format!("invalid public key: {e:?}")))
    }
}

impl Serialize for PqPublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for PqPublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        Self::from_hex(&hex).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Debug for PqPublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PqPublicKey({}...)", qzkp_core::hex::prefix(&self.0))
    }
}

// ---------------------------------------------------------------------------
// PqSignature
// ---------------------------------------------------------------------------

impl PqSignature {
    /// Wrap raw signature bytes; the length is checked here, the content at
    /// verification.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        dilithium3::DetachedSignature::from_bytes(bytes)
            .map_err(|e| CryptoError::KeyError(format!("invalid signature encoding: {e:?}")))?;
        Ok(Self(bytes.to_vec()))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        qzkp_core::hex::encode(&self.0)
    }

    pub fn from_hex(hex: &str) -> Result<Self, CryptoError> {
        let bytes = qzkp_core::hex::decode(hex).map_err(|e| CryptoError::KeyError(e.to_string()))?;
        Self::from_bytes(&bytes)
    }
}

impl Serialize for PqSignature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for PqSignature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        Self::from_hex(&hex).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Debug for PqSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PqSignature({}..., {} bytes)", qzkp_core::hex::prefix(&self.0), self.0.len())
    }
}

// ---------------------------------------------------------------------------
// PqKeyPair
// ---------------------------------------------------------------------------

impl PqKeyPair {
    /// Generate a fresh key pair from the OS entropy source.
    pub fn generate() -> Self {
        let (public, secret) = dilithium3::keypair();
        Self { public, secret }
    }

    /// Restore a key pair from raw encodings (e.g. loaded from a key store).
    pub fn from_bytes(public: &[u8], secret: &[u8]) -> Result<Self, CryptoError> {
        let public = dilithium3::PublicKey::from_bytes(public)
            .map_err(|e| CryptoError::KeyError(format!("invalid public key: {e:?}")))?;
        let secret = dilithium3::SecretKey::from_bytes(secret)
            .map_err(|e| CryptoError::KeyError(format!("invalid secret key: {e:?}")))?;
        Ok(Self { public, secret })
    }

    /// The public half.
    pub fn public_key(&self) -> PqPublicKey {
        PqPublicKey(self.public.as_bytes().to_vec())
    }

    /// Sign canonical bytes.
    pub fn sign(&self, data: &CanonicalBytes) -> PqSignature {
        let sig = dilithium3::detached_sign(data.as_bytes(), &self.secret);
        PqSignature(sig.as_bytes().to_vec())
    }
}

impl std::fmt::Debug for PqKeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PqKeyPair(<private>)")
    }
}

// ---------------------------------------------------------------------------
// Verification
// ---------------------------------------------------------------------------

/// Verify a detached signature over canonical bytes.
///
/// `Ok(())` if valid; `KeyError` for malformed encodings;
/// `VerificationFailed` otherwise.
pub fn verify(
    data: &CanonicalBytes,
    signature: &PqSignature,
    public_key: &PqPublicKey,
) -> Result<(), CryptoError> {
    let pk = public_key.to_dilithium()?;
    let sig = dilithium3::DetachedSignature::from_bytes(&signature.0)
        .map_err(|e| CryptoError::KeyError(format!("invalid signature encoding: {e:?}")))?;
    dilithium3::verify_detached_signature(&sig, data.as_bytes(), &pk)
        .map_err(|e| CryptoError::VerificationFailed(format!("Dilithium3 verification failed: {e:?}")))
}
