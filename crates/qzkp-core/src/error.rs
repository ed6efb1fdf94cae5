//! # Error Types: Protocol Error Taxonomy
//!
//! Defines the error types used throughout the qzkp workspace. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - [`ErrorKind`] is the closed, copyable classification every failure maps
//!   to. Verify-time rejections carry exactly one kind (the first failing
//!   check); callers match on it instead of parsing messages.
//! - [`ProtocolError`] pairs a kind with human-readable context. It is the
//!   error type of every public Commit/Prove/Verify operation.
//! - Leaf errors ([`CanonicalizationError`], [`CryptoError`]) convert into
//!   `ProtocolError` with `?`.
//!
//! Error messages never include witness bytes, commitment randomness, share
//! masks or key material.

use std::fmt;

use thiserror::Error;

/// Classification of every protocol failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Security level outside `{32, 64, 80, 96, 128, 256}`.
    InvalidSecurityLevel,
    /// A configuration document is unreadable or inconsistent.
    InvalidConfiguration,
    /// The entropy source failed or was exhausted.
    RandomnessFailure,
    /// The proof (or opening) is not bound to the supplied commitment.
    CommitmentMismatch,
    /// Recomputed challenges differ from the ones in the proof.
    ChallengeMismatch,
    /// The Merkle root recomputed from the responses differs from the proof.
    MerkleRootMismatch,
    /// The signature over `(root, metadata)` does not verify.
    SignatureInvalid,
    /// A response does not open its round commitment.
    ResponseInvalid,
    /// The proof is structurally invalid or cannot be decoded.
    MalformedProof,
    /// Key or signature encoding is malformed, or signing failed.
    SignatureError,
    /// A witness digest of the wrong length was supplied.
    MalformedWitness,
    /// Canonical serialization failed.
    Canonicalization,
}

impl ErrorKind {
    /// Returns the stable identifier of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidSecurityLevel => "InvalidSecurityLevel",
            Self::InvalidConfiguration => "InvalidConfiguration",
            Self::RandomnessFailure => "RandomnessFailure",
            Self::CommitmentMismatch => "CommitmentMismatch",
            Self::ChallengeMismatch => "ChallengeMismatch",
            Self::MerkleRootMismatch => "MerkleRootMismatch",
            Self::SignatureInvalid => "SignatureInvalid",
            Self::ResponseInvalid => "ResponseInvalid",
            Self::MalformedProof => "MalformedProof",
            Self::SignatureError => "SignatureError",
            Self::MalformedWitness => "MalformedWitness",
            Self::Canonicalization => "Canonicalization",
        }
    }

    /// True for kinds that Verify reports as a rejection rather than an error.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::CommitmentMismatch
                | Self::ChallengeMismatch
                | Self::MerkleRootMismatch
                | Self::SignatureInvalid
                | Self::ResponseInvalid
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Top-level error type for Commit, Prove and Verify.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind}: {message}")]
pub struct ProtocolError {
    kind: ErrorKind,
    message: String,
}

impl ProtocolError {
    /// Create an error of the given kind with context.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// The classification of this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The context message.
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn invalid_security_level(bits: impl fmt::Display) -> Self {
        Self::new(
            ErrorKind::InvalidSecurityLevel,
            format!("unsupported security level {bits}; expected one of 32, 64, 80, 96, 128, 256"),
        )
    }

    pub fn malformed_proof(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MalformedProof, message)
    }
}

impl From<CanonicalizationError> for ProtocolError {
    fn from(err: CanonicalizationError) -> Self {
        Self::new(ErrorKind::Canonicalization, err.to_string())
    }
}

impl From<CryptoError> for ProtocolError {
    fn from(err: CryptoError) -> Self {
        let kind = match &err {
            CryptoError::Randomness(_) => ErrorKind::RandomnessFailure,
            CryptoError::VerificationFailed(_) => ErrorKind::SignatureInvalid,
            CryptoError::KeyError(_) => ErrorKind::SignatureError,
            CryptoError::MerkleError(_) => ErrorKind::MalformedProof,
            CryptoError::DigestError(_) => ErrorKind::MalformedProof,
        };
        Self::new(kind, err.to_string())
    }
}

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// Float values are not permitted in canonical representations.
    #[error("float values are not permitted in canonical representations: {0}")]
    FloatRejected(f64),

    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}

/// Error in cryptographic primitives.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// The entropy source failed.
    #[error("randomness source failed: {0}")]
    Randomness(String),

    /// Signature verification failed.
    #[error("signature verification failed: {0}")]
    VerificationFailed(String),

    /// Key or signature parsing failed.
    #[error("key error: {0}")]
    KeyError(String),

    /// Merkle tree construction failed.
    #[error("merkle error: {0}")]
    MerkleError(String),

    /// Digest decoding failed.
    #[error("digest error: {0}")]
    DigestError(String),
}
