//! # Witness Digest
//!
//! The prover's secret: a fixed-length 32-byte digest produced by an
//! external encoder.
//!
//! ## Security Invariant
//!
//! `WitnessDigest` implements neither `Serialize`, `Display` nor `Clone`,
//! and its `Debug` output is redacted. No exported protocol structure can
//! therefore hold one, which makes transcript non-inclusion a type-level
//! property. The bytes are zeroized on drop.

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{ErrorKind, ProtocolError};

/// Length of a witness digest in bytes.
pub const WITNESS_DIGEST_LEN: usize = 32;

/// A 32-byte secret witness digest.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct WitnessDigest([u8; WITNESS_DIGEST_LEN]);

impl WitnessDigest {
    /// Wrap a 32-byte array.
    pub fn new(bytes: [u8; WITNESS_DIGEST_LEN]) -> Self {
        Self(bytes)
    }

    /// Copy a witness from a slice, which must be exactly 32 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ProtocolError> {
        let arr: [u8; WITNESS_DIGEST_LEN] = bytes.try_into().map_err(|_| {
            ProtocolError::new(
                ErrorKind::MalformedWitness,
                format!(
                    "witness digest must be {WITNESS_DIGEST_LEN} bytes, got {}",
                    bytes.len()
                ),
            )
        })?;
        Ok(Self(arr))
    }

    /// Borrow the secret bytes. Only hashing and share-splitting code
    /// should call this.
    pub fn expose_secret(&self) -> &[u8; WITNESS_DIGEST_LEN] {
        &self.0
    }

    /// Explicit duplicate for custody maps.
    pub fn duplicate(&self) -> Self {
        Self(self.0)
    }
}

impl std::fmt::Debug for WitnessDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("WitnessDigest(<redacted>)")
    }
}
