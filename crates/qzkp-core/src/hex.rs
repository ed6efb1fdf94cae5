//! # Hex Encoding
//!
//! Lowercase hex helpers shared by every wire type (no external hex crate
//! dependency), plus serde adapters for byte fields.

use crate::error::CryptoError;

/// Render bytes as lowercase hex.
pub fn encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Decode a hex string (either case) into bytes.
///
/// Only `[0-9a-fA-F]` is accepted: no sign, whitespace or prefix.
pub fn decode(hex: &str) -> Result<Vec<u8>, CryptoError> {
    let bytes = hex.as_bytes();
    if let Some(i) = bytes.iter().position(|b| !b.is_ascii_hexdigit()) {
        return Err(CryptoError::DigestError(format!(
            "invalid hex character at position {i}"
        )));
    }
    if bytes.len() % 2 != 0 {
        return Err(CryptoError::DigestError(
            "hex string must have even length".to_string(),
        ));
    }
    Ok(bytes
        .chunks_exact(2)
        .map(|pair| (nibble(pair[0]) << 4) | nibble(pair[1]))
        .collect())
}

fn nibble(c: u8) -> u8 {
    match c {
        b'0'..=b'9' => c - b'0',
        b'a'..=b'f' => c - b'a' + 10,
        _ => c - b'A' + 10,
    }
}

/// Decode a hex string into a fixed-size array.
pub fn decode_array<const N: usize>(hex: &str) -> Result<[u8; N], CryptoError> {
    let bytes = decode(hex)?;
    if bytes.len() != N {
        return Err(CryptoError::DigestError(format!(
            "expected {} hex chars, got {}",
            N * 2,
            hex.len()
        )));
    }
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes);
    Ok(out)
}

/// First four bytes as hex, for `Debug` output.
pub fn prefix(bytes: &[u8]) -> String {
    encode(&bytes[..bytes.len().min(4)])
}

/// Serde adapter: `Vec<u8>` as a lowercase hex string.
pub mod serde_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        super::decode(&s).map_err(serde::de::Error::custom)
    }
}

/// Serde adapter: `[u8; 32]` as a 64-char lowercase hex string.
pub mod serde_array32 {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8; 32], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<[u8; 32], D::Error> {
        let s = String::deserialize(deserializer)?;
        super::decode_array::<32>(&s).map_err(serde::de::Error::custom)
    }
}
