//! Shared fixtures for the protocol integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use qzkp_core::WitnessDigest;
use qzkp_crypto::{PqKeyPair, RandomnessSource, SeededRandomness};
use qzkp_protocol::{ProofEngine, ProtocolConfig};

pub fn engine(bits: u32) -> ProofEngine {
    ProofEngine::new(ProtocolConfig::configure(bits).unwrap(), PqKeyPair::generate()).unwrap()
}

pub fn engine_with(config: ProtocolConfig, randomness: Arc<dyn RandomnessSource>) -> ProofEngine {
    ProofEngine::with_randomness(config, PqKeyPair::generate(), randomness).unwrap()
}

/// Deterministic pseudo-random witness digests.
pub fn witnesses(seed: u64, n: usize) -> Vec<[u8; 32]> {
    let src = SeededRandomness::from_u64(seed);
    (0..n)
        .map(|_| {
            let mut w = [0u8; 32];
            src.fill(&mut w).unwrap();
            w
        })
        .collect()
}

pub fn witness(bytes: [u8; 32]) -> WitnessDigest {
    WitnessDigest::new(bytes)
}

/// Regression aid: does `haystack` contain the witness as raw bytes or as
/// lowercase/uppercase hex?
pub fn contains_witness(haystack: &[u8], witness: &[u8; 32]) -> bool {
    let lower = qzkp_core::hex::encode(witness);
    let upper = lower.to_uppercase();
    haystack.windows(32).any(|w| w == witness)
        || contains(haystack, lower.as_bytes())
        || contains(haystack, upper.as_bytes())
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}
