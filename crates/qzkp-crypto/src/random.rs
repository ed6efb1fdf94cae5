//! # Randomness Sources
//!
//! Commitment randomness, session nonces and the tests' reproducible runs all
//! draw bytes through the [`RandomnessSource`] trait instead of a process-wide
//! generator. Production code injects [`OsRandomness`]; tests inject
//! [`SeededRandomness`] with a fixed seed.
//!
//! ## Security Invariant
//!
//! Every source is `Send + Sync` and safe to share across threads. Failures
//! surface as `CryptoError::Randomness`; no source ever falls back to a weaker
//! generator.

use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use qzkp_core::CryptoError;
use rand::rngs::OsRng;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// A thread-safe source of cryptographically secure bytes.
pub trait RandomnessSource: Send + Sync {
    /// Fill `dest` entirely or fail.
    fn fill(&self, dest: &mut [u8]) -> Result<(), CryptoError>;
}

/// Operating-system CSPRNG (`getrandom`).
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRandomness;

impl RandomnessSource for OsRandomness {
    fn fill(&self, dest: &mut [u8]) -> Result<(), CryptoError> {
        OsRng
            .try_fill_bytes(dest)
            .map_err(|e| CryptoError::Randomness(format!("OS entropy source failed: {e}")))
    }
}

/// Deterministic ChaCha20 stream for reproducible tests.
///
/// Shared use from several threads interleaves draws nondeterministically;
/// reproducibility holds for single-threaded callers.
pub struct SeededRandomness {
    rng: Mutex<ChaCha20Rng>,
}

impl SeededRandomness {
    /// Seed from 32 bytes.
    pub fn from_seed(seed: [u8; 32]) -> Self {
        Self {
            rng: Mutex::new(ChaCha20Rng::from_seed(seed)),
        }
    }

    /// Seed from a `u64`.
    pub fn from_u64(seed: u64) -> Self {
        Self {
            rng: Mutex::new(ChaCha20Rng::seed_from_u64(seed)),
        }
    }
}

impl RandomnessSource for SeededRandomness {
    fn fill(&self, dest: &mut [u8]) -> Result<(), CryptoError> {
        self.rng
            .lock()
            .try_fill_bytes(dest)
            .map_err(|e| CryptoError::Randomness(format!("seeded stream failed: {e}")))
    }
}

impl std::fmt::Debug for SeededRandomness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SeededRandomness(<state>)")
    }
}

/// Wraps a source with a byte budget; once spent, every draw fails.
///
/// Models an exhaustible entropy pool (hardware RNGs, metered HSM draws).
#[derive(Debug)]
pub struct LimitedRandomness<S> {
    inner: S,
    remaining: AtomicUsize,
}

impl<S: RandomnessSource> LimitedRandomness<S> {
    pub fn new(inner: S, budget: usize) -> Self {
        Self {
            inner,
            remaining: AtomicUsize::new(budget),
        }
    }

    /// Bytes still available.
    pub fn remaining(&self) -> usize {
        self.remaining.load(Ordering::SeqCst)
    }
}

impl<S: RandomnessSource> RandomnessSource for LimitedRandomness<S> {
    fn fill(&self, dest: &mut [u8]) -> Result<(), CryptoError> {
        let want = dest.len();
        self.remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(want))
            .map_err(|left| {
                CryptoError::Randomness(format!(
                    "entropy budget exhausted: requested {want} bytes, {left} left"
                ))
            })?;
        self.inner.fill(dest)
    }
}

/// Draw a fixed-size array from a source.
pub fn random_array<const N: usize>(
    source: &dyn RandomnessSource,
) -> Result<[u8; N], CryptoError> {
    let mut out = [0u8; N];
    source.fill(&mut out)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[test]
    fn test_os_randomness_varies() {
        let a: [u8; 32] = random_array(&OsRandomness).unwrap();
        let b: [u8; 32] = random_array(&OsRandomness).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_seeded_is_reproducible() {
        let a = SeededRandomness::from_u64(42);
        let b = SeededRandomness::from_u64(42);
        let xa: [u8; 64] = random_array(&a).unwrap();
        let xb: [u8; 64] = random_array(&b).unwrap();
        assert_eq!(xa, xb);
        let next: [u8; 64] = random_array(&a).unwrap();
        assert_ne!(xa, next);
    }

    #[test]
    fn test_different_seeds_diverge() {
        let a: [u8; 32] = random_array(&SeededRandomness::from_seed([1; 32])).unwrap();
        let b: [u8; 32] = random_array(&SeededRandomness::from_seed([2; 32])).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_limited_randomness_exhausts() {
        let src = LimitedRandomness::new(SeededRandomness::from_u64(1), 40);
        assert!(random_array::<32>(&src).is_ok());
        assert_eq!(src.remaining(), 8);
        let err = random_array::<32>(&src).unwrap_err();
        assert!(matches!(err, CryptoError::Randomness(_)));
        assert_eq!(src.remaining(), 8);
        assert!(random_array::<8>(&src).is_ok());
        assert!(random_array::<1>(&src).is_err());
    }

    #[test]
    fn test_shared_across_threads() {
        let src: Arc<dyn RandomnessSource> = Arc::new(SeededRandomness::from_u64(7));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let src = Arc::clone(&src);
                std::thread::spawn(move || {
                    (0..16)
                        .map(|_| random_array::<32>(src.as_ref()).unwrap())
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        let mut seen = HashSet::new();
        for h in handles {
            for draw in h.join().unwrap() {
                assert!(seen.insert(draw), "duplicate draw across threads");
            }
        }
        assert_eq!(seen.len(), 128);
    }
}
