//! # Response Generator
//!
//! Cut-and-choose opening of XOR secret shares. For each proof the prover
//! draws a 32-byte session nonce `n` and derives a session key
//!
//! ```text
//! K       = SHA-256(tag ‖ digest ‖ commitment.randomness ‖ n)
//! mask_i  = PRF(K, "mask", i)      s0_i = mask_i
//! salt0_i = PRF(K, "salt0", i)     s1_i = digest ⊕ mask_i
//! salt1_i = PRF(K, "salt1", i)
//! left_i  = H(0x10 ‖ r ‖ i ‖ salt0_i ‖ s0_i)
//! right_i = H(0x11 ‖ r ‖ i ‖ salt1_i ‖ s1_i)
//! ```
//!
//! Round commitments `(left_i, right_i)` are published before challenges
//! exist. The response to bit `c_i` is `salt_c ‖ s_c`, 64 bytes, which the
//! verifier checks against `left_i` or `right_i`.
//!
//! ## Security Invariant
//!
//! - Each revealed share is a uniformly masked value; a single response is
//!   simulatable without the digest.
//! - Openings are checked against round commitments only. Nothing ties
//!   `s0 ⊕ s1` to the committed digest, so a session started from any
//!   digest produces openings that check.
//! - Share splitting is a branch-free XOR. Branch selection depends only on
//!   the public challenge bit.
//! - Session keys, masks and salts are zeroized when dropped.

use qzkp_core::{Sha256Accumulator, WitnessDigest};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::challenge::Challenge;
use crate::commitment::Commitment;

/// Length of one response: 32-byte salt followed by a 32-byte share.
pub const RESPONSE_LEN: usize = 64;

const SESSION_TAG: &[u8] = b"qzkp/response-session/v1";
const PRF_TAG: &[u8] = b"qzkp/response-prf/v1";
const SHARE_TAG: &[u8] = b"qzkp/share-commitment/v1";
const LEFT_PREFIX: u8 = 0x10;
const RIGHT_PREFIX: u8 = 0x11;

/// The two share commitments of one repetition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoundCommitment {
    #[serde(rename = "Index")]
    pub index: u32,
    #[serde(rename = "Left", with = "qzkp_core::hex::serde_array32")]
    pub left: [u8; 32],
    #[serde(rename = "Right", with = "qzkp_core::hex::serde_array32")]
    pub right: [u8; 32],
}

/// The opening of the share a challenge selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Response {
    #[serde(rename = "ChallengeIndex")]
    pub challenge_index: u32,
    #[serde(rename = "Value", with = "qzkp_core::hex::serde_bytes")]
    pub value: Vec<u8>,
}

/// One round's secret material.
#[derive(Zeroize, ZeroizeOnDrop)]
struct RoundShares {
    salts: [[u8; 32]; 2],
    shares: [[u8; 32]; 2],
}

/// Per-proof prover state: the session key plus what share splitting needs.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ResponseSession {
    key: [u8; 32],
    digest: [u8; 32],
    randomness: [u8; 32],
}

impl ResponseSession {
    /// Start a session for `digest` under `commitment` with a fresh `nonce`.
    pub fn new(digest: &WitnessDigest, commitment: &Commitment, nonce: &[u8; 32]) -> Self {
        let key = Sha256Accumulator::tagged(SESSION_TAG)
            .update(digest.expose_secret())
            .update(commitment.randomness())
            .update(nonce)
            .finalize();
        Self {
            key,
            digest: *digest.expose_secret(),
            randomness: *commitment.randomness(),
        }
    }

    fn prf(&self, label: &[u8], index: u32) -> [u8; 32] {
        Sha256Accumulator::tagged(PRF_TAG)
            .update(&self.key)
            .update(label)
            .update_u64(u64::from(index))
            .finalize()
    }

    fn round(&self, index: u32) -> RoundShares {
        let mask = self.prf(b"mask", index);
        let mut other = [0u8; 32];
        for (o, (d, m)) in other.iter_mut().zip(self.digest.iter().zip(mask.iter())) {
            *o = d ^ m;
        }
        RoundShares {
            salts: [self.prf(b"salt0", index), self.prf(b"salt1", index)],
            shares: [mask, other],
        }
    }

    /// The published commitment pair for round `index`.
    pub fn round_commitment(&self, index: u32) -> RoundCommitment {
        let round = self.round(index);
        RoundCommitment {
            index,
            left: share_commitment(0, &self.randomness, index, &round.salts[0], &round.shares[0]),
            right: share_commitment(1, &self.randomness, index, &round.salts[1], &round.shares[1]),
        }
    }

    /// Open the share selected by `challenge`.
    ///
    /// Deterministic in (session, challenge).
    pub fn respond(&self, challenge: &Challenge) -> Response {
        let round = self.round(challenge.index);
        let branch = usize::from(challenge.value & 1);
        let mut value = Vec::with_capacity(RESPONSE_LEN);
        value.extend_from_slice(&round.salts[branch]);
        value.extend_from_slice(&round.shares[branch]);
        Response {
            challenge_index: challenge.index,
            value,
        }
    }

    /// Round commitments for rounds `0..k`.
    pub fn round_commitments(&self, k: usize, parallel: bool) -> Vec<RoundCommitment> {
        if parallel {
            (0..k as u32)
                .into_par_iter()
                .map(|i| self.round_commitment(i))
                .collect()
        } else {
            (0..k as u32).map(|i| self.round_commitment(i)).collect()
        }
    }

    /// Responses to every challenge, in challenge order.
    pub fn respond_all(&self, challenges: &[Challenge], parallel: bool) -> Vec<Response> {
        if parallel {
            challenges.par_iter().map(|c| self.respond(c)).collect()
        } else {
            challenges.iter().map(|c| self.respond(c)).collect()
        }
    }
}

impl std::fmt::Debug for ResponseSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ResponseSession(<secret>)")
    }
}

/// `H(tag ‖ (0x10 | bit) ‖ r ‖ index ‖ salt ‖ share)`.
pub fn share_commitment(
    bit: u8,
    randomness: &[u8; 32],
    index: u32,
    salt: &[u8; 32],
    share: &[u8; 32],
) -> [u8; 32] {
    let prefix = if bit == 0 { LEFT_PREFIX } else { RIGHT_PREFIX };
    Sha256Accumulator::tagged(SHARE_TAG)
        .update(&[prefix])
        .update(randomness)
        .update_u64(u64::from(index))
        .update(salt)
        .update(share)
        .finalize()
}

/// Check that `response` opens the side of `round` selected by `challenge`.
///
/// Callers validate widths and indices first; a wrong-width response is
/// simply reported as not opening.
pub fn check_response(
    randomness: &[u8; 32],
    round: &RoundCommitment,
    challenge: &Challenge,
    response: &Response,
) -> bool {
    if response.value.len() != RESPONSE_LEN
        || response.challenge_index != challenge.index
        || round.index != challenge.index
    {
        return false;
    }
    let mut salt = [0u8; 32];
    let mut share = [0u8; 32];
    salt.copy_from_slice(&response.value[..32]);
    share.copy_from_slice(&response.value[32..]);
    let bit = challenge.value & 1;
    let recomputed = share_commitment(bit, randomness, challenge.index, &salt, &share);
    let expected = if bit == 0 { &round.left } else { &round.right };
    bool::from(recomputed.ct_eq(expected))
}
