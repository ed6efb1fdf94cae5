//! # Proof Transcript
//!
//! The exported proof and its JSON encoding:
//!
//! ```json
//! {
//!   "ProofID": "…",
//!   "Commitments": [{"Index": 0, "Left": "…", "Right": "…"}],
//!   "Challenges":  [{"Index": 0, "Value": 1}],
//!   "Responses":   [{"ChallengeIndex": 0, "Value": "…"}],
//!   "MerkleRoot":  "sha256:…",
//!   "Signature":   "…",
//!   "Metadata":    {"SecurityBits": 128, "ChallengeCount": 128, "CreatedAt": "…Z"}
//! }
//! ```
//!
//! ## Security Invariant
//!
//! No field can hold a `WitnessDigest`: the witness type implements neither
//! `Serialize` nor `Clone`, and every byte field here is a hash, a salt, a
//! masked share or a signature.

use qzkp_core::{
    CanonicalBytes, ContentDigest, ErrorKind, ProofId, ProtocolError, SecurityLevel,
    Sha256Accumulator, Timestamp,
};
use qzkp_crypto::PqSignature;
use serde::{Deserialize, Serialize};

use crate::challenge::Challenge;
use crate::commitment::Commitment;
use crate::response::{Response, RoundCommitment};

const TRANSCRIPT_TAG: &[u8] = b"qzkp/proof-id/v1";

/// Signed proof parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Metadata {
    #[serde(rename = "SecurityBits")]
    pub security_bits: SecurityLevel,
    #[serde(rename = "ChallengeCount")]
    pub challenge_count: usize,
    #[serde(rename = "CreatedAt")]
    pub created_at: Timestamp,
}

impl Metadata {
    pub fn new(level: SecurityLevel) -> Self {
        Self {
            security_bits: level,
            challenge_count: level.challenge_count(),
            created_at: Timestamp::now(),
        }
    }
}

/// A complete non-interactive proof.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Proof {
    #[serde(rename = "ProofID")]
    pub proof_id: ProofId,
    #[serde(rename = "Commitments")]
    pub commitments: Vec<RoundCommitment>,
    #[serde(rename = "Challenges")]
    pub challenges: Vec<Challenge>,
    #[serde(rename = "Responses")]
    pub responses: Vec<Response>,
    #[serde(rename = "MerkleRoot")]
    pub merkle_root: ContentDigest,
    #[serde(rename = "Signature")]
    pub signature: PqSignature,
    #[serde(rename = "Metadata")]
    pub metadata: Metadata,
}

impl Proof {
    pub fn to_json(&self) -> Result<String, ProtocolError> {
        serde_json::to_string(self)
            .map_err(|e| ProtocolError::new(ErrorKind::Canonicalization, e.to_string()))
    }

    pub fn to_json_pretty(&self) -> Result<String, ProtocolError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ProtocolError::new(ErrorKind::Canonicalization, e.to_string()))
    }

    /// Decode a proof. Any decoding failure is `MalformedProof`.
    pub fn from_json(s: &str) -> Result<Self, ProtocolError> {
        serde_json::from_str(s).map_err(|e| ProtocolError::malformed_proof(format!("invalid proof: {e}")))
    }

    pub fn security_level(&self) -> SecurityLevel {
        self.metadata.security_bits
    }
}

/// Merkle leaf preimages: the canonical JSON of each response, in order.
pub(crate) fn response_leaves(responses: &[Response]) -> Result<Vec<CanonicalBytes>, ProtocolError> {
    responses
        .iter()
        .map(|r| CanonicalBytes::new(r).map_err(ProtocolError::from))
        .collect()
}

/// `SHA-256(tag ‖ alg ‖ commitment.hash ‖ len ‖ (index ‖ left ‖ right)*)`, as a v8 UUID.
pub fn transcript_id(commitment: &Commitment, rounds: &[RoundCommitment]) -> ProofId {
    let hash = commitment.hash();
    let acc = Sha256Accumulator::tagged(TRANSCRIPT_TAG)
        .update(hash.algorithm.as_str().as_bytes())
        .update(&hash.bytes)
        .update_u64(rounds.len() as u64);
    let acc = rounds.iter().fold(acc, |acc, rc| {
        acc.update_u64(u64::from(rc.index))
            .update(&rc.left)
            .update(&rc.right)
    });
    ProofId::from_digest(&acc.finalize())
}

#[derive(Serialize)]
struct SigningPayload<'a> {
    merkle_root: &'a ContentDigest,
    metadata: &'a Metadata,
    proof_id: &'a ProofId,
}

/// The canonical message a proof signature covers.
pub fn signing_payload(
    merkle_root: &ContentDigest,
    metadata: &Metadata,
    proof_id: &ProofId,
) -> Result<CanonicalBytes, ProtocolError> {
    Ok(CanonicalBytes::new(&SigningPayload {
        merkle_root,
        metadata,
        proof_id,
    })?)
}
