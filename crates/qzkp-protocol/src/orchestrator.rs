//! # Protocol Orchestrator
//!
//! Sequences commitment, challenge derivation, responses, Merkle aggregation
//! and signing into `prove`, and the matching checks into `verify`.
//!
//! ## Prove
//!
//! `Init → Committed → ChallengesDerived → Responded → Aggregated → Signed → Finalized`
//!
//! Any failure aborts with that step's error; no partial proof is returned.
//!
//! ## Verify
//!
//! `ReceivedProof → ChallengesRecomputed → MerkleRootRecomputed →
//! SignatureChecked → ResponsesChecked → Accepted | Rejected`
//!
//! Structural problems are `Err(MalformedProof)`. Every later check
//! short-circuits into `Ok(Verdict::Rejected(kind))` with the first failing
//! kind. Verify reads its inputs only and is idempotent.
//!
//! ## Interactive proofs
//!
//! [`Prover::begin_interactive`] fixes and publishes the round commitments
//! and returns an [`InteractiveProof`]. Only then does the verifier draw
//! challenges ([`Verifier::issue_challenges`]), which
//! [`InteractiveProof::finish`] answers.
//!
//! ## Witness custody
//!
//! `prove(commitment)` takes no witness, so the [`Prover`] keeps the witness
//! for each commitment it issued, keyed by commitment hash, until that
//! commitment is proved. A successful `prove` or `begin_interactive` takes
//! the entry out; a failed one puts it back. [`Prover::forget`] drops an
//! entry early. Witnesses are zeroized whenever an entry goes away.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use qzkp_core::{ContentDigest, CryptoError, ErrorKind, ProofId, ProtocolError, WitnessDigest};
use qzkp_crypto::{
    random_array, signature, MerkleTree, OsRandomness, PqKeyPair, PqPublicKey, RandomnessSource,
};
use tracing::{debug, warn};

use crate::challenge::{derive_seed, Challenge, ChallengeSource, FiatShamir, Supplied};
use crate::commitment::{Commitment, CommitmentEngine};
use crate::config::{ChallengeMode, ProtocolConfig};
use crate::proof::{response_leaves, signing_payload, transcript_id, Metadata, Proof};
use crate::response::{check_response, ResponseSession, RoundCommitment, RESPONSE_LEN};
use crate::traits::ProofSystem;

/// Prover progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProveState {
    Init,
    Committed,
    ChallengesDerived,
    Responded,
    Aggregated,
    Signed,
    Finalized,
}

/// Verifier progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyState {
    ReceivedProof,
    ChallengesRecomputed,
    MerkleRootRecomputed,
    SignatureChecked,
    ResponsesChecked,
    Accepted,
    Rejected,
}

/// Outcome of verifying a well-formed proof.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accepted,
    /// The first check that failed.
    Rejected(ErrorKind),
}

impl Verdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }

    pub fn rejection(&self) -> Option<ErrorKind> {
        match self {
            Self::Accepted => None,
            Self::Rejected(kind) => Some(*kind),
        }
    }
}

// ---------------------------------------------------------------------------
// Prover
// ---------------------------------------------------------------------------

/// Issues commitments and proofs under one signing key.
pub struct Prover {
    config: ProtocolConfig,
    engine: CommitmentEngine,
    randomness: Arc<dyn RandomnessSource>,
    keypair: PqKeyPair,
    custody: RwLock<HashMap<ContentDigest, WitnessDigest>>,
}

impl Prover {
    /// A prover drawing from the operating system CSPRNG.
    pub fn new(config: ProtocolConfig, keypair: PqKeyPair) -> Result<Self, ProtocolError> {
        Self::with_randomness(config, keypair, Arc::new(OsRandomness))
    }

    pub fn with_randomness(
        config: ProtocolConfig,
        keypair: PqKeyPair,
        randomness: Arc<dyn RandomnessSource>,
    ) -> Result<Self, ProtocolError> {
        let engine = CommitmentEngine::from_config(&config, Arc::clone(&randomness))?;
        Ok(Self {
            config,
            engine,
            randomness,
            keypair,
            custody: RwLock::new(HashMap::new()),
        })
    }

    pub fn config(&self) -> &ProtocolConfig {
        &self.config
    }

    pub fn public_key(&self) -> PqPublicKey {
        self.keypair.public_key()
    }

    /// Commit to `digest` and keep it in custody for a later `prove`.
    pub fn commit(&self, digest: &WitnessDigest) -> Result<Commitment, ProtocolError> {
        let commitment = self.engine.commit(digest)?;
        self.custody
            .write()
            .insert(*commitment.hash(), digest.duplicate());
        debug!(commitment = %commitment.hash(), "commitment issued");
        Ok(commitment)
    }

    /// Prove a commitment this prover issued, releasing its witness.
    ///
    /// Unknown or already proved commitments fail with `CommitmentMismatch`.
    pub fn prove(&self, commitment: &Commitment) -> Result<Proof, ProtocolError> {
        let witness = self.take_custody(commitment)?;
        let proof = self.prove_with_witness(&witness, commitment);
        if proof.is_err() {
            self.restore_custody(commitment, witness);
        }
        proof
    }

    /// Stateless variant: the caller supplies the witness, which must open
    /// `commitment`. Custody is neither read nor changed.
    pub fn prove_with_witness(
        &self,
        digest: &WitnessDigest,
        commitment: &Commitment,
    ) -> Result<Proof, ProtocolError> {
        if self.config.challenge_mode() == ChallengeMode::Interactive {
            return Err(interactive_needs_challenges());
        }
        let rounds = self.commit_rounds(digest, commitment)?;
        let seed = derive_seed(commitment.hash(), &rounds.proof_id);
        let challenges = FiatShamir.challenges(self.config.security_level(), &seed)?;
        self.seal(rounds, challenges)
    }

    /// Fix the round commitments for a custody commitment and hand them out
    /// before any challenge exists.
    ///
    /// The witness leaves custody here; it lives on inside the returned
    /// session until that is finished or dropped.
    pub fn begin_interactive(
        &self,
        commitment: &Commitment,
    ) -> Result<InteractiveProof<'_>, ProtocolError> {
        let witness = self.take_custody(commitment)?;
        match self.commit_rounds(&witness, commitment) {
            Ok(rounds) => Ok(InteractiveProof {
                prover: self,
                rounds,
            }),
            Err(e) => {
                self.restore_custody(commitment, witness);
                Err(e)
            }
        }
    }

    /// Drop the custody entry for `commitment`. Returns whether one existed.
    pub fn forget(&self, commitment: &Commitment) -> bool {
        self.custody.write().remove(commitment.hash()).is_some()
    }

    /// Number of witnesses currently in custody.
    pub fn custody_len(&self) -> usize {
        self.custody.read().len()
    }

    fn take_custody(&self, commitment: &Commitment) -> Result<WitnessDigest, ProtocolError> {
        self.custody.write().remove(commitment.hash()).ok_or_else(|| {
            ProtocolError::new(
                ErrorKind::CommitmentMismatch,
                format!("no witness in custody for commitment {}", commitment.hash()),
            )
        })
    }

    fn restore_custody(&self, commitment: &Commitment, witness: WitnessDigest) {
        self.custody.write().insert(*commitment.hash(), witness);
    }

    /// `Init → Committed`: open the commitment, start a session, publish rounds.
    fn commit_rounds(
        &self,
        digest: &WitnessDigest,
        commitment: &Commitment,
    ) -> Result<Rounds, ProtocolError> {
        let level = self.config.security_level();
        debug!(state = ?ProveState::Init, security_bits = level.bits(), "prove");

        self.engine.open(commitment, digest)?;
        let nonce: [u8; 32] = random_array(self.randomness.as_ref())?;
        let session = ResponseSession::new(digest, commitment, &nonce);
        let commitments = session.round_commitments(level.challenge_count(), self.config.parallel());
        let proof_id = transcript_id(commitment, &commitments);
        debug!(%proof_id, state = ?ProveState::Committed, "prove");
        Ok(Rounds {
            session,
            commitments,
            proof_id,
        })
    }

    /// `ChallengesDerived → … → Finalized`.
    fn seal(&self, rounds: Rounds, challenges: Vec<Challenge>) -> Result<Proof, ProtocolError> {
        let level = self.config.security_level();
        let parallel = self.config.parallel();
        let Rounds {
            session,
            commitments,
            proof_id,
        } = rounds;
        debug!(%proof_id, state = ?ProveState::ChallengesDerived, "prove");

        let responses = session.respond_all(&challenges, parallel);
        drop(session);
        debug!(%proof_id, state = ?ProveState::Responded, "prove");

        let merkle_root = MerkleTree::build_with(&response_leaves(&responses)?, parallel)?.root();
        debug!(%proof_id, state = ?ProveState::Aggregated, root = %merkle_root, "prove");

        let metadata = Metadata::new(level);
        let signature = self
            .keypair
            .sign(&signing_payload(&merkle_root, &metadata, &proof_id)?);
        debug!(%proof_id, state = ?ProveState::Signed, "prove");

        debug!(%proof_id, state = ?ProveState::Finalized, rounds = challenges.len(), "prove");
        Ok(Proof {
            proof_id,
            commitments,
            challenges,
            responses,
            merkle_root,
            signature,
            metadata,
        })
    }
}

/// A proof session's published state.
struct Rounds {
    session: ResponseSession,
    commitments: Vec<RoundCommitment>,
    proof_id: ProofId,
}

/// An interactive proof whose round commitments are fixed and awaiting the
/// verifier's challenges.
pub struct InteractiveProof<'p> {
    prover: &'p Prover,
    rounds: Rounds,
}

impl InteractiveProof<'_> {
    pub fn proof_id(&self) -> ProofId {
        self.rounds.proof_id
    }

    /// The round commitments to send to the verifier.
    pub fn round_commitments(&self) -> &[RoundCommitment] {
        &self.rounds.commitments
    }

    /// Answer `challenges` and sign the transcript.
    ///
    /// Invalid challenge sets fail with `ChallengeMismatch` and end the
    /// session.
    pub fn finish(self, challenges: &Supplied) -> Result<Proof, ProtocolError> {
        let challenges = challenges.validated(self.prover.config.security_level())?;
        self.prover.seal(self.rounds, challenges)
    }
}

impl std::fmt::Debug for InteractiveProof<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InteractiveProof")
            .field("proof_id", &self.rounds.proof_id)
            .field("rounds", &self.rounds.commitments.len())
            .finish_non_exhaustive()
    }
}

impl std::fmt::Debug for Prover {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Prover")
            .field("config", &self.config)
            .field("custody_len", &self.custody_len())
            .finish_non_exhaustive()
    }
}

fn interactive_needs_challenges() -> ProtocolError {
    ProtocolError::new(
        ErrorKind::InvalidConfiguration,
        "interactive challenge mode requires supplied challenges",
    )
}

// ---------------------------------------------------------------------------
// Verifier
// ---------------------------------------------------------------------------

/// Checks proofs signed by one trusted public key.
#[derive(Debug, Clone)]
pub struct Verifier {
    config: ProtocolConfig,
    public_key: PqPublicKey,
}

impl Verifier {
    pub fn new(config: ProtocolConfig, public_key: PqPublicKey) -> Self {
        Self { config, public_key }
    }

    pub fn config(&self) -> &ProtocolConfig {
        &self.config
    }

    /// Verify a Fiat–Shamir proof against `commitment`.
    pub fn verify(&self, commitment: &Commitment, proof: &Proof) -> Result<Verdict, ProtocolError> {
        match self.config.challenge_mode() {
            ChallengeMode::FiatShamir => self.verify_using(commitment, proof, &FiatShamir),
            ChallengeMode::Interactive => Err(interactive_needs_challenges()),
        }
    }

    /// Draw fresh challenges for a prover's published round commitments.
    ///
    /// Call this only after `published` has been received; the bits come
    /// from the operating system CSPRNG.
    pub fn issue_challenges(&self, published: &[RoundCommitment]) -> Result<Supplied, ProtocolError> {
        let level = self.config.security_level();
        if published.len() != level.challenge_count() {
            return Err(ProtocolError::malformed_proof(format!(
                "{} round commitments published, {level} requires {}",
                published.len(),
                level.challenge_count()
            )));
        }
        Supplied::draw(level, &OsRandomness)
    }

    /// Verify a proof answered against challenges this verifier supplied.
    ///
    /// A supplied set that is itself invalid for this proof's level is a
    /// `ChallengeMismatch` rejection.
    pub fn verify_interactive(
        &self,
        commitment: &Commitment,
        proof: &Proof,
        source: &dyn ChallengeSource,
    ) -> Result<Verdict, ProtocolError> {
        self.verify_using(commitment, proof, source)
    }

    fn verify_using(
        &self,
        commitment: &Commitment,
        proof: &Proof,
        source: &dyn ChallengeSource,
    ) -> Result<Verdict, ProtocolError> {
        let proof_id = proof.proof_id;
        debug!(%proof_id, state = ?VerifyState::ReceivedProof, "verify");
        self.check_structure(proof)?;

        if transcript_id(commitment, &proof.commitments) != proof.proof_id {
            return Ok(reject(&proof_id, ErrorKind::CommitmentMismatch));
        }

        let seed = derive_seed(commitment.hash(), &proof.proof_id);
        let expected = match source.challenges(proof.security_level(), &seed) {
            Ok(expected) => expected,
            Err(e) if e.kind().is_rejection() => return Ok(reject(&proof_id, e.kind())),
            Err(e) => return Err(e),
        };
        if expected != proof.challenges {
            return Ok(reject(&proof_id, ErrorKind::ChallengeMismatch));
        }
        debug!(%proof_id, state = ?VerifyState::ChallengesRecomputed, "verify");

        let root =
            MerkleTree::build_with(&response_leaves(&proof.responses)?, self.config.parallel())?
                .root();
        if !root.ct_eq(&proof.merkle_root) {
            return Ok(reject(&proof_id, ErrorKind::MerkleRootMismatch));
        }
        debug!(%proof_id, state = ?VerifyState::MerkleRootRecomputed, "verify");

        let payload = signing_payload(&proof.merkle_root, &proof.metadata, &proof.proof_id)?;
        match signature::verify(&payload, &proof.signature, &self.public_key) {
            Ok(()) => {}
            Err(CryptoError::VerificationFailed(_)) => {
                return Ok(reject(&proof_id, ErrorKind::SignatureInvalid))
            }
            Err(e) => return Err(e.into()),
        }
        debug!(%proof_id, state = ?VerifyState::SignatureChecked, "verify");

        let all_open = proof
            .commitments
            .iter()
            .zip(&proof.challenges)
            .zip(&proof.responses)
            .all(|((round, challenge), response)| {
                check_response(commitment.randomness(), round, challenge, response)
            });
        if !all_open {
            return Ok(reject(&proof_id, ErrorKind::ResponseInvalid));
        }
        debug!(%proof_id, state = ?VerifyState::ResponsesChecked, "verify");

        debug!(%proof_id, state = ?VerifyState::Accepted, "verify");
        Ok(Verdict::Accepted)
    }

    fn check_structure(&self, proof: &Proof) -> Result<(), ProtocolError> {
        let level = proof.security_level();
        let k = level.challenge_count();
        if level != self.config.security_level() {
            return Err(ProtocolError::malformed_proof(format!(
                "proof is {level}, verifier requires {}",
                self.config.security_level()
            )));
        }
        if proof.metadata.challenge_count != k {
            return Err(ProtocolError::malformed_proof(format!(
                "metadata challenge count {} does not match {level}",
                proof.metadata.challenge_count
            )));
        }
        for (name, len) in [
            ("commitments", proof.commitments.len()),
            ("challenges", proof.challenges.len()),
            ("responses", proof.responses.len()),
        ] {
            if len != k {
                return Err(ProtocolError::malformed_proof(format!(
                    "{len} {name}, expected {k}"
                )));
            }
        }
        for i in 0..k {
            let expected = i as u32;
            let (round, challenge, response) =
                (&proof.commitments[i], &proof.challenges[i], &proof.responses[i]);
            if round.index != expected
                || challenge.index != expected
                || response.challenge_index != expected
            {
                return Err(ProtocolError::malformed_proof(format!(
                    "round {i} is out of order"
                )));
            }
            if challenge.value > 1 {
                return Err(ProtocolError::malformed_proof(format!(
                    "challenge {i} has non-bit value {}",
                    challenge.value
                )));
            }
            if response.value.len() != RESPONSE_LEN {
                return Err(ProtocolError::malformed_proof(format!(
                    "response {i} is {} bytes, expected {RESPONSE_LEN}",
                    response.value.len()
                )));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// ProofEngine
// ---------------------------------------------------------------------------

/// A prover and a verifier for its own key, behind [`ProofSystem`].
#[derive(Debug)]
pub struct ProofEngine {
    prover: Prover,
    verifier: Verifier,
}

impl ProofEngine {
    pub fn new(config: ProtocolConfig, keypair: PqKeyPair) -> Result<Self, ProtocolError> {
        Self::with_randomness(config, keypair, Arc::new(OsRandomness))
    }

    pub fn with_randomness(
        config: ProtocolConfig,
        keypair: PqKeyPair,
        randomness: Arc<dyn RandomnessSource>,
    ) -> Result<Self, ProtocolError> {
        let verifier = Verifier::new(config.clone(), keypair.public_key());
        let prover = Prover::with_randomness(config, keypair, randomness)?;
        Ok(Self { prover, verifier })
    }

    pub fn prover(&self) -> &Prover {
        &self.prover
    }

    pub fn verifier(&self) -> &Verifier {
        &self.verifier
    }
}

impl ProofSystem for ProofEngine {
    type Witness = WitnessDigest;
    type Commitment = Commitment;
    type Proof = Proof;

    fn commit(&self, witness: &WitnessDigest) -> Result<Commitment, ProtocolError> {
        self.prover.commit(witness)
    }

    fn prove(&self, commitment: &Commitment) -> Result<Proof, ProtocolError> {
        self.prover.prove(commitment)
    }

    fn verify(&self, commitment: &Commitment, proof: &Proof) -> Result<Verdict, ProtocolError> {
        self.verifier.verify(commitment, proof)
    }
}

fn reject(proof_id: &ProofId, kind: ErrorKind) -> Verdict {
    warn!(%proof_id, state = ?VerifyState::Rejected, %kind, "proof rejected");
    Verdict::Rejected(kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use qzkp_core::SecurityLevel;
    use qzkp_crypto::SeededRandomness;

    fn pair(bits: u32) -> (Prover, Verifier) {
        let config = ProtocolConfig::configure(bits).unwrap();
        let prover = Prover::new(config.clone(), PqKeyPair::generate()).unwrap();
        let verifier = Verifier::new(config, prover.public_key());
        (prover, verifier)
    }

    #[test]
    fn test_honest_proof_accepted() {
        let (prover, verifier) = pair(32);
        let c = prover.commit(&WitnessDigest::new([0x33; 32])).unwrap();
        let proof = prover.prove(&c).unwrap();
        assert_eq!(proof.challenges.len(), 32);
        assert_eq!(verifier.verify(&c, &proof).unwrap(), Verdict::Accepted);
    }

    #[test]
    fn test_unknown_commitment_is_mismatch() {
        let (prover, _) = pair(32);
        let (other, _) = pair(32);
        let c = other.commit(&WitnessDigest::new([1; 32])).unwrap();
        assert_eq!(prover.prove(&c).unwrap_err().kind(), ErrorKind::CommitmentMismatch);
    }

    #[test]
    fn test_forget_drops_custody() {
        let (prover, _) = pair(32);
        let c = prover.commit(&WitnessDigest::new([1; 32])).unwrap();
        assert_eq!(prover.custody_len(), 1);
        assert!(prover.forget(&c));
        assert!(!prover.forget(&c));
        assert_eq!(prover.custody_len(), 0);
        assert_eq!(prover.prove(&c).unwrap_err().kind(), ErrorKind::CommitmentMismatch);
    }

    #[test]
    fn test_prove_with_wrong_witness_is_mismatch() {
        let (prover, _) = pair(32);
        let c = prover.commit(&WitnessDigest::new([1; 32])).unwrap();
        let err = prover
            .prove_with_witness(&WitnessDigest::new([2; 32]), &c)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CommitmentMismatch);
    }

    #[test]
    fn test_flipped_challenge_rejected() {
        let (prover, verifier) = pair(32);
        let c = prover.commit(&WitnessDigest::new([4; 32])).unwrap();
        let mut proof = prover.prove(&c).unwrap();
        proof.challenges[3].value ^= 1;
        assert_eq!(
            verifier.verify(&c, &proof).unwrap(),
            Verdict::Rejected(ErrorKind::ChallengeMismatch)
        );
    }

    #[test]
    fn test_level_mismatch_is_malformed() {
        let (prover, _) = pair(32);
        let (_, verifier64) = pair(64);
        let c = prover.commit(&WitnessDigest::new([4; 32])).unwrap();
        let proof = prover.prove(&c).unwrap();
        let err = verifier64.verify(&c, &proof).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedProof);
    }

    #[test]
    fn test_truncated_proof_is_malformed() {
        let (prover, verifier) = pair(32);
        let c = prover.commit(&WitnessDigest::new([4; 32])).unwrap();
        let mut proof = prover.prove(&c).unwrap();
        proof.responses.pop();
        assert_eq!(verifier.verify(&c, &proof).unwrap_err().kind(), ErrorKind::MalformedProof);
    }

    #[test]
    fn test_wrong_public_key_is_signature_invalid() {
        let (prover, _) = pair(32);
        let config = ProtocolConfig::configure(32).unwrap();
        let stranger = Verifier::new(config, PqKeyPair::generate().public_key());
        let c = prover.commit(&WitnessDigest::new([4; 32])).unwrap();
        let proof = prover.prove(&c).unwrap();
        assert_eq!(
            stranger.verify(&c, &proof).unwrap(),
            Verdict::Rejected(ErrorKind::SignatureInvalid)
        );
    }

    #[test]
    fn test_prove_releases_custody() {
        let (prover, verifier) = pair(32);
        let c = prover.commit(&WitnessDigest::new([2; 32])).unwrap();
        let other = prover.commit(&WitnessDigest::new([3; 32])).unwrap();
        assert_eq!(prover.custody_len(), 2);
        let proof = prover.prove(&c).unwrap();
        assert_eq!(prover.custody_len(), 1);
        assert!(verifier.verify(&c, &proof).unwrap().is_accepted());
        assert_eq!(prover.prove(&c).unwrap_err().kind(), ErrorKind::CommitmentMismatch);
        assert!(!prover.forget(&c));
        prover.prove(&other).unwrap();
        assert_eq!(prover.custody_len(), 0);
    }

    #[test]
    fn test_failed_prove_keeps_custody() {
        let config = ProtocolConfig::configure(32).unwrap();
        let budget = Arc::new(qzkp_crypto::LimitedRandomness::new(OsRandomness, 32));
        let prover = Prover::with_randomness(config, PqKeyPair::generate(), budget).unwrap();
        let c = prover.commit(&WitnessDigest::new([5; 32])).unwrap();
        assert_eq!(prover.prove(&c).unwrap_err().kind(), ErrorKind::RandomnessFailure);
        assert_eq!(prover.custody_len(), 1);
        assert_eq!(
            prover.begin_interactive(&c).unwrap_err().kind(),
            ErrorKind::RandomnessFailure
        );
        assert_eq!(prover.custody_len(), 1);
    }

    #[test]
    fn test_prove_with_witness_leaves_custody_alone() {
        let (prover, verifier) = pair(32);
        let w = WitnessDigest::new([9; 32]);
        let c = prover.commit(&w).unwrap();
        for _ in 0..3 {
            let proof = prover.prove_with_witness(&w, &c).unwrap();
            assert!(verifier.verify(&c, &proof).unwrap().is_accepted());
        }
        assert_eq!(prover.custody_len(), 1);
    }

    fn interactive_pair() -> (Prover, Verifier) {
        let config = ProtocolConfig::configure(32)
            .unwrap()
            .with_challenge_mode(ChallengeMode::Interactive);
        let prover = Prover::new(config.clone(), PqKeyPair::generate()).unwrap();
        let verifier = Verifier::new(config, prover.public_key());
        (prover, verifier)
    }

    #[test]
    fn test_interactive_mode_requires_supplied_challenges() {
        let (prover, verifier) = interactive_pair();
        let w = WitnessDigest::new([6; 32]);
        let c = prover.commit(&w).unwrap();
        assert_eq!(prover.prove(&c).unwrap_err().kind(), ErrorKind::InvalidConfiguration);
        assert_eq!(prover.custody_len(), 1);
        assert_eq!(
            prover.prove_with_witness(&w, &c).unwrap_err().kind(),
            ErrorKind::InvalidConfiguration
        );

        let session = prover.begin_interactive(&c).unwrap();
        assert_eq!(prover.custody_len(), 0);
        let challenges = verifier.issue_challenges(session.round_commitments()).unwrap();
        let proof = session.finish(&challenges).unwrap();
        assert_eq!(proof.challenges, challenges.as_slice());
        assert!(verifier
            .verify_interactive(&c, &proof, &challenges)
            .unwrap()
            .is_accepted());
        assert_eq!(verifier.verify(&c, &proof).unwrap_err().kind(), ErrorKind::InvalidConfiguration);
    }

    #[test]
    fn test_interactive_rounds_fixed_before_challenges() {
        let (prover, verifier) = interactive_pair();
        let c = prover.commit(&WitnessDigest::new([7; 32])).unwrap();
        let session = prover.begin_interactive(&c).unwrap();
        let published = session.round_commitments().to_vec();
        let proof_id = session.proof_id();
        assert_eq!(proof_id, transcript_id(&c, &published));

        let challenges = verifier.issue_challenges(&published).unwrap();
        let proof = session.finish(&challenges).unwrap();
        assert_eq!(proof.commitments, published);
        assert_eq!(proof.proof_id, proof_id);

        assert_eq!(
            verifier.issue_challenges(&published[..31]).unwrap_err().kind(),
            ErrorKind::MalformedProof
        );
    }

    #[test]
    fn test_finish_rejects_invalid_challenge_set() {
        let (prover, _) = interactive_pair();
        let c = prover.commit(&WitnessDigest::new([8; 32])).unwrap();
        let session = prover.begin_interactive(&c).unwrap();
        let err = session.finish(&Supplied::from_bits(&[1u8; 31])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ChallengeMismatch);
    }

    #[test]
    fn test_invalid_supplied_set_is_a_rejection() {
        let (prover, verifier) = interactive_pair();
        let c = prover.commit(&WitnessDigest::new([6; 32])).unwrap();
        let session = prover.begin_interactive(&c).unwrap();
        let challenges = Supplied::from_bits(&[1u8, 0].repeat(16));
        let proof = session.finish(&challenges).unwrap();

        let other = Supplied::from_bits(&[0u8; 32]);
        assert_eq!(
            verifier.verify_interactive(&c, &proof, &other).unwrap(),
            Verdict::Rejected(ErrorKind::ChallengeMismatch)
        );
        for bad in [
            Supplied::from_bits(&[0u8; 31]),
            Supplied::from_bits(&[2u8; 32]),
        ] {
            assert_eq!(
                verifier.verify_interactive(&c, &proof, &bad).unwrap(),
                Verdict::Rejected(ErrorKind::ChallengeMismatch)
            );
        }
    }

    #[test]
    fn test_seeded_prover_is_reproducible_up_to_signature() {
        let config = ProtocolConfig::configure(64).unwrap();
        let kp = PqKeyPair::generate();
        let pk = kp.public_key();
        let prover = Prover::with_randomness(config.clone(), kp, Arc::new(SeededRandomness::from_u64(99)))
            .unwrap();
        let w = WitnessDigest::new([8; 32]);
        let c = prover.commit(&w).unwrap();
        let a = prover.prove_with_witness(&w, &c).unwrap();
        let b = prover.prove(&c).unwrap();
        assert_ne!(a.proof_id, b.proof_id);
        let verifier = Verifier::new(config, pk);
        assert!(verifier.verify(&c, &a).unwrap().is_accepted());
        assert!(verifier.verify(&c, &b).unwrap().is_accepted());
        assert_eq!(a.security_level(), SecurityLevel::Bits64);
    }

    #[test]
    fn test_engine_through_trait() {
        fn roundtrip<S: ProofSystem<Witness = WitnessDigest>>(system: &S) -> Verdict {
            let c = system.commit(&WitnessDigest::new([0x77; 32])).unwrap();
            let p = system.prove(&c).unwrap();
            system.verify(&c, &p).unwrap()
        }
        let engine = ProofEngine::new(ProtocolConfig::configure(32).unwrap(), PqKeyPair::generate())
            .unwrap();
        assert_eq!(roundtrip(&engine), Verdict::Accepted);
        assert_eq!(engine.prover().custody_len(), 0);
    }

    #[test]
    fn test_sequential_config_verifies_parallel_proof() {
        let kp = PqKeyPair::generate();
        let pk = kp.public_key();
        let prover = Prover::new(ProtocolConfig::configure(256).unwrap(), kp).unwrap();
        let sequential = Verifier::new(ProtocolConfig::configure(256).unwrap().with_parallel(false), pk);
        let c = prover.commit(&WitnessDigest::new([0x0C; 32])).unwrap();
        let proof = prover.prove(&c).unwrap();
        assert!(sequential.verify(&c, &proof).unwrap().is_accepted());
    }

    #[test]
    fn test_verdict_helpers() {
        assert!(Verdict::Accepted.is_accepted());
        assert_eq!(Verdict::Accepted.rejection(), None);
        let r = Verdict::Rejected(ErrorKind::ResponseInvalid);
        assert!(!r.is_accepted());
        assert_eq!(r.rejection(), Some(ErrorKind::ResponseInvalid));
    }
}
