//! # qzkp-protocol: Repeated-Challenge Commitment Proofs
//!
//! Commit to a secret 32-byte witness digest, produce a signed `k`-round
//! cut-and-choose transcript over it, and verify that transcript.
//!
//! ## Trust Model
//!
//! Commitments are hash-only, so a verifier checks each opened share against
//! its round commitment but never against the committed digest. An accepted
//! proof therefore means "the holder of the trusted signing key vouched for
//! this commitment with a transcript fixed before its challenges". It does
//! not show, on its own, that the signer knew the witness. Verifiers pin the
//! prover's public key; a proof signed by any other key is rejected.
//!
//! ## Architecture
//!
//! - **Config** (`config.rs`): security level, commitment backend and
//!   challenge mode, loadable from JSON or YAML.
//! - **Commitment** (`commitment.rs`): `H(tag ‖ digest ‖ randomness)` with
//!   SHA-256 or keyed BLAKE3.
//! - **Challenge** (`challenge.rs`): Fiat–Shamir bit expansion and the
//!   `ChallengeSource` seam for interactive verifiers.
//! - **Response** (`response.rs`): cut-and-choose openings of XOR shares.
//! - **Proof** (`proof.rs`): the transcript and its JSON encoding.
//! - **Orchestrator** (`orchestrator.rs`): `Prover`, `Verifier` and the
//!   `ProofEngine` facade.
//! - **Traits** (`traits.rs`): the `ProofSystem` contract.
//!
//! ```no_run
//! use qzkp_core::WitnessDigest;
//! use qzkp_crypto::PqKeyPair;
//! use qzkp_protocol::{ProofEngine, ProofSystem, ProtocolConfig};
//!
//! let engine = ProofEngine::new(ProtocolConfig::configure(128)?, PqKeyPair::generate())?;
//! let commitment = engine.commit(&WitnessDigest::new([0u8; 32]))?;
//! let proof = engine.prove(&commitment)?;
//! assert!(engine.verify(&commitment, &proof)?.is_accepted());
//! # Ok::<(), qzkp_core::ProtocolError>(())
//! ```
//!
//! ## Crate Policy
//!
//! - Depends on `qzkp-core` and `qzkp-crypto` internally.
//! - No `unsafe`.

pub mod challenge;
pub mod commitment;
pub mod config;
pub mod orchestrator;
pub mod proof;
pub mod response;
pub mod traits;

pub use challenge::{derive_seed, generate, Challenge, ChallengeSource, FiatShamir, Supplied};
pub use commitment::{Commitment, CommitmentEngine};
pub use config::{ChallengeMode, ProtocolConfig};
pub use orchestrator::{
    InteractiveProof, ProofEngine, ProveState, Prover, Verdict, Verifier, VerifyState,
};
pub use proof::{Metadata, Proof};
pub use response::{Response, ResponseSession, RoundCommitment, RESPONSE_LEN};
pub use traits::ProofSystem;
