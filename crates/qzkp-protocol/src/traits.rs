//! # Proof System Trait
//!
//! The Commit/Prove/Verify contract. [`ProofEngine`](crate::ProofEngine)
//! implements it for the repeated-challenge protocol; callers that only
//! need the three operations program against this trait.
//!
//! ## Security Invariant
//!
//! Implementations are `Send + Sync`. `verify` never mutates its inputs and
//! returns the same result for the same `(commitment, proof)` pair.

use qzkp_core::ProtocolError;

use crate::orchestrator::Verdict;

/// Abstract interface for a commitment-based proof system.
pub trait ProofSystem: Send + Sync {
    /// Secret input.
    type Witness: ?Sized;
    /// Public binding to the witness.
    type Commitment: Send + Sync;
    /// Transcript produced by `prove`.
    type Proof: Send + Sync;

    /// Bind a witness under fresh randomness.
    fn commit(&self, witness: &Self::Witness) -> Result<Self::Commitment, ProtocolError>;

    /// Prove knowledge of the witness behind `commitment`.
    fn prove(&self, commitment: &Self::Commitment) -> Result<Self::Proof, ProtocolError>;

    /// Accept or reject `proof` for `commitment`.
    ///
    /// `Err` is reserved for malformed input and configuration problems.
    fn verify(
        &self,
        commitment: &Self::Commitment,
        proof: &Self::Proof,
    ) -> Result<Verdict, ProtocolError>;
}
