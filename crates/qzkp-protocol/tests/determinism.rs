//! Verify is a pure function of its inputs; Commit and Prove are not.

mod common;

use std::collections::HashSet;
use std::sync::Arc;

use proptest::prelude::*;
use qzkp_core::ErrorKind;
use qzkp_crypto::{LimitedRandomness, OsRandomness, SeededRandomness};
use qzkp_protocol::{ProofSystem, ProtocolConfig};

#[test]
fn test_verify_is_idempotent() {
    let engine = common::engine(80);
    let c = engine.commit(&common::witness([0x21; 32])).unwrap();
    let proof = engine.prove(&c).unwrap();
    let first = engine.verify(&c, &proof).unwrap();
    for _ in 0..5 {
        assert_eq!(engine.verify(&c, &proof).unwrap(), first);
    }

    let mut bad = proof.clone();
    bad.responses[3].value[10] ^= 1;
    let rejected = engine.verify(&c, &bad).unwrap();
    assert!(!rejected.is_accepted());
    assert_eq!(engine.verify(&c, &bad).unwrap(), rejected);
}

#[test]
fn test_commitments_vary_over_100_trials() {
    let engine = common::engine(32);
    let w = common::witness([0; 32]);
    let mut hashes = HashSet::new();
    let mut randomness = HashSet::new();
    for _ in 0..100 {
        let c = engine.commit(&w).unwrap();
        assert!(hashes.insert(*c.hash()));
        assert!(randomness.insert(*c.randomness()));
    }
}

#[test]
fn test_proofs_of_one_commitment_vary() {
    let engine = common::engine(32);
    let w = common::witness([0x44; 32]);
    let c = engine.commit(&w).unwrap();
    let mut ids = HashSet::new();
    let mut roots = HashSet::new();
    for _ in 0..100 {
        let proof = engine.prover().prove_with_witness(&w, &c).unwrap();
        assert!(ids.insert(proof.proof_id));
        assert!(roots.insert(proof.merkle_root));
    }
}

#[test]
fn test_seeded_runs_reproduce_transcript_bytes() {
    let run = || {
        let engine = common::engine_with(
            ProtocolConfig::configure(64).unwrap(),
            Arc::new(SeededRandomness::from_u64(31337)),
        );
        let c = engine.commit(&common::witness([0x99; 32])).unwrap();
        let proof = engine.prove(&c).unwrap();
        (c, proof)
    };
    let (c1, p1) = run();
    let (c2, p2) = run();
    assert_eq!(c1.hash(), c2.hash());
    assert_eq!(c1.randomness(), c2.randomness());
    assert_eq!(p1.proof_id, p2.proof_id);
    assert_eq!(p1.commitments, p2.commitments);
    assert_eq!(p1.challenges, p2.challenges);
    assert_eq!(p1.responses, p2.responses);
    assert_eq!(p1.merkle_root, p2.merkle_root);
}

#[test]
fn test_exhausted_entropy_fails_commit_and_prove() {
    // 32 bytes for the commitment, nothing left for the session nonce.
    let src = Arc::new(LimitedRandomness::new(OsRandomness, 32));
    let engine = common::engine_with(ProtocolConfig::configure(32).unwrap(), src);
    let c = engine.commit(&common::witness([1; 32])).unwrap();
    assert_eq!(engine.prove(&c).unwrap_err().kind(), ErrorKind::RandomnessFailure);
    assert_eq!(
        engine.commit(&common::witness([1; 32])).unwrap_err().kind(),
        ErrorKind::RandomnessFailure
    );
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn prop_any_witness_round_trips(bytes in proptest::array::uniform32(any::<u8>())) {
        let engine = common::engine(32);
        let c = engine.commit(&common::witness(bytes)).unwrap();
        let proof = engine.prove(&c).unwrap();
        prop_assert!(engine.verify(&c, &proof).unwrap().is_accepted());
        prop_assert!(!common::contains_witness(proof.to_json().unwrap().as_bytes(), &bytes));
    }
}
