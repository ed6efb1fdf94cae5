//! # Soundness Mapping Conformance
//!
//! Pins the security-level ↔ challenge-count ↔ error-bound table that the
//! rest of the workspace relies on.

use qzkp_core::{
    challenges_for_security_bits, soundness_error_for_challenges, ErrorKind, SecurityLevel,
};

#[test]
fn mapping_table_matches_supported_levels() {
    let cases = [(32u32, 32usize), (64, 64), (80, 80), (96, 96), (128, 128), (256, 256)];
    for (bits, k) in cases {
        assert_eq!(challenges_for_security_bits(bits).unwrap(), k, "bits={bits}");
        let want = 0.5f64.powi(k as i32);
        let got = soundness_error_for_challenges(k);
        assert!((got - want).abs() <= 1e-18, "k={k}: expected {want:e}, got {got:e}");
    }
}

#[test]
fn every_enum_level_round_trips_through_bits() {
    for level in SecurityLevel::ALL {
        assert_eq!(SecurityLevel::try_from(level.bits()).unwrap(), level);
        assert_eq!(level.challenge_count(), level.bits() as usize);
    }
}

#[test]
fn boundary_rejects_everything_else() {
    let supported = [32u32, 64, 80, 96, 128, 256];
    for bits in 0..=300u32 {
        let result = challenges_for_security_bits(bits);
        if supported.contains(&bits) {
            assert!(result.is_ok());
        } else {
            assert_eq!(result.unwrap_err().kind(), ErrorKind::InvalidSecurityLevel);
        }
    }
}
