#![allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]

//! Property-based tests for the HOTP/TOTP engine and codec.

use std::time::{Duration, UNIX_EPOCH};

use proptest::prelude::*;
use twofa_otp::{
    decode_secret, generate_hotp, generate_totp, normalize_secret, OtpDigits, TIME_STEP_SECS,
};

fn digits_strategy() -> impl Strategy<Value = OtpDigits> {
    prop_oneof![
        Just(OtpDigits::Six),
        Just(OtpDigits::Seven),
        Just(OtpDigits::Eight),
    ]
}

proptest! {
    /// Rendered codes are exactly `digits` ASCII digits.
    #[test]
    fn hotp_rendering_has_exact_width(
        secret in proptest::collection::vec(any::<u8>(), 1..64),
        counter in any::<u64>(),
        digits in digits_strategy(),
    ) {
        let code = generate_hotp(&secret, counter, digits).unwrap();
        let text = code.to_string();
        prop_assert_eq!(text.len(), usize::from(digits.value()));
        prop_assert!(text.bytes().all(|b| b.is_ascii_digit()));
    }

    /// HOTP is a pure function of its inputs.
    #[test]
    fn hotp_is_deterministic(
        secret in proptest::collection::vec(any::<u8>(), 1..64),
        counter in any::<u64>(),
        digits in digits_strategy(),
    ) {
        prop_assert_eq!(
            generate_hotp(&secret, counter, digits).unwrap(),
            generate_hotp(&secret, counter, digits).unwrap()
        );
    }

    /// TOTP at time T equals HOTP at counter T / 30.
    #[test]
    fn totp_equals_hotp_at_time_step(
        secret in proptest::collection::vec(any::<u8>(), 1..64),
        secs in 0u64..(1u64 << 40),
        digits in digits_strategy(),
    ) {
        let totp = generate_totp(&secret, UNIX_EPOCH + Duration::from_secs(secs), digits).unwrap();
        let hotp = generate_hotp(&secret, secs / TIME_STEP_SECS, digits).unwrap();
        prop_assert_eq!(totp, hotp);
    }

    /// Smaller digit counts are the larger code reduced modulo 10^n.
    #[test]
    fn digit_counts_share_truncated_value(
        secret in proptest::collection::vec(any::<u8>(), 1..64),
        counter in any::<u64>(),
    ) {
        let eight = generate_hotp(&secret, counter, OtpDigits::Eight).unwrap().value();
        let seven = generate_hotp(&secret, counter, OtpDigits::Seven).unwrap().value();
        let six = generate_hotp(&secret, counter, OtpDigits::Six).unwrap().value();
        prop_assert_eq!(seven, eight % 10_000_000);
        prop_assert_eq!(six, eight % 1_000_000);
    }

    /// Normalized text of any base32 alphabet string with interspersed
    /// spaces is a whole number of 8-symbol blocks.
    #[test]
    fn normalize_pads_to_block_multiple(text in "[a-z2-7 ]{0,40}") {
        let normalized = normalize_secret(&text);
        prop_assert_eq!(normalized.len() % 8, 0);
        prop_assert!(!normalized.contains(' '));
    }

    /// Only lengths that leave no dangling symbols decode; those that do
    /// decode ignore case.
    #[test]
    fn decode_ignores_case(text in "[A-Z2-7]{8,32}") {
        let normalized = normalize_secret(&text);
        let upper = decode_secret(&normalized);
        let lower = decode_secret(&normalized.to_ascii_lowercase());
        prop_assert_eq!(upper.is_ok(), lower.is_ok());
        if let (Ok(u), Ok(l)) = (upper, lower) {
            prop_assert_eq!(u.to_vec(), l.to_vec());
        }
    }
}
