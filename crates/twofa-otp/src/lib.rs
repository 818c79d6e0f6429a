//! `twofa-otp`: Secret codec and one-time password derivation for 2fa.
//!
//! Pure functions only: zero file I/O, zero global state. Everything that
//! touches the keychain file lives in `twofa-keychain`.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::arithmetic_side_effects))]

pub mod codec;
pub mod error;
pub mod totp;

pub use codec::{decode_secret, encode_secret, normalize_secret, SecretBytes};
pub use error::OtpError;
pub use totp::{generate_hotp, generate_totp, OtpCode, OtpDigits, TIME_STEP_SECS};
