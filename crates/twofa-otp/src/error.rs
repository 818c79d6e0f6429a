//! Error types for `twofa-otp`.

use thiserror::Error;

/// Errors produced by secret decoding and code generation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OtpError {
    /// The secret is not valid base32 (bad symbol, bad padding length).
    #[error("invalid secret: {0}")]
    InvalidSecret(String),

    /// The decoded secret is empty; HMAC over an empty key is refused.
    #[error("secret must not be empty")]
    EmptySecret,

    /// The digit count is outside {6, 7, 8}.
    #[error("unsupported digit count: {0} (expected 6, 7 or 8)")]
    InvalidDigits(u32),

    /// The supplied time lies before the Unix epoch.
    #[error("system clock is set before the Unix epoch")]
    ClockBeforeEpoch,
}
