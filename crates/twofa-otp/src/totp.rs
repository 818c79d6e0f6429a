//! RFC 4226 HOTP and RFC 6238 TOTP code generation.
//!
//! HMAC-SHA1 only, via `ring::hmac`. The TOTP time step is fixed at 30
//! seconds (RFC 6238 default parameters); keys with other periods or hash
//! algorithms are not representable in the keychain format.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use ring::hmac;

use crate::OtpError;

// ── Constants ───────────────────────────────────────────────────────

/// TOTP time step in seconds (RFC 6238 §4, X = 30).
pub const TIME_STEP_SECS: u64 = 30;

// ── Types ───────────────────────────────────────────────────────────

/// Number of digits in a generated code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum OtpDigits {
    /// 6-digit code (standard).
    #[default]
    Six,
    /// 7-digit code.
    Seven,
    /// 8-digit code.
    Eight,
}

impl OtpDigits {
    /// Return the numeric digit count.
    #[must_use]
    pub const fn value(self) -> u8 {
        match self {
            Self::Six => 6,
            Self::Seven => 7,
            Self::Eight => 8,
        }
    }

    /// The ASCII marker used for this digit count in the keychain file.
    #[must_use]
    pub const fn marker(self) -> u8 {
        match self {
            Self::Six => b'6',
            Self::Seven => b'7',
            Self::Eight => b'8',
        }
    }

    /// Parse a keychain file digit marker (`'6'`, `'7'` or `'8'`).
    #[must_use]
    pub const fn from_marker(marker: u8) -> Option<Self> {
        match marker {
            b'6' => Some(Self::Six),
            b'7' => Some(Self::Seven),
            b'8' => Some(Self::Eight),
            _ => None,
        }
    }

    /// Modulus (10^digits) for truncation.
    const fn modulus(self) -> u32 {
        match self {
            Self::Six => 1_000_000,
            Self::Seven => 10_000_000,
            Self::Eight => 100_000_000,
        }
    }
}

impl TryFrom<u32> for OtpDigits {
    type Error = OtpError;

    fn try_from(digits: u32) -> Result<Self, Self::Error> {
        match digits {
            6 => Ok(Self::Six),
            7 => Ok(Self::Seven),
            8 => Ok(Self::Eight),
            other => Err(OtpError::InvalidDigits(other)),
        }
    }
}

impl fmt::Display for OtpDigits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// A generated one-time code.
///
/// Holds the numeric value; [`fmt::Display`] renders it left-zero-padded
/// to exactly the digit count (outer width/alignment flags still apply).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OtpCode {
    value: u32,
    digits: OtpDigits,
}

impl OtpCode {
    /// Numeric code value, always `< 10^digits`.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.value
    }

    /// Digit count the code was generated for.
    #[must_use]
    pub const fn digits(self) -> OtpDigits {
        self.digits
    }
}

impl fmt::Display for OtpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = usize::from(self.digits.value());
        f.pad(&format!("{:0>width$}", self.value))
    }
}

// ── HOTP (RFC 4226) ────────────────────────────────────────────────

/// Generate an HOTP code per RFC 4226.
///
/// # Arguments
/// - `secret`: Shared secret key bytes
/// - `counter`: Moving factor, hashed as 8 big-endian bytes (RFC 4226 §5.2)
/// - `digits`: Number of output digits
///
/// # Errors
/// Returns [`OtpError::EmptySecret`] if the secret is empty.
#[must_use = "OTP code should be used or displayed"]
pub fn generate_hotp(secret: &[u8], counter: u64, digits: OtpDigits) -> Result<OtpCode, OtpError> {
    if secret.is_empty() {
        return Err(OtpError::EmptySecret);
    }

    let key = hmac::Key::new(hmac::HMAC_SHA1_FOR_LEGACY_USE_ONLY, secret);
    let tag = hmac::sign(&key, &counter.to_be_bytes());
    let sum = tag.as_ref();

    // Dynamic truncation (RFC 4226 §5.3): offset is the low nibble of the
    // last byte, so offset + 3 <= 18 < 20.
    let offset = usize::from(sum[sum.len().wrapping_sub(1)] & 0x0F);
    let binary_code = u32::from_be_bytes([
        sum[offset],
        sum[offset.wrapping_add(1)],
        sum[offset.wrapping_add(2)],
        sum[offset.wrapping_add(3)],
    ]) & 0x7FFF_FFFF;

    // modulus is a non-zero constant
    #[allow(clippy::arithmetic_side_effects)]
    let value = binary_code % digits.modulus();

    Ok(OtpCode { value, digits })
}

// ── TOTP (RFC 6238) ────────────────────────────────────────────────

/// Map wall-clock time to the TOTP counter: `floor(unix_time / 30s)`.
///
/// # Errors
/// Returns [`OtpError::ClockBeforeEpoch`] for times before 1970.
pub fn time_step(time: SystemTime) -> Result<u64, OtpError> {
    let since_epoch = time
        .duration_since(UNIX_EPOCH)
        .map_err(|_| OtpError::ClockBeforeEpoch)?;
    // TIME_STEP_SECS is a non-zero constant
    #[allow(clippy::arithmetic_side_effects)]
    let step = since_epoch.as_secs() / TIME_STEP_SECS;
    Ok(step)
}

/// Generate a TOTP code per RFC 6238 with a 30-second step.
///
/// # Errors
/// Returns [`OtpError::ClockBeforeEpoch`] if `time` precedes the epoch,
/// or [`OtpError::EmptySecret`] if the secret is empty.
#[must_use = "OTP code should be used or displayed"]
pub fn generate_totp(
    secret: &[u8],
    time: SystemTime,
    digits: OtpDigits,
) -> Result<OtpCode, OtpError> {
    generate_hotp(secret, time_step(time)?, digits)
}

// ── Tests ───────────────────────────────────────────────────────────
