//! 2FAS Authenticator JSON backup export parser.
//!
//! Reads plaintext exports only. Entries live in a `services` array with
//! the Base32 secret in each service's top-level `secret` field and the
//! generation parameters under `otp`.

use serde::Deserialize;

use super::{ImportCandidate, ImportError, ParseResult, SkippedEntry};

// ---------------------------------------------------------------------------
// 2FAS JSON deserialization structs
// ---------------------------------------------------------------------------

/// Top-level 2FAS backup structure.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TwofasBackup {
    /// Array of service entries (plaintext export).
    #[serde(default)]
    pub services: Vec<TwofasService>,
    /// Encrypted services payload; present in password-protected exports.
    #[serde(default)]
    pub services_encrypted: Option<String>,
    // `groups`, `schemaVersion`, `appVersionCode` etc. are ignored.
}

/// A single 2FAS service entry.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TwofasService {
    /// Service display name (e.g., "GitLab").
    #[serde(default)]
    pub name: String,
    /// Base32-encoded secret key.
    #[serde(default)]
    pub secret: String,
    /// OTP parameters.
    #[serde(default)]
    pub otp: Option<TwofasOtp>,
}

/// OTP parameters within a 2FAS service entry.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TwofasOtp {
    /// Label, used when no account is set.
    #[serde(default)]
    pub label: Option<String>,
    /// Account name (e.g., "user@example.com").
    #[serde(default)]
    pub account: Option<String>,
    /// Service issuer, used when the service has no name.
    #[serde(default)]
    pub issuer: Option<String>,
    /// Number of OTP digits.
    #[serde(default)]
    pub digits: Option<u32>,
    /// TOTP period in seconds.
    #[serde(default)]
    pub period: Option<u32>,
    /// Hash algorithm: "SHA1", "SHA256", "SHA512", ...
    #[serde(default)]
    pub algorithm: Option<String>,
    /// Token type: "TOTP", "HOTP", "STEAM".
    #[serde(default)]
    pub token_type: Option<String>,
}

/// Period the keychain generates time-based codes with.
const SUPPORTED_PERIOD: u32 = 30;

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Parse a plaintext 2FAS JSON backup export.
///
/// # Errors
///
/// Returns `ImportError::InvalidFormat` if the JSON structure is invalid.
/// Returns `ImportError::Unsupported` if the export is encrypted.
pub fn parse_twofas_json(data: &str) -> Result<ParseResult, ImportError> {
    let backup: TwofasBackup = serde_json::from_str(data)
        .map_err(|e| ImportError::InvalidFormat(format!("invalid 2FAS JSON: {e}")))?;

    if backup
        .services_encrypted
        .as_ref()
        .is_some_and(|s| !s.is_empty())
    {
        return Err(ImportError::Unsupported(
            "encrypted 2FAS exports are not supported; export without a password".to_string(),
        ));
    }

    let mut result = ParseResult::default();
    for service in &backup.services {
        match parse_service(service) {
            Parsed::Valid(candidate) => result.candidates.push(candidate),
            Parsed::Unsupported(entry) => result.unsupported.push(entry),
            Parsed::Malformed(entry) => result.malformed.push(entry),
        }
    }
    Ok(result)
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

enum Parsed {
    Valid(ImportCandidate),
    Unsupported(SkippedEntry),
    Malformed(SkippedEntry),
}

fn parse_service(service: &TwofasService) -> Parsed {
    let fallback = TwofasOtp::default();
    let otp = service.otp.as_ref().unwrap_or(&fallback);

    let Some(name) = service_name(service, otp) else {
        return Parsed::Malformed(SkippedEntry {
            name: "(unnamed)".to_string(),
            reason: "service has no name".to_string(),
        });
    };
    let unsupported = |reason: String| {
        Parsed::Unsupported(SkippedEntry {
            name: name.clone(),
            reason,
        })
    };

    let counter_based = match otp.token_type.as_deref().unwrap_or("TOTP") {
        "TOTP" | "" => false,
        "HOTP" => true,
        other => return unsupported(format!("{other} token type not supported")),
    };

    match otp.algorithm.as_deref().unwrap_or("SHA1") {
        "SHA1" | "" => {}
        other => return unsupported(format!("{other} algorithm not supported")),
    }

    if !counter_based {
        if let Some(period) = otp.period.filter(|&p| p != 0 && p != SUPPORTED_PERIOD) {
            return unsupported(format!("{period}s period not supported"));
        }
    }

    // A zero digit count means "unset" in 2FAS exports.
    let digits = otp.digits.filter(|&d| d != 0);

    Parsed::Valid(ImportCandidate {
        name,
        secret: service.secret.clone(),
        digits,
        counter_based,
    })
}

/// Derive the keychain name for a service: `service/account`, or
/// whichever half exists.
///
/// The service half comes from `name` (else `otp.issuer`) with spaces
/// replaced by underscores; the account half from `otp.account` (else
/// `otp.label`) as-is.
fn service_name(service: &TwofasService, otp: &TwofasOtp) -> Option<String> {
    let non_empty = |s: &Option<String>| s.as_deref().filter(|s| !s.is_empty()).map(str::to_string);

    let service_part = Some(service.name.clone())
        .filter(|s| !s.is_empty())
        .or_else(|| non_empty(&otp.issuer))
        .map(|s| s.replace(' ', "_"));
    let account_part = non_empty(&otp.account).or_else(|| non_empty(&otp.label));

    match (service_part, account_part) {
        (Some(service), Some(account)) => Some(format!("{service}/{account}")),
        (Some(only), None) | (None, Some(only)) => Some(only),
        (None, None) => None,
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
