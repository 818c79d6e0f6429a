//! Keychain operations: add, list, and code emission.
//!
//! Each process invocation loads the keychain, performs one operation and
//! exits; no state survives between invocations except the file.

use std::fmt;
use std::time::SystemTime;

use twofa_otp::{decode_secret, generate_hotp, generate_totp, normalize_secret, OtpCode, OtpDigits};

use crate::record::{self, KeyKind, KeySpec};
use crate::resolver::{self, Resolution};
use crate::{Keychain, KeychainError};

/// A code generated for one key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedCode {
    /// Key the code belongs to.
    pub name: String,
    /// The code.
    pub code: OtpCode,
}

/// Result of [`Keychain::emit_code`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeOutcome {
    /// Exactly one key matched.
    Single(GeneratedCode),
    /// Several keys matched fuzzily; none of them is "the" answer.
    Multiple(Vec<GeneratedCode>),
}

/// One row of [`Keychain::emit_all_time_based_codes`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeListing {
    /// Key name.
    pub name: String,
    /// Code, or a placeholder for counter-based keys.
    pub code: ListedCode,
}

/// Code column of a listing row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListedCode {
    /// Current time-based code.
    Code(OtpCode),
    /// Counter-based key, left untouched; renders as dashes.
    CounterBased(OtpDigits),
}

impl ListedCode {
    /// Rendered width in characters.
    #[must_use]
    pub fn width(self) -> usize {
        match self {
            Self::Code(code) => usize::from(code.digits().value()),
            Self::CounterBased(digits) => usize::from(digits.value()),
        }
    }
}

impl fmt::Display for ListedCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Code(code) => fmt::Display::fmt(code, f),
            Self::CounterBased(_) => f.pad(&"-".repeat(self.width())),
        }
    }
}

impl Keychain {
    /// Key names, sorted.
    #[must_use]
    pub fn list(&self) -> Vec<&str> {
        self.names().collect()
    }

    /// Generate the code for the key stored exactly as `name`.
    ///
    /// For HOTP keys the stored counter is advanced and persisted first;
    /// no code is produced if that write fails.
    ///
    /// # Errors
    /// Returns [`KeychainError::NoSuchKey`], counter errors from
    /// [`Keychain::advance_counter`], or generation errors.
    pub fn code_for(&mut self, name: &str, now: SystemTime) -> Result<OtpCode, KeychainError> {
        let kind = self
            .get(name)
            .ok_or_else(|| KeychainError::NoSuchKey(name.to_string()))?
            .kind();
        let code = match kind {
            KeyKind::Hotp => {
                let counter = self.advance_counter(name)?;
                let record = self
                    .get(name)
                    .ok_or_else(|| KeychainError::NoSuchKey(name.to_string()))?;
                generate_hotp(record.secret(), counter, record.digits())?
            }
            KeyKind::Totp => {
                let record = self
                    .get(name)
                    .ok_or_else(|| KeychainError::NoSuchKey(name.to_string()))?;
                generate_totp(record.secret(), now, record.digits())?
            }
        };
        Ok(code)
    }

    /// Resolve `query` and generate code(s) for the match.
    ///
    /// When several keys match fuzzily, a code is generated for every one
    /// of them (advancing each matching HOTP counter).
    ///
    /// # Errors
    /// Returns [`KeychainError::NoSuchKey`] when nothing matches, or any
    /// error from [`Keychain::code_for`].
    pub fn emit_code(&mut self, query: &str, now: SystemTime) -> Result<CodeOutcome, KeychainError> {
        let mut names = match resolver::resolve(self, query) {
            Resolution::NoMatch => return Err(KeychainError::NoSuchKey(query.to_string())),
            resolution => resolution.into_names(),
        };

        if names.len() == 1 {
            let name = names.remove(0);
            let code = self.code_for(&name, now)?;
            return Ok(CodeOutcome::Single(GeneratedCode { name, code }));
        }

        let mut codes = Vec::with_capacity(names.len());
        for name in names {
            let code = self.code_for(&name, now)?;
            codes.push(GeneratedCode { name, code });
        }
        Ok(CodeOutcome::Multiple(codes))
    }

    /// Current codes for every time-based key, sorted by name.
    ///
    /// Counter-based keys are listed with a placeholder; their counters
    /// are never advanced by a listing.
    ///
    /// # Errors
    /// Returns generation errors (e.g. a clock before 1970).
    pub fn emit_all_time_based_codes(
        &self,
        now: SystemTime,
    ) -> Result<Vec<CodeListing>, KeychainError> {
        self.records()
            .map(|record| {
                let code = match record.kind() {
                    KeyKind::Totp => {
                        ListedCode::Code(generate_totp(record.secret(), now, record.digits())?)
                    }
                    KeyKind::Hotp => ListedCode::CounterBased(record.digits()),
                };
                Ok(CodeListing {
                    name: record.name().to_string(),
                    code,
                })
            })
            .collect()
    }

    /// Validate a new key and format its record line.
    ///
    /// `raw_secret` is normalized (whitespace stripped, `=`-padded) before
    /// validation and stored in that form.
    pub(crate) fn prepare_line(
        &self,
        name: &str,
        spec: KeySpec,
        raw_secret: &str,
    ) -> Result<String, KeychainError> {
        record::validate_name(name)?;
        if self.get(name).is_some() {
            return Err(KeychainError::KeyExists(name.to_string()));
        }
        let secret = normalize_secret(raw_secret);
        if decode_secret(&secret)?.is_empty() {
            return Err(twofa_otp::OtpError::EmptySecret.into());
        }
        Ok(record::format_line(name, spec, &secret))
    }

    /// Add a key and rewrite the keychain file in sorted order.
    ///
    /// # Errors
    /// - [`KeychainError::InvalidArguments`] for an unrepresentable name.
    /// - [`KeychainError::KeyExists`] if `name` is already stored.
    /// - [`KeychainError::Otp`] for an invalid or empty secret.
    /// - [`KeychainError::Io`] if the file cannot be written.
    pub fn add_key(
        &mut self,
        name: &str,
        spec: KeySpec,
        raw_secret: &str,
    ) -> Result<(), KeychainError> {
        let line = self.prepare_line(name, spec, raw_secret)?;
        self.add_lines(&[line])?;
        tracing::info!(key = %name, digits = %spec.digits, kind = ?spec.kind, "added key");
        Ok(())
    }
}
