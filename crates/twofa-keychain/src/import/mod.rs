//! Import of keys exported by other authenticator apps.
//!
//! Each format module turns its export into [`ImportCandidate`]s;
//! [`Keychain::import`] validates them against the keychain and commits
//! every accepted key in a single sorted rewrite.

pub mod twofas;

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use twofa_otp::OtpDigits;

use crate::record::{KeyKind, KeySpec};
use crate::{Keychain, KeychainError};

// ---------------------------------------------------------------------------
// Import error types
// ---------------------------------------------------------------------------

/// Categorized error for import parsing operations.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    /// The input data format is invalid (not JSON, wrong structure).
    #[error("invalid format: {0}")]
    InvalidFormat(String),

    /// The export uses a feature this tool cannot read.
    #[error("unsupported: {0}")]
    Unsupported(String),
}

// ---------------------------------------------------------------------------
// Shared types
// ---------------------------------------------------------------------------

/// Supported export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportFormat {
    /// 2FAS Authenticator plaintext JSON backup.
    TwoFas,
}

impl FromStr for ImportFormat {
    type Err = KeychainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "2fas" => Ok(Self::TwoFas),
            other => Err(KeychainError::InvalidArguments(format!(
                "unsupported import format: {other}"
            ))),
        }
    }
}

/// A key read from an export, not yet validated against the keychain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportCandidate {
    /// Key name to store under.
    pub name: String,
    /// Base32 secret as exported (whitespace allowed).
    pub secret: String,
    /// Digit count; `None` means the default of 6.
    pub digits: Option<u32>,
    /// HOTP rather than TOTP.
    pub counter_based: bool,
}

/// An entry that was not imported, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    /// Name of the entry, or a placeholder when it has none.
    pub name: String,
    /// Human-readable reason.
    pub reason: String,
}

/// Summary of a completed import.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Names imported, in input order.
    pub imported: Vec<String>,
    /// Entries skipped, in input order.
    pub skipped: Vec<SkippedEntry>,
}

/// Candidates parsed from an export plus the entries rejected while parsing.
#[derive(Debug, Default)]
pub struct ParseResult {
    /// Entries that can be offered to [`Keychain::import`].
    pub candidates: Vec<ImportCandidate>,
    /// Entries using a token type, algorithm or period this tool lacks.
    pub unsupported: Vec<SkippedEntry>,
    /// Entries missing required data.
    pub malformed: Vec<SkippedEntry>,
}

/// Read and parse an export file.
///
/// # Errors
/// Returns [`KeychainError::Io`] if the file cannot be read, or
/// [`KeychainError::Import`] if it cannot be parsed.
pub fn read_export(format: ImportFormat, path: &Path) -> Result<ParseResult, KeychainError> {
    let text = fs::read_to_string(path)?;
    let parsed = match format {
        ImportFormat::TwoFas => twofas::parse_twofas_json(&text)?,
    };
    Ok(parsed)
}

// ---------------------------------------------------------------------------
// Keychain import
// ---------------------------------------------------------------------------

impl Keychain {
    /// Import candidates, skipping (and reporting) any whose name already
    /// exists, repeats an earlier candidate, or whose secret or digit
    /// count is invalid. Accepted keys are written in one rewrite.
    ///
    /// # Errors
    /// Returns [`KeychainError::Io`] if the rewrite fails; nothing is
    /// imported in that case.
    pub fn import<I>(&mut self, candidates: I) -> Result<ImportReport, KeychainError>
    where
        I: IntoIterator<Item = ImportCandidate>,
    {
        let mut report = ImportReport::default();
        let mut lines = Vec::new();
        let mut batch_names = HashSet::new();

        for candidate in candidates {
            match self.prepare_import(&candidate, &batch_names) {
                Ok(line) => {
                    tracing::info!(key = %candidate.name, "importing key");
                    lines.push(line);
                    batch_names.insert(candidate.name.clone());
                    report.imported.push(candidate.name);
                }
                Err(err) => {
                    tracing::warn!(key = %candidate.name, "skipping: {err}");
                    report.skipped.push(SkippedEntry {
                        name: candidate.name,
                        reason: err.to_string(),
                    });
                }
            }
        }

        if !lines.is_empty() {
            self.add_lines(&lines)?;
        }
        Ok(report)
    }

    fn prepare_import(
        &self,
        candidate: &ImportCandidate,
        batch_names: &HashSet<String>,
    ) -> Result<String, KeychainError> {
        if batch_names.contains(&candidate.name) {
            return Err(KeychainError::KeyExists(candidate.name.clone()));
        }
        let digits = OtpDigits::try_from(candidate.digits.unwrap_or(6))?;
        let kind = if candidate.counter_based {
            KeyKind::Hotp
        } else {
            KeyKind::Totp
        };
        self.prepare_line(&candidate.name, KeySpec { digits, kind }, &candidate.secret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(name: &str, secret: &str) -> ImportCandidate {
        ImportCandidate {
            name: name.to_string(),
            secret: secret.to_string(),
            digits: None,
            counter_based: false,
        }
    }

    #[test]
    fn format_names() {
        assert_eq!("2fas".parse::<ImportFormat>().unwrap(), ImportFormat::TwoFas);
        assert!(matches!(
            "aegis".parse::<ImportFormat>(),
            Err(KeychainError::InvalidArguments(_))
        ));
    }

    #[test]
    fn import_skips_existing_repeated_and_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let mut keychain = Keychain::load(dir.path().join(".2fa")).unwrap();
        keychain
            .add_key("existing", KeySpec::default(), "JBSWY3DPEE")
            .unwrap();

        let mut eight = candidate("eight", "JBSWY3DPEE");
        eight.digits = Some(8);
        let mut nine = candidate("nine", "JBSWY3DPEE");
        nine.digits = Some(9);
        let mut counter = candidate("counter", "JBSWY3DPEE");
        counter.counter_based = true;

        let report = keychain
            .import(vec![
                candidate("existing", "JBSWY3DPEE"),
                candidate("fresh", "JBSW Y3DP EE"),
                candidate("fresh", "JBSWY3DPEE"),
                candidate("bad", "!!!!"),
                eight,
                nine,
                counter,
            ])
            .unwrap();

        assert_eq!(report.imported, vec!["fresh", "eight", "counter"]);
        let skipped: Vec<&str> = report.skipped.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(skipped, vec!["existing", "fresh", "bad", "nine"]);

        let on_disk = std::fs::read_to_string(keychain.path()).unwrap();
        assert_eq!(
            on_disk,
            "counter 6 JBSWY3DPEE====== 00000000000000000000\n\
             eight 8 JBSWY3DPEE======\n\
             existing 6 JBSWY3DPEE======\n\
             fresh 6 JBSWY3DPEE======\n"
        );
    }

    #[test]
    fn empty_import_does_not_touch_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".2fa");
        let mut keychain = Keychain::load(&path).unwrap();
        let report = keychain.import(Vec::new()).unwrap();
        assert_eq!(report, ImportReport::default());
        assert!(!path.exists());
    }
}
