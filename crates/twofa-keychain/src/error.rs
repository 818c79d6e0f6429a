//! Keychain error types for `twofa-keychain`.

use std::path::PathBuf;

use thiserror::Error;
use twofa_otp::OtpError;

use crate::import::ImportError;

/// Errors produced by keychain operations.
#[derive(Debug, Error)]
pub enum KeychainError {
    /// Secret decoding or code generation failed (delegated from `twofa-otp`).
    #[error(transparent)]
    Otp(#[from] OtpError),

    /// A stored line does not have the `name digits secret [counter]` shape.
    /// Reported and skipped during load, never fatal.
    #[error("{}:{line}: malformed key: {reason}", .file.display())]
    MalformedRecord {
        /// Keychain file the line was read from.
        file: PathBuf,
        /// 1-based line number.
        line: usize,
        /// What was wrong with the line.
        reason: String,
    },

    /// Lookup found no key by that name, exact or fuzzy.
    #[error("no such key {0:?}")]
    NoSuchKey(String),

    /// A key with that name is already stored.
    #[error("key {0:?} already exists")]
    KeyExists(String),

    /// The stored HOTP counter field could not be read or advanced.
    #[error("malformed key counter for {name:?}: {reason}")]
    CorruptCounter {
        /// Key whose counter is unusable.
        name: String,
        /// What was wrong with the counter field.
        reason: String,
    },

    /// Caller-supplied arguments conflict or are out of range.
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    /// Import source could not be parsed.
    #[error(transparent)]
    Import(#[from] ImportError),

    /// I/O error from the filesystem.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
