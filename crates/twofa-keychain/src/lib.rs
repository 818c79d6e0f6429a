//! `twofa-keychain`: Keychain storage and code emission for 2fa.
//!
//! The keychain is a plain text file, one key per line, kept sorted by
//! name. Secrets are stored unencrypted; protect the file with filesystem
//! permissions (it is written `0600`).

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::arithmetic_side_effects))]

pub mod engine;
pub mod error;
pub mod import;
pub mod record;
pub mod resolver;
pub mod store;

pub use engine::{CodeListing, CodeOutcome, GeneratedCode, ListedCode};
pub use error::KeychainError;
pub use import::{
    read_export, ImportCandidate, ImportError, ImportFormat, ImportReport, ParseResult,
    SkippedEntry,
};
pub use record::{validate_name, KeyKind, KeyRecord, KeySpec, COUNTER_LEN};
pub use resolver::{resolve, resolve_names, Resolution};
pub use store::Keychain;
