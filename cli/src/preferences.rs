//! User preferences, stored as plain JSON next to other per-user config.
//!
//! Read once at startup. The keychain itself never lives here.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Optional settings read from `{config_dir}/2fa/preferences.json`.
///
/// Every field has a default, so a missing or partial file is fine.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    /// Keychain file used when neither `--keychain` nor
    /// `TWOFA_KEYCHAIN` is given.
    #[serde(default)]
    pub keychain_path: Option<PathBuf>,

    /// Copy a single generated code to the clipboard.
    #[serde(default = "default_copy_to_clipboard")]
    pub copy_to_clipboard: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            keychain_path: None,
            copy_to_clipboard: default_copy_to_clipboard(),
        }
    }
}

const fn default_copy_to_clipboard() -> bool {
    true
}

const PREFERENCES_DIR: &str = "2fa";
const PREFERENCES_FILE: &str = "preferences.json";

impl Preferences {
    /// Per-user preferences directory, e.g. `~/.config/2fa` on Linux.
    #[must_use]
    pub fn default_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(PREFERENCES_DIR))
    }

    /// Load preferences from `{dir}/preferences.json`.
    ///
    /// Returns [`Default::default()`] when the file is missing, and also
    /// when it is unreadable or invalid JSON (logged as a warning).
    #[must_use]
    pub fn load(dir: &Path) -> Self {
        let path = dir.join(PREFERENCES_FILE);
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "cannot read preferences");
                return Self::default();
            }
        };
        serde_json::from_str(&contents).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "ignoring invalid preferences");
            Self::default()
        })
    }
}
