//! 2fa: two-factor authentication agent.
//!
//! Thin command-line shell over `twofa-keychain`: argument parsing,
//! keychain path resolution, terminal output and clipboard.
//!
//! ```text
//! 2fa --add [-7] [-8] [--hotp] NAME
//! 2fa --list
//! 2fa NAME
//! 2fa
//! 2fa --import 2fas FILE
//! ```

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::arithmetic_side_effects))]

pub mod cli;
pub mod commands;
pub mod logging;
pub mod platform;
pub mod preferences;

use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::SystemTime;

use anyhow::Context;
use twofa_keychain::Keychain;

pub use cli::{Cli, Mode};
use preferences::Preferences;

/// Default keychain file name inside the home directory.
const DEFAULT_KEYCHAIN_FILE: &str = ".2fa";

/// Resolve the keychain path: explicit flag or environment, then
/// preferences, then `$HOME/.2fa`.
///
/// # Errors
/// Returns an error if no path is configured and the home directory is
/// unknown.
pub fn resolve_keychain_path(
    explicit: Option<&Path>,
    prefs: &Preferences,
) -> anyhow::Result<PathBuf> {
    if let Some(path) = explicit.or(prefs.keychain_path.as_deref()) {
        return Ok(path.to_path_buf());
    }
    dirs::home_dir()
        .map(|home| home.join(DEFAULT_KEYCHAIN_FILE))
        .context("cannot determine home directory; pass --keychain")
}

/// Run one invocation.
///
/// # Errors
/// Returns any keychain, I/O or argument error; the caller prints it.
pub fn run(cli: &Cli) -> anyhow::Result<ExitCode> {
    let mode = cli.mode()?;
    let prefs = Preferences::default_dir()
        .map(|dir| Preferences::load(&dir))
        .unwrap_or_default();
    let path = resolve_keychain_path(cli.keychain.as_deref(), &prefs)?;
    let mut keychain = Keychain::load(&path)?;
    let clip = prefs.copy_to_clipboard && !cli.no_clip;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match mode {
        Mode::List => commands::list::run(&keychain, &mut out)?,
        Mode::ShowAll => commands::show::run_all(&keychain, SystemTime::now(), &mut out)?,
        Mode::Show { name } => {
            let shown = commands::show::run(
                &mut keychain,
                &name,
                SystemTime::now(),
                clip,
                &mut out,
                &mut io::stderr(),
            )?;
            if shown == commands::show::Shown::Many {
                return Ok(ExitCode::FAILURE);
            }
        }
        Mode::Add { name, spec } => {
            commands::add::run(
                &mut keychain,
                &name,
                spec,
                &mut io::stdin().lock(),
                &mut io::stderr(),
            )?;
        }
        Mode::Import { format, file } => {
            commands::import::run(&mut keychain, format, &file, &mut out)?;
        }
    }
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_path_wins_over_preferences() {
        let prefs = Preferences {
            keychain_path: Some(PathBuf::from("/prefs/keychain")),
            ..Preferences::default()
        };
        let resolved = resolve_keychain_path(Some(Path::new("/flag/keychain")), &prefs).unwrap();
        assert_eq!(resolved, PathBuf::from("/flag/keychain"));
    }

    #[test]
    fn preferences_path_used_without_flag() {
        let prefs = Preferences {
            keychain_path: Some(PathBuf::from("/prefs/keychain")),
            ..Preferences::default()
        };
        assert_eq!(
            resolve_keychain_path(None, &prefs).unwrap(),
            PathBuf::from("/prefs/keychain")
        );
    }

    #[test]
    fn default_path_is_dotfile_in_home() {
        if let Ok(path) = resolve_keychain_path(None, &Preferences::default()) {
            assert!(path.ends_with(DEFAULT_KEYCHAIN_FILE));
        }
    }
}
