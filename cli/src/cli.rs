//! Command-line arguments.

use std::path::PathBuf;

use clap::{ArgAction, Parser};
use twofa_keychain::{ImportFormat, KeySpec, KeychainError};

/// Two-factor authentication agent.
///
/// With no arguments, prints codes for all time-based keys.
#[derive(Parser, Debug)]
#[command(name = "2fa", version, about)]
pub struct Cli {
    /// Add a key, reading its secret from standard input.
    #[arg(long, requires = "name", conflicts_with_all = ["list", "import"])]
    pub add: bool,

    /// Generate 7-digit codes (with --add).
    #[arg(short = '7', requires = "add")]
    pub seven: bool,

    /// Generate 8-digit codes (with --add).
    #[arg(short = '8', requires = "add")]
    pub eight: bool,

    /// Add the key as counter-based (HOTP) instead of time-based (with --add).
    #[arg(long, requires = "add")]
    pub hotp: bool,

    /// List key names.
    #[arg(long, conflicts_with_all = ["name", "import"])]
    pub list: bool,

    /// Import keys from another authenticator's export (format: 2fas).
    #[arg(long, num_args = 2, value_names = ["FORMAT", "FILE"], conflicts_with = "name")]
    pub import: Option<Vec<String>>,

    /// Keychain file [default: $HOME/.2fa].
    #[arg(long, env = "TWOFA_KEYCHAIN", value_name = "PATH")]
    pub keychain: Option<PathBuf>,

    /// Do not copy a single generated code to the clipboard.
    #[arg(long)]
    pub no_clip: bool,

    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Key name; exact or fuzzy.
    pub name: Option<String>,
}

/// What one invocation does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Add a key.
    Add {
        /// Name to store under.
        name: String,
        /// Digits and kind.
        spec: KeySpec,
    },
    /// Print key names.
    List,
    /// Print code(s) for a name.
    Show {
        /// Exact or fuzzy name.
        name: String,
    },
    /// Print codes for every time-based key.
    ShowAll,
    /// Import from an export file.
    Import {
        /// Export format.
        format: ImportFormat,
        /// Export file.
        file: PathBuf,
    },
}

impl Cli {
    /// Turn parsed flags into a single [`Mode`].
    ///
    /// # Errors
    /// Returns [`KeychainError::InvalidArguments`] for `-7` with `-8` or
    /// an unknown import format.
    pub fn mode(&self) -> Result<Mode, KeychainError> {
        if self.list {
            return Ok(Mode::List);
        }
        if let Some(args) = &self.import {
            let [format, file] = args.as_slice() else {
                return Err(KeychainError::InvalidArguments(
                    "--import takes FORMAT and FILE".to_string(),
                ));
            };
            return Ok(Mode::Import {
                format: format.parse()?,
                file: PathBuf::from(file),
            });
        }
        match (&self.name, self.add) {
            (Some(name), true) => Ok(Mode::Add {
                name: name.clone(),
                spec: KeySpec::from_flags(self.seven, self.eight, self.hotp)?,
            }),
            (Some(name), false) => Ok(Mode::Show { name: name.clone() }),
            (None, false) => Ok(Mode::ShowAll),
            (None, true) => Err(KeychainError::InvalidArguments(
                "--add requires a key name".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use twofa_keychain::KeyKind;
    use twofa_otp::OtpDigits;

    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("2fa").chain(args.iter().copied()))
    }

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn bare_invocation_shows_all() {
        assert_eq!(parse(&[]).unwrap().mode().unwrap(), Mode::ShowAll);
    }

    #[test]
    fn name_shows_code() {
        assert_eq!(
            parse(&["github"]).unwrap().mode().unwrap(),
            Mode::Show {
                name: "github".to_string()
            }
        );
    }

    #[test]
    fn add_with_digit_and_kind_flags() {
        let mode = parse(&["--add", "-8", "--hotp", "bank"])
            .unwrap()
            .mode()
            .unwrap();
        assert_eq!(
            mode,
            Mode::Add {
                name: "bank".to_string(),
                spec: KeySpec {
                    digits: OtpDigits::Eight,
                    kind: KeyKind::Hotp,
                },
            }
        );
    }

    #[test]
    fn seven_and_eight_together_is_invalid() {
        let cli = parse(&["--add", "-7", "-8", "bank"]).unwrap();
        assert!(matches!(
            cli.mode(),
            Err(KeychainError::InvalidArguments(_))
        ));
    }

    #[test]
    fn digit_flags_require_add() {
        assert!(parse(&["-7", "bank"]).is_err());
    }

    #[test]
    fn list_conflicts_with_name() {
        assert!(parse(&["--list", "github"]).is_err());
        assert_eq!(parse(&["--list"]).unwrap().mode().unwrap(), Mode::List);
    }

    #[test]
    fn import_takes_format_and_file() {
        let mode = parse(&["--import", "2fas", "backup.json"])
            .unwrap()
            .mode()
            .unwrap();
        assert_eq!(
            mode,
            Mode::Import {
                format: ImportFormat::TwoFas,
                file: PathBuf::from("backup.json"),
            }
        );
        let unknown = parse(&["--import", "aegis", "backup.json"]).unwrap();
        assert!(matches!(
            unknown.mode(),
            Err(KeychainError::InvalidArguments(_))
        ));
    }
}
