//! `2fa NAME` and bare `2fa`.

use std::io::Write;
use std::time::SystemTime;

use twofa_keychain::{CodeOutcome, Keychain};

use crate::platform::clipboard;

/// How many keys a `2fa NAME` lookup printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shown {
    /// One key matched; its code was printed and maybe copied.
    One,
    /// Several keys matched fuzzily; all were printed, none copied.
    Many,
}

/// Print the code for `query`.
///
/// A single match is printed as `CODE<TAB>NAME`, or as
/// `copied<TAB>CODE<TAB>NAME` when `clip` is set and the clipboard write
/// succeeds. Several fuzzy matches are printed as a listing after a
/// header on `err`.
///
/// # Errors
/// Returns the keychain error for no match, a corrupt counter or a
/// failed counter write, or an I/O error from `out`/`err`.
pub fn run(
    keychain: &mut Keychain,
    query: &str,
    now: SystemTime,
    clip: bool,
    out: &mut impl Write,
    err: &mut impl Write,
) -> anyhow::Result<Shown> {
    match keychain.emit_code(query, now)? {
        CodeOutcome::Single(generated) => {
            let code = generated.code.to_string();
            if clip && copy(&code) {
                writeln!(out, "copied\t{code}\t{}", generated.name)?;
            } else {
                writeln!(out, "{code}\t{}", generated.name)?;
            }
            Ok(Shown::One)
        }
        CodeOutcome::Multiple(matches) => {
            writeln!(err, "2fa: multiple keys match {query:?}:")?;
            super::print_rows(
                out,
                matches.iter().map(|m| {
                    let width = usize::from(m.code.digits().value());
                    (m.code, m.name.as_str(), width)
                }),
            )?;
            Ok(Shown::Many)
        }
    }
}

fn copy(code: &str) -> bool {
    match clipboard::write_concealed(code) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("clipboard: {e}");
            false
        }
    }
}

/// Print the current code of every time-based key; counter-based keys
/// show dashes and are not advanced.
///
/// # Errors
/// Returns an error if the clock is before the Unix epoch or writing to
/// `out` fails.
pub fn run_all(keychain: &Keychain, now: SystemTime, out: &mut impl Write) -> anyhow::Result<()> {
    let listing = keychain.emit_all_time_based_codes(now)?;
    super::print_rows(
        out,
        listing
            .iter()
            .map(|row| (row.code, row.name.as_str(), row.code.width())),
    )?;
    Ok(())
}
