//! `2fa --import FORMAT FILE`

use std::io::Write;
use std::path::Path;

use twofa_keychain::{read_export, ImportFormat, Keychain};

/// Import every usable entry from an export file.
///
/// Prints one line per imported key, then one line per entry left out
/// with the reason, then a summary.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed, or if the
/// keychain rewrite fails.
pub fn run(
    keychain: &mut Keychain,
    format: ImportFormat,
    file: &Path,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let parsed = read_export(format, file)?;
    let report = keychain.import(parsed.candidates)?;

    for name in &report.imported {
        writeln!(out, "imported\t{name}")?;
    }
    for entry in parsed
        .unsupported
        .iter()
        .chain(&parsed.malformed)
        .chain(&report.skipped)
    {
        writeln!(out, "skipped\t{}\t{}", entry.name, entry.reason)?;
    }
    writeln!(
        out,
        "Successfully imported {} key(s)",
        report.imported.len()
    )?;
    Ok(())
}
