//! `2fa --list`

use std::io::{self, Write};

use twofa_keychain::Keychain;

/// Print every key name, one per line, in sorted order.
///
/// # Errors
/// Returns an error if writing to `out` fails.
pub fn run(keychain: &Keychain, out: &mut impl Write) -> io::Result<()> {
    for name in keychain.list() {
        writeln!(out, "{name}")?;
    }
    Ok(())
}
