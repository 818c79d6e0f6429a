//! `2fa --add [-7] [-8] [--hotp] NAME`

use std::io::{BufRead, Write};

use anyhow::{bail, Context};
use twofa_keychain::{KeySpec, Keychain};

/// Prompt for a secret on `prompt`, read one line from `input` and store
/// the key.
///
/// # Errors
/// Returns an error if input ends before a line is read, or if the
/// keychain rejects the name or secret.
pub fn run(
    keychain: &mut Keychain,
    name: &str,
    spec: KeySpec,
    input: &mut impl BufRead,
    prompt: &mut impl Write,
) -> anyhow::Result<()> {
    write!(prompt, "2fa key for {name}: ")?;
    prompt.flush()?;

    let mut line = String::new();
    let read = input.read_line(&mut line).context("error reading key")?;
    if read == 0 {
        bail!("error reading key: unexpected end of input");
    }

    keychain.add_key(name, spec, &line)?;
    Ok(())
}
