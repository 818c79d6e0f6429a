//! Base32 secret codec (RFC 4648, `=`-padded, case-insensitive).
//!
//! Stored secrets are the text users paste from a provider's "enter this
//! code instead" dialog, so lowercase input and non-canonical trailing
//! bits are both accepted.

use std::sync::OnceLock;

use data_encoding::{Encoding, Specification};
use zeroize::Zeroizing;

use crate::OtpError;

/// Decoded secret key bytes, wiped from memory on drop.
pub type SecretBytes = Zeroizing<Vec<u8>>;

const BASE32_SYMBOLS: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

/// Base32 works on 8-symbol blocks; `len & PAD_MASK` is `len % 8`.
const PAD_MASK: usize = 7;

fn secret_encoding() -> &'static Encoding {
    static ENCODING: OnceLock<Encoding> = OnceLock::new();
    ENCODING.get_or_init(|| {
        let mut spec = Specification::new();
        spec.symbols.push_str(BASE32_SYMBOLS);
        spec.padding = Some('=');
        spec.translate.from.push_str(&BASE32_SYMBOLS.to_ascii_lowercase());
        spec.translate.to.push_str(BASE32_SYMBOLS);
        spec.check_trailing_bits = false;
        // The specification above is constant and valid; fall back to the
        // strict RFC 4648 table rather than panicking.
        spec.encoding()
            .unwrap_or_else(|_| data_encoding::BASE32.clone())
    })
}

/// Canonicalize user-typed secret text: drop every whitespace character,
/// then right-pad with `=` to a multiple of 8 symbols.
#[must_use]
pub fn normalize_secret(text: &str) -> String {
    let mut secret: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    let pad = secret.len().wrapping_neg() & PAD_MASK;
    secret.extend(std::iter::repeat('=').take(pad));
    secret
}

/// Decode base32 secret text into raw key bytes.
///
/// The input must already be normalized (see [`normalize_secret`]);
/// decoding is case-insensitive.
///
/// # Errors
/// Returns [`OtpError::InvalidSecret`] on symbols outside the base32
/// alphabet or a length that is not a whole number of padded blocks.
pub fn decode_secret(text: &str) -> Result<SecretBytes, OtpError> {
    secret_encoding()
        .decode(text.as_bytes())
        .map(Zeroizing::new)
        .map_err(|e| OtpError::InvalidSecret(e.to_string()))
}

/// Encode raw key bytes as padded, uppercase base32 text.
#[must_use]
pub fn encode_secret(raw: &[u8]) -> String {
    secret_encoding().encode(raw)
}
