//! Keychain line format: `name digits secret [counter]`.
//!
//! Fields are separated by single spaces. Names may themselves contain
//! spaces, so the digit field is located from the right: it is the
//! right-most single `6`/`7`/`8` field that is followed by a non-empty
//! field and preceded by at least one name field.

use twofa_otp::{decode_secret, OtpDigits, SecretBytes};

use crate::KeychainError;

/// Width of the zero-padded decimal HOTP counter field.
pub const COUNTER_LEN: usize = 20;

/// How codes are derived for a key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum KeyKind {
    /// Time-based (RFC 6238): counter derived from the clock.
    #[default]
    Totp,
    /// Counter-based (RFC 4226): counter stored in the keychain file.
    Hotp,
}

/// Generation parameters for a new key, supplied by the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct KeySpec {
    /// Code length.
    pub digits: OtpDigits,
    /// TOTP or HOTP.
    pub kind: KeyKind,
}

impl KeySpec {
    /// Build a key spec from the `-7`, `-8` and `-hotp` style selectors.
    ///
    /// Digit count and kind are independent; only asking for both 7 and
    /// 8 digits conflicts.
    ///
    /// # Errors
    /// Returns [`KeychainError::InvalidArguments`] if both `seven` and
    /// `eight` are set.
    pub fn from_flags(seven: bool, eight: bool, hotp: bool) -> Result<Self, KeychainError> {
        let digits = match (seven, eight) {
            (true, true) => {
                return Err(KeychainError::InvalidArguments(
                    "cannot use -7 and -8 together".to_string(),
                ))
            }
            (true, false) => OtpDigits::Seven,
            (false, true) => OtpDigits::Eight,
            (false, false) => OtpDigits::Six,
        };
        let kind = if hotp { KeyKind::Hotp } else { KeyKind::Totp };
        Ok(Self { digits, kind })
    }
}

/// One key loaded from the keychain file.
#[derive(Debug)]
pub struct KeyRecord {
    pub(crate) name: String,
    pub(crate) secret: SecretBytes,
    pub(crate) digits: OtpDigits,
    /// Byte offset of the 20-digit counter field in the file (HOTP only).
    pub(crate) counter_offset: Option<usize>,
}

impl KeyRecord {
    /// Key name as stored (case preserved).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Decoded secret bytes.
    #[must_use]
    pub fn secret(&self) -> &[u8] {
        &self.secret
    }

    /// Code length.
    #[must_use]
    pub const fn digits(&self) -> OtpDigits {
        self.digits
    }

    /// TOTP or HOTP, derived from the presence of a counter field.
    #[must_use]
    pub const fn kind(&self) -> KeyKind {
        if self.counter_offset.is_some() {
            KeyKind::Hotp
        } else {
            KeyKind::Totp
        }
    }

    /// Byte offset of the counter field within the keychain file.
    #[must_use]
    pub const fn counter_offset(&self) -> Option<usize> {
        self.counter_offset
    }
}

/// A successfully parsed line, before its file position is known.
#[derive(Debug)]
pub(crate) struct ParsedLine {
    pub(crate) name: String,
    pub(crate) digits: OtpDigits,
    pub(crate) secret: SecretBytes,
    pub(crate) counter: Option<u64>,
}

fn fields(line: &[u8]) -> Vec<&[u8]> {
    line.split(|&b| b == b' ').collect()
}

/// Index of the digit-count field, if the line has a valid shape.
fn digit_field_index(fields: &[&[u8]]) -> Option<usize> {
    fields
        .windows(2)
        .rposition(|pair| {
            matches!(pair[0], [marker] if OtpDigits::from_marker(*marker).is_some())
                && !pair[1].is_empty()
        })
        .filter(|&idx| idx >= 1)
}

/// Parse a counter field: exactly 20 ASCII digits fitting in a `u64`.
pub(crate) fn parse_counter(field: &[u8]) -> Option<u64> {
    if field.len() != COUNTER_LEN || !field.iter().all(u8::is_ascii_digit) {
        return None;
    }
    std::str::from_utf8(field).ok()?.parse().ok()
}

/// Render a counter value as its fixed-width field.
pub(crate) fn format_counter(counter: u64) -> String {
    format!("{counter:0>COUNTER_LEN$}")
}

/// Parse one line (without its terminator).
///
/// Returns the reason on failure; the caller attaches file and line number.
pub(crate) fn parse_line(line: &[u8]) -> Result<ParsedLine, String> {
    let fields = fields(line);
    let idx = digit_field_index(&fields)
        .ok_or_else(|| "expected `name digits secret [counter]`".to_string())?;
    let (name_fields, rest) = fields.split_at(idx);

    let name = String::from_utf8(name_fields.join(&b' '))
        .map_err(|_| "name is not valid UTF-8".to_string())?;
    let digits = rest[0]
        .first()
        .copied()
        .and_then(OtpDigits::from_marker)
        .ok_or_else(|| "invalid digit count".to_string())?;
    let secret_text =
        std::str::from_utf8(rest[1]).map_err(|_| "secret is not valid UTF-8".to_string())?;
    let secret = decode_secret(secret_text).map_err(|e| e.to_string())?;

    let counter = match &rest[2..] {
        [] => None,
        [field] => Some(
            parse_counter(field)
                .ok_or_else(|| format!("counter must be {COUNTER_LEN} decimal digits"))?,
        ),
        _ => return Err("unexpected fields after secret".to_string()),
    };

    Ok(ParsedLine {
        name,
        digits,
        secret,
        counter,
    })
}

/// Case-insensitive sort key of a raw line: its name field, or the whole
/// line when the shape is unrecognizable.
pub(crate) fn sort_key(line: &[u8]) -> String {
    let fields = fields(line);
    let name = digit_field_index(&fields).map_or_else(
        || line.to_vec(),
        |idx| fields[..idx].join(&b' '),
    );
    String::from_utf8_lossy(&name).to_lowercase()
}

/// Check that a name survives the space-separated line format unchanged.
///
/// # Errors
/// Returns [`KeychainError::InvalidArguments`] describing the problem.
pub fn validate_name(name: &str) -> Result<(), KeychainError> {
    let problem = if name.is_empty() {
        Some("key name must not be empty")
    } else if name.chars().any(char::is_control) {
        Some("key name must not contain control characters")
    } else if name.starts_with(' ') || name.ends_with(' ') || name.contains("  ") {
        Some("key name must not have leading, trailing or repeated spaces")
    } else {
        None
    };
    problem.map_or(Ok(()), |p| {
        Err(KeychainError::InvalidArguments(format!("{p}: {name:?}")))
    })
}

/// Format a new record line. `secret` must already be normalized base32.
#[must_use]
pub fn format_line(name: &str, spec: KeySpec, secret: &str) -> String {
    let mut line = format!("{name} {} {secret}", spec.digits);
    if spec.kind == KeyKind::Hotp {
        line.push(' ');
        line.push_str(&format_counter(0));
    }
    line
}
