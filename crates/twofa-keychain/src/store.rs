//! Keychain file storage.
//!
//! The file is the single source of truth. It is read once per process
//! and kept in memory byte-for-byte so that HOTP counter fields can be
//! addressed by offset. Adding keys rewrites the whole file in sorted
//! order; advancing a counter patches its 20 bytes in place.
//!
//! There is no inter-process lock. Two processes advancing the same HOTP
//! key concurrently may both read counter N and both emit the code for
//! N+1, and the last writer wins. This is accepted for a single-user
//! tool.

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::record::{self, KeyRecord, COUNTER_LEN};
use crate::KeychainError;

/// Permission bits for the keychain file: owner read/write only.
#[cfg(unix)]
const KEYCHAIN_MODE: u32 = 0o600;

/// In-memory view of one keychain file.
#[derive(Debug)]
pub struct Keychain {
    path: PathBuf,
    data: Vec<u8>,
    keys: BTreeMap<String, KeyRecord>,
    warnings: Vec<KeychainError>,
}

impl Keychain {
    /// Load the keychain at `path`.
    ///
    /// A missing file is an empty keychain. Malformed lines are logged,
    /// recorded in [`Keychain::warnings`] and skipped.
    ///
    /// # Errors
    /// Returns [`KeychainError::Io`] if the file exists but cannot be read.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, KeychainError> {
        let path = path.into();
        let data = match fs::read(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self::from_bytes(path, data))
    }

    /// Index raw file content.
    fn from_bytes(path: PathBuf, data: Vec<u8>) -> Self {
        let mut keys = BTreeMap::new();
        let mut warnings = Vec::new();
        let mut cursor = 0usize;

        for (idx, raw_line) in data.split_inclusive(|&b| b == b'\n').enumerate() {
            let lineno = idx.saturating_add(1);
            let line_start = cursor;
            cursor = cursor.saturating_add(raw_line.len());

            let line = raw_line.strip_suffix(b"\n").unwrap_or(raw_line);
            if line.is_empty() {
                continue;
            }

            let parsed = match record::parse_line(line) {
                Ok(parsed) => parsed,
                Err(reason) => {
                    let warning = KeychainError::MalformedRecord {
                        file: path.clone(),
                        line: lineno,
                        reason,
                    };
                    tracing::warn!(file = %path.display(), line = lineno, "{warning}");
                    warnings.push(warning);
                    continue;
                }
            };

            // The counter is the last field: its 20 digits end where the
            // line's content ends, just before any terminator.
            let counter_offset = parsed.counter.map(|_| {
                line_start
                    .saturating_add(line.len())
                    .saturating_sub(COUNTER_LEN)
            });

            let name = parsed.name;
            if keys.contains_key(&name) {
                tracing::warn!(
                    file = %path.display(),
                    line = lineno,
                    key = %name,
                    "duplicate key; later line wins"
                );
            }
            keys.insert(
                name.clone(),
                KeyRecord {
                    name,
                    secret: parsed.secret,
                    digits: parsed.digits,
                    counter_offset,
                },
            );
        }

        Self {
            path,
            data,
            keys,
            warnings,
        }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw file content as last loaded or written by this process.
    #[must_use]
    pub fn raw(&self) -> &[u8] {
        &self.data
    }

    /// Look up a key by exact name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&KeyRecord> {
        self.keys.get(name)
    }

    /// All key names in byte order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.keys.keys().map(String::as_str)
    }

    /// All key records in name byte order.
    pub fn records(&self) -> impl Iterator<Item = &KeyRecord> {
        self.keys.values()
    }

    /// Number of keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether the keychain holds no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Malformed-line reports collected while loading.
    #[must_use]
    pub fn warnings(&self) -> &[KeychainError] {
        &self.warnings
    }

    // ── Sorted rewrite ──────────────────────────────────────────────

    /// Non-empty lines of the current file content, byte-exact and
    /// including lines that failed to parse.
    fn existing_lines(&self) -> Vec<Vec<u8>> {
        self.data
            .split(|&b| b == b'\n')
            .filter(|line| !line.is_empty())
            .map(<[u8]>::to_vec)
            .collect()
    }

    /// Merge `new_lines` into the file, keeping it sorted, and rewrite it.
    ///
    /// The in-memory index is rebuilt from the written bytes so counter
    /// offsets stay valid.
    ///
    /// # Errors
    /// Returns [`KeychainError::Io`] if the file cannot be written.
    pub fn add_lines(&mut self, new_lines: &[String]) -> Result<(), KeychainError> {
        let lines = merge_sorted(self.existing_lines(), new_lines);
        let data = render(&lines);
        write_private(&self.path, &data)?;
        tracing::debug!(
            file = %self.path.display(),
            records = lines.len(),
            "rewrote keychain"
        );

        let rebuilt = Self::from_bytes(self.path.clone(), data);
        self.data = rebuilt.data;
        self.keys = rebuilt.keys;
        Ok(())
    }

    // ── In-place counter update ─────────────────────────────────────

    /// Advance the stored counter of HOTP key `name` and return the new
    /// value, which is the counter to generate the next code from.
    ///
    /// The field is read from the live file, incremented, written back at
    /// the same offset and synced before the value is returned, so a
    /// returned counter is never handed out twice by this process.
    ///
    /// # Errors
    /// - [`KeychainError::NoSuchKey`] if `name` is not stored.
    /// - [`KeychainError::InvalidArguments`] if the key is time-based.
    /// - [`KeychainError::CorruptCounter`] if the field is unreadable or
    ///   already at `u64::MAX`.
    /// - [`KeychainError::Io`] if the file cannot be opened or written.
    pub fn advance_counter(&mut self, name: &str) -> Result<u64, KeychainError> {
        let record = self
            .keys
            .get(name)
            .ok_or_else(|| KeychainError::NoSuchKey(name.to_string()))?;
        let offset = record.counter_offset.ok_or_else(|| {
            KeychainError::InvalidArguments(format!("{name:?} is not a counter-based key"))
        })?;
        let corrupt = |reason: &str| KeychainError::CorruptCounter {
            name: name.to_string(),
            reason: reason.to_string(),
        };
        let position = u64::try_from(offset).map_err(|_| corrupt("offset out of range"))?;

        let mut file = OpenOptions::new().read(true).write(true).open(&self.path)?;
        let current = read_counter_field(&mut file, position).map_err(|e| match e {
            CounterReadError::Io(err) => KeychainError::Io(err),
            CounterReadError::Invalid(field) => corrupt(&format!("{field:?}")),
        })?;
        let next = current
            .checked_add(1)
            .ok_or_else(|| corrupt("counter exhausted"))?;

        let field = record::format_counter(next);
        file.seek(SeekFrom::Start(position))?;
        file.write_all(field.as_bytes())?;
        file.sync_data()?;

        if let Some(span) = offset
            .checked_add(COUNTER_LEN)
            .and_then(|end| self.data.get_mut(offset..end))
        {
            span.copy_from_slice(field.as_bytes());
        }
        tracing::debug!(key = %name, counter = next, "advanced HOTP counter");
        Ok(next)
    }
}

enum CounterReadError {
    Io(io::Error),
    Invalid(String),
}

fn read_counter_field(file: &mut File, position: u64) -> Result<u64, CounterReadError> {
    let mut field = [0u8; COUNTER_LEN];
    file.seek(SeekFrom::Start(position))
        .map_err(CounterReadError::Io)?;
    match file.read_exact(&mut field) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
            return Err(CounterReadError::Invalid("truncated file".to_string()));
        }
        Err(e) => return Err(CounterReadError::Io(e)),
    }
    record::parse_counter(&field)
        .ok_or_else(|| CounterReadError::Invalid(String::from_utf8_lossy(&field).into_owned()))
}

/// Combine existing and new lines, sorted case-insensitively by name.
///
/// Equal names fall back to raw byte order so the result depends only on
/// the set of lines, not the order they arrive in.
#[must_use]
pub fn merge_sorted(existing: Vec<Vec<u8>>, new_lines: &[String]) -> Vec<Vec<u8>> {
    let mut lines = existing;
    lines.extend(new_lines.iter().map(|line| line.as_bytes().to_vec()));
    let mut keyed: Vec<(String, Vec<u8>)> = lines
        .into_iter()
        .map(|line| (record::sort_key(&line), line))
        .collect();
    keyed.sort();
    keyed.into_iter().map(|(_, line)| line).collect()
}

/// Serialize lines as the file body, one `\n`-terminated line each.
#[must_use]
pub fn render(lines: &[Vec<u8>]) -> Vec<u8> {
    let mut out = Vec::with_capacity(lines.iter().map(|l| l.len().saturating_add(1)).sum());
    for line in lines {
        out.extend_from_slice(line);
        out.push(b'\n');
    }
    out
}

/// Truncate and write `path` with owner-only permissions.
fn write_private(path: &Path, data: &[u8]) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.create(true).write(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(KEYCHAIN_MODE);
    }
    let mut file = options.open(path)?;
    // `mode` only applies on creation; tighten an existing file too.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(KEYCHAIN_MODE))?;
    }
    file.write_all(data)?;
    file.sync_all()
}
