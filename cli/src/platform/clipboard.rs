//! Clipboard write with platform-specific concealment.
//!
//! - **macOS**: `NSPasteboard` plus the `org.nspasteboard.ConcealedType`
//!   marker so clipboard managers skip the entry.
//! - **Windows**: sets `ExcludeClipboardContentFromMonitorProcessing` so
//!   the code stays out of clipboard history.
//! - **Other Unix**: pipes to `wl-copy`, `xclip` or `xsel`, whichever
//!   runs first. No concealment is available there.
//!
//! Callers treat failure as a warning; the code is printed either way.

/// Write `text` to the system clipboard.
///
/// # Errors
///
/// Returns an error string if no clipboard backend accepted the text.
pub fn write_concealed(text: &str) -> Result<(), String> {
    platform_write_concealed(text)
}

// ── macOS ────────────────────────────────────────────────────────────

#[cfg(target_os = "macos")]
fn platform_write_concealed(text: &str) -> Result<(), String> {
    use objc2_app_kit::NSPasteboard;
    use objc2_foundation::{NSData, NSString};

    let pasteboard = NSPasteboard::generalPasteboard();
    pasteboard.clearContents();

    let ok = pasteboard.setString_forType(
        &NSString::from_str(text),
        &NSString::from_str("public.utf8-plain-text"),
    );
    if !ok {
        return Err("failed to write text to NSPasteboard".to_string());
    }

    // Empty data under the concealed type means "don't record this".
    let _ = pasteboard.setData_forType(
        Some(&NSData::new()),
        &NSString::from_str("org.nspasteboard.ConcealedType"),
    );
    Ok(())
}

// ── Windows ──────────────────────────────────────────────────────────

#[cfg(target_os = "windows")]
fn platform_write_concealed(text: &str) -> Result<(), String> {
    use clipboard_win::raw;

    const CF_UNICODETEXT: u32 = 13;

    let cf_exclude = raw::register_format("ExcludeClipboardContentFromMonitorProcessing")
        .ok_or("failed to register clipboard exclusion format")?;

    // raw::close() must run on every path after this.
    raw::open().map_err(|e| format!("failed to open clipboard: {e}"))?;

    let result = (|| -> Result<(), String> {
        let _ = raw::empty();

        let bytes: Vec<u8> = text
            .encode_utf16()
            .chain(std::iter::once(0))
            .flat_map(u16::to_ne_bytes)
            .collect();
        raw::set_without_clear(CF_UNICODETEXT, &bytes)
            .map_err(|e| format!("failed to write text to clipboard: {e}"))?;

        raw::set_without_clear(cf_exclude.get(), &[0u8])
            .map_err(|e| format!("failed to set clipboard exclusion: {e}"))?;
        Ok(())
    })();

    raw::close();
    result
}

// ── Other Unix ───────────────────────────────────────────────────────

#[cfg(all(unix, not(target_os = "macos")))]
const HELPERS: [(&str, &[&str]); 3] = [
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
];

#[cfg(all(unix, not(target_os = "macos")))]
fn platform_write_concealed(text: &str) -> Result<(), String> {
    let mut failures = Vec::with_capacity(HELPERS.len());
    for (program, args) in HELPERS {
        match pipe_to(program, args, text) {
            Ok(()) => {
                tracing::debug!(helper = program, "copied code to clipboard");
                return Ok(());
            }
            Err(e) => failures.push(format!("{program}: {e}")),
        }
    }
    Err(format!("no clipboard helper succeeded ({})", failures.join("; ")))
}

#[cfg(all(unix, not(target_os = "macos")))]
fn pipe_to(program: &str, args: &[&str], text: &str) -> std::io::Result<()> {
    use std::io::Write;
    use std::process::{Command, Stdio};

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;
    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(text.as_bytes())?;
    }
    let status = child.wait()?;
    if status.success() {
        Ok(())
    } else {
        Err(std::io::Error::other(format!("exited with {status}")))
    }
}

#[cfg(not(any(unix, target_os = "windows")))]
fn platform_write_concealed(_text: &str) -> Result<(), String> {
    Err("clipboard not supported on this platform".to_string())
}
