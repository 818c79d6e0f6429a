//! Diagnostic logging to stderr.
//!
//! Codes go to stdout, so every log line goes to stderr. The default
//! level is `warn`; `-v` raises it and `RUST_LOG` overrides both.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Map the `-v` count to a default filter directive.
#[must_use]
pub const fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Install the global subscriber. Keep the guard alive until exit so
/// buffered lines are flushed.
#[must_use]
pub fn init(verbosity: u8) -> WorkerGuard {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));
    let (writer, guard) = tracing_appender::non_blocking(std::io::stderr());

    // A second install (tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_target(false)
        .without_time()
        .try_init();

    guard
}
