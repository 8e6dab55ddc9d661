//! Logging bootstrap for the job client binary and for applications that
//! embed the client without installing their own subscriber.

use tracing_subscriber::EnvFilter;

/// Installs a `fmt` subscriber.
///
/// `RUST_LOG`, when set and valid, wins over the configured level, so a
/// single module can be turned up (`RUST_LOG=nunggu::transport=trace`)
/// without touching `[logging] level`. Does nothing if a global subscriber
/// is already installed.
pub fn init(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_directive(level)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// Maps a configured level name onto a filter directive; unknown names mean
/// `info`.
pub(crate) fn level_directive(level: &str) -> &'static str {
    match level.trim().to_ascii_lowercase().as_str() {
        "error" => "error",
        "warn" | "warning" => "warn",
        "debug" => "debug",
        "trace" => "trace",
        "off" => "off",
        _ => "info",
    }
}
