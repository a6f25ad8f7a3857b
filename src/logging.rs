//! `tracing` subscriber setup for the binaries.

use tracing_subscriber::EnvFilter;

/// Build the filter: `RUST_LOG` when set, otherwise `default_directives`.
pub fn env_filter(default_directives: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directives))
        .unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Install a global fmt subscriber writing to stderr.
///
/// Returns `false` if a subscriber was already installed (tests, embedding).
pub fn init(default_directives: &str) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_directives))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .is_ok()
}
