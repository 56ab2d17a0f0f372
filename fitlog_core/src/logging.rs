//! Logging setup shared by all binaries.

use tracing_subscriber::EnvFilter;

/// Initialize tracing with a compact format and env-based filtering.
///
/// `RUST_LOG` overrides the default level.
pub fn init(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .compact()
        .init();
}
