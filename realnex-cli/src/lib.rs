// ABOUTME: Shared setup for the realnex command-line tools.
// ABOUTME: Loads .env and installs the tracing subscriber on stderr.

use tracing_subscriber::EnvFilter;

/// Load `.env` if present and send logs to stderr, filtered by `RUST_LOG`.
pub fn init() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
