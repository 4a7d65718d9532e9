//! Shared infrastructure for the Coinbase client workspace.
//!
//! Provides environment selection (production vs. sandbox URLs) and
//! logging initialization used by binaries and integration tests.

mod environment;

pub use environment::{Environment, ParseEnvironmentError};

/// Initialize tracing with an env-filter subscriber.
///
/// Reads the `RUST_LOG` environment variable, defaulting to `info`.
/// Intended to be called once at program startup; calling it twice
/// panics, so libraries should never call this.
pub fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
