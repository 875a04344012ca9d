//! Tracing setup for applications embedding the SDK.

use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the fmt subscriber with env-filter support.
///
/// Call once at startup. `RUST_LOG` overrides the default level.
pub fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level.to_string()));

    fmt().with_env_filter(filter).init();
}
