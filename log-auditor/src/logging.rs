use tracing_subscriber::{EnvFilter, fmt};

/// Installs the global subscriber. Filtering follows `RUST_LOG` and defaults
/// to `info`; events go to stderr so stdout only carries the result tables.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
