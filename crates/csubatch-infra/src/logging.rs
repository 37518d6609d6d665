//! Process-wide `tracing` initialization.

/// Installs a global `tracing` subscriber.
///
/// `level` is used only as a fallback default filter; `RUST_LOG` in the
/// environment always takes precedence, matching the convention this
/// workspace's teacher crate follows for its own CLI entrypoint.
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(true)
        .with_line_number(true)
        .init();
}
