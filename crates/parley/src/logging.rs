//! Logging initialization.
//!
//! Uses the `tracing` ecosystem with pretty or JSON output. Logs go to
//! stderr; stdout is reserved for model responses.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the logging subsystem from config, with CLI overrides.
///
/// `--verbose` forces DEBUG level and `--json-logs` forces JSON output;
/// otherwise the `[logging]` config section decides. The RUST_LOG
/// environment variable overrides the level either way.
pub fn init(config: &parley_core::Config, verbose: bool, json_logs: bool) {
    let default_level = if verbose {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    if json_logs || config.logging.format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .with_ansi(true),
            )
            .init();
    }
}
