//! Logging infrastructure for dosecalc.
//!
//! Every binary logs to stderr, so calculation results printed on stdout can
//! be piped or parsed (`calc --json`) without log lines mixed in.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the stderr subscriber at `warn`
///
/// Only non-positive weight/dose warnings and calculation errors show up at
/// this level; config and catalog messages are `info`/`debug`. `RUST_LOG`
/// takes precedence when set.
pub fn init() {
    init_with_level("warn")
}

/// Install the stderr subscriber with `default_level` as the fallback filter
///
/// The CLI passes `"debug"` for `--verbose` to trace each computation.
/// `RUST_LOG` still wins over `default_level`.
pub fn init_with_level(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}

/// Route logs through the test harness writer at `debug`
#[cfg(test)]
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::new("debug"))
        .try_init();
}
