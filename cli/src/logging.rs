//! Logging setup for the CLI.
//!
//! Events go to stderr. The filter is read from `CHATMARK_LOG`, then
//! `RUST_LOG`, and defaults to `warn`. `--verbose` forces `debug`.

use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "CHATMARK_LOG";

pub fn init(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV)
            .or_else(|_| EnvFilter::try_from_default_env())
            .unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    // Safe to call twice; the second subscriber is dropped.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
