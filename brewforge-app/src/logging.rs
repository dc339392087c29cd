//! Log setup. Command output goes to stdout; logs go to stderr so they never
//! mix with a recipe link or a CSV path that a script might capture.

use std::io;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// `-v` count to level: none shows warnings only, then info, debug and trace.
pub fn level_for_verbosity(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Installs the global subscriber. `RUST_LOG`, when set, replaces the level from `-v`.
pub fn init_logging(verbose: u8) {
    let level = level_for_verbosity(verbose);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("brewforge={level},brewforge_core={level},warn")));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr).with_target(verbose > 1).without_time())
        .init();
}
