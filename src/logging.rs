//! Log output setup.
//!
//! `RUST_LOG` controls the filter; without it the crate logs at `info`.

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "market_pulse=info";

/// Installs the fmt subscriber. Safe to call more than once.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
