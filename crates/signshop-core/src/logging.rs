//! Tracing subscriber setup for hosts and test binaries.

use std::sync::Once;

use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Install a fmt subscriber filtered by `SIGNSHOP_LOG`, then `RUST_LOG`,
/// falling back to `info`. Safe to call more than once; only the first call
/// installs anything, and an already-installed global subscriber is kept.
pub fn init() {
    INIT.call_once(|| {
        let filter = std::env::var("SIGNSHOP_LOG")
            .ok()
            .and_then(|v| EnvFilter::try_new(v).ok())
            .or_else(|| EnvFilter::try_from_default_env().ok())
            .unwrap_or_else(|| EnvFilter::new("info"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .try_init();
    });
}
