//! Logging init for binaries and tests that embed the retriers.
//!
//! The retry loops only emit `tracing` events; nothing is printed unless the
//! host installs a subscriber.

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,reattempt_core=debug";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install a stderr subscriber honouring `RUST_LOG`.
/// Fails if a global subscriber is already set.
pub fn init_logging_stderr() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow!("failed to install tracing subscriber: {}", e))?;
    tracing::info!("reattempt logging initialized");
    Ok(())
}

/// Subscriber for test binaries: output is captured by the test harness and
/// repeated calls are no-ops.
pub fn try_init_for_tests() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        try_init_for_tests();
        try_init_for_tests();
        // A global subscriber now exists, so a second install must fail.
        assert!(init_logging_stderr().is_err());
    }
}
