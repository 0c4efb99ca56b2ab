//! Shared setup for integration tests

use tracing_subscriber::EnvFilter;

/// Route crate logs through the test harness; `RUST_LOG` picks the level
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("polarway_forms=debug")),
        )
        .with_test_writer()
        .try_init();
}
