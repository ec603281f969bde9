//! Logging bootstrap for integration test binaries.
//!
//! Integration tests cannot reach the crate's `#[cfg(test)]` bootstrap, so
//! they call [`init`] from a `ctor` hook instead. Both paths resolve the
//! filter the same way.

use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

static INITIALIZED: OnceCell<()> = OnceCell::new();

/// Filter used when neither `TEST_LOG` nor `RUST_LOG` is set.
pub const DEFAULT_TEST_FILTER: &str = "warn";

/// Install a test-writer subscriber once per process.
///
/// Filter precedence is `TEST_LOG`, then `RUST_LOG`, then
/// [`DEFAULT_TEST_FILTER`]. Safe to call from any number of tests.
pub fn init() {
    INITIALIZED.get_or_init(|| {
        let filter = std::env::var("TEST_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .map(EnvFilter::new)
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_TEST_FILTER));

        // try_init: another harness may already own the global subscriber
        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .without_time()
            .try_init()
            .ok();
    });
}
