//! Shared harness for the integration suite: installs the loopback
//! backend before the process-wide isolate is first touched, and wires
//! test-visible tracing output.

use std::sync::Once;

use graalfeed::native::loopback;
use graalfeed::Isolate;

/// Runs once per test binary. Every test calls this first.
pub fn setup() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "graalfeed=debug".into()),
            )
            .with_test_writer()
            .try_init();

        loopback::install();
        assert!(
            Isolate::instance().is_live(),
            "loopback isolate failed to bootstrap"
        );
    });
}
