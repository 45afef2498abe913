//! Shared test setup

use std::sync::Once;

use tracing::info;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

static TEST_SETUP: Once = Once::new();

/// Route `tracing` output of the current test binary through the test
/// harness. `RUST_LOG` narrows it; the default is `trace`.
pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trace"));
        let layer = fmt::layer()
            .with_test_writer()
            .with_target(true)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(filter);

        // another subscriber may already own the global slot
        if tracing_subscriber::registry().with(layer).try_init().is_ok() {
            info!("test logging ready");
        }
    });
}
