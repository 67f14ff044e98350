//! Tracing initialization for diagnostic logs. The findings report is not logged.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub const LOG_ENV: &str = "RECORDCHECK_LOG";
const DEFAULT_FILTER: &str = "recordcheck=warn";

static INIT: Once = Once::new();

/// Reads `RECORDCHECK_LOG` (e.g. `recordcheck=debug`). Safe to call more than once.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        let _ = tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
            .with(filter)
            .try_init();
    });
}
