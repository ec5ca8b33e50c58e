//! Logging setup
//!
//! The library itself only emits `tracing` events. Applications that want
//! them printed call [`init_tracing`] once at startup.

use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: OnceCell<()> = OnceCell::new();

/// Default filter when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Install a global `fmt` subscriber filtered by `RUST_LOG`
///
/// `json` selects JSON lines instead of the human-readable format. Calling
/// this more than once, or after another subscriber was installed, is a
/// no-op.
pub fn init_tracing(json: bool) {
    INIT.get_or_init(|| {
        let filter =
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

        let registry = tracing_subscriber::registry().with(filter);
        let result = if json {
            registry.with(fmt::layer().json()).try_init()
        } else {
            registry.with(fmt::layer()).try_init()
        };

        if result.is_err() {
            tracing::debug!("global tracing subscriber already installed");
        }
    });
}
