//! Tracing initialization for the launcher.
//!
//! Log output always goes to stderr. The child inherits stdout for its
//! protocol traffic, so nothing the launcher logs may land there.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Controls the log level and filtering. Examples:
//!   - `RUST_LOG=debug` - Show spawn, pid and exit status events
//!   - `RUST_LOG=imagegen_mcp=debug` - Same, limited to this crate
//!
//! Without `RUST_LOG` the level is `warn`, which keeps a normal run silent.
//! The variable is still passed through to the server process.

use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    prelude::*,
    util::TryInitError,
};

/// Default filter when `RUST_LOG` is not set.
pub const DEFAULT_LEVEL: &str = "warn";

fn subscriber(default_level: &str) -> impl ::tracing::Subscriber + Send + Sync + 'static {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(false)
        .with_line_number(false)
        .with_span_events(FmtSpan::NONE);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
}

/// Install the stderr subscriber, returning an error if one is already set.
///
/// # Example
///
/// ```
/// use imagegen_mcp::tracing::try_init_tracing;
///
/// // Ok on first call, Err if a subscriber was already installed
/// let _ = try_init_tracing();
/// ```
pub fn try_init_tracing() -> Result<(), TryInitError> {
    subscriber(DEFAULT_LEVEL).try_init()
}
