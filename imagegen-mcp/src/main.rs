//! imagegen-mcp
//!
//! Launcher for the image generation MCP server.
//!
//! Runs `python <install root>/src/imagegen_mcp/server.py` with this process's
//! standard streams and environment, then exits with the server's exit code.
//! Arguments given to the launcher are ignored.
//!
//! # Exit codes
//!
//! - the server's own exit code when it exits normally
//! - `128 + N` when the server is killed by signal `N`
//! - `1` when the server could not be started

use std::io;
use std::process;

use anyhow::{Context, Result};
use imagegen_mcp::tracing::try_init_tracing;
use imagegen_mcp::{LaunchConfig, LaunchOutcome, Launcher, report_failure};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Logging is optional; the launch must not depend on it
    let _ = try_init_tracing();

    let outcome = match LaunchConfig::from_env() {
        Ok(config) => Launcher::new(config).run().await,
        Err(err) => LaunchOutcome::FailedToStart(err),
    };

    if let LaunchOutcome::FailedToStart(err) = &outcome {
        tracing::debug!(error = %err, not_found = err.is_not_found(), "Launch failed");
        report_failure(err, &mut io::stderr().lock())
            .context("failed to write launch diagnostic")?;
    }

    process::exit(outcome.exit_code())
}
