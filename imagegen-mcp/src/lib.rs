//! imagegen-mcp launcher library
//!
//! Starts the Python image generation MCP server as a child process with
//! inherited standard streams and the caller's environment, and maps the
//! child's termination onto a single exit code.

pub mod config;
pub mod error;
pub mod launcher;
pub mod tracing;

#[cfg(test)]
mod launcher_test;

pub use config::{LaunchConfig, StdioMode};
pub use error::{LaunchError, Result};
pub use launcher::{ExitStatusKind, LaunchOutcome, Launcher, report_failure};
