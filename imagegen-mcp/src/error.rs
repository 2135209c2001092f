//! Error types for the launcher.
//!
//! A child that starts and then exits nonzero is not an error here; its code
//! is carried by [`crate::launcher::ExitStatusKind`]. Everything in this module
//! describes a server process that never got to run.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Reasons the server process could not be started or observed.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// The launcher could not determine its own executable path, so the
    /// entry point could not be resolved.
    #[error("could not determine launcher location: {0}")]
    ExecutablePath(#[source] std::io::Error),

    /// The operating system refused to create the child process
    /// (interpreter missing, permission denied, ...).
    #[error("could not spawn '{program}' for {}: {source}", .entry_point.display())]
    Spawn {
        /// Interpreter that was invoked
        program: String,
        /// Server script passed to the interpreter
        entry_point: PathBuf,
        /// Underlying OS error
        #[source]
        source: std::io::Error,
    },

    /// The child was spawned but waiting on it failed.
    #[error("could not wait for server process: {0}")]
    Wait(#[source] std::io::Error),
}

impl LaunchError {
    /// Create a spawn error for `program <entry_point>`.
    ///
    /// # Example
    ///
    /// ```
    /// use imagegen_mcp::LaunchError;
    /// use std::io;
    ///
    /// let err = LaunchError::spawn(
    ///     "python".as_ref(),
    ///     "/opt/imagegen/src/imagegen_mcp/server.py".as_ref(),
    ///     io::Error::from(io::ErrorKind::NotFound),
    /// );
    /// assert!(err.to_string().contains("python"));
    /// assert!(err.to_string().contains("server.py"));
    /// ```
    pub fn spawn(program: &OsStr, entry_point: &Path, source: std::io::Error) -> Self {
        LaunchError::Spawn {
            program: program.to_string_lossy().into_owned(),
            entry_point: entry_point.to_path_buf(),
            source,
        }
    }

    /// Returns true if the interpreter or entry point was not found.
    pub fn is_not_found(&self) -> bool {
        let source = match self {
            LaunchError::ExecutablePath(e) | LaunchError::Wait(e) => e,
            LaunchError::Spawn { source, .. } => source,
        };
        source.kind() == std::io::ErrorKind::NotFound
    }
}

/// Result type alias using [`LaunchError`].
pub type Result<T> = std::result::Result<T, LaunchError>;
