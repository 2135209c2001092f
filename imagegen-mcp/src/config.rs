//! Launch configuration for the server process.
//!
//! Everything the child inherits is spelled out in [`LaunchConfig`]: the
//! interpreter, the entry point, how the standard streams are wired, and the
//! environment snapshot. The launcher reads no flags and no config files.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;

use crate::error::{LaunchError, Result};

/// Interpreter used to run the server.
pub const PYTHON_INTERPRETER: &str = "python";

/// Server script location, relative to the directory holding the launcher
/// executable.
pub const SERVER_ENTRY_POINT: [&str; 4] = ["..", "src", "imagegen_mcp", "server.py"];

/// How the child's standard streams are connected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StdioMode {
    /// Child uses the launcher's own stdin/stdout/stderr.
    #[default]
    Inherit,
    /// Child streams are connected to the null device.
    #[cfg(test)]
    Null,
}

impl StdioMode {
    fn stdio(self) -> Stdio {
        match self {
            StdioMode::Inherit => Stdio::inherit(),
            #[cfg(test)]
            StdioMode::Null => Stdio::null(),
        }
    }
}

/// Configuration for a single launch.
#[derive(Debug, Clone)]
pub struct LaunchConfig {
    /// Interpreter looked up on the search path
    pub program: OsString,
    /// Script passed as the interpreter's only argument
    pub entry_point: PathBuf,
    /// Standard stream wiring
    pub stdio: StdioMode,
    /// Complete child environment
    pub env: Vec<(OsString, OsString)>,
}

impl LaunchConfig {
    /// Create a configuration for `program entry_point` with inherited stdio
    /// and a snapshot of the current process environment.
    pub fn new(program: impl Into<OsString>, entry_point: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            entry_point: entry_point.into(),
            stdio: StdioMode::Inherit,
            env: std::env::vars_os().collect(),
        }
    }

    /// Build the production configuration: `python` running the server script
    /// located next to the current executable.
    ///
    /// # Errors
    /// Returns `LaunchError::ExecutablePath` if the launcher's own path cannot
    /// be determined.
    pub fn from_env() -> Result<Self> {
        let exe = std::env::current_exe().map_err(LaunchError::ExecutablePath)?;
        Ok(Self::new(PYTHON_INTERPRETER, resolve_entry_point(&exe)))
    }

    /// Set the standard stream wiring.
    pub fn with_stdio(mut self, stdio: StdioMode) -> Self {
        self.stdio = stdio;
        self
    }

    /// Replace the environment snapshot.
    pub fn with_env<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<OsString>,
        V: Into<OsString>,
    {
        self.env = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self
    }

    /// Look up a variable in the environment snapshot.
    #[cfg(test)]
    fn env_var(&self, key: impl AsRef<OsStr>) -> Option<&OsStr> {
        let key = key.as_ref();
        self.env
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_os_str())
    }

    /// Build the process command for this configuration.
    ///
    /// The child's environment is cleared and refilled from the snapshot so it
    /// matches `env` exactly.
    pub fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command
            .arg(&self.entry_point)
            .env_clear()
            .envs(self.env.iter().map(|(k, v)| (k, v)))
            .stdin(self.stdio.stdio())
            .stdout(self.stdio.stdio())
            .stderr(self.stdio.stdio());
        command
    }
}

/// Resolve the server script from the launcher executable's path.
///
/// The path is joined, not canonicalized; a missing script shows up when the
/// interpreter tries to open it.
pub fn resolve_entry_point(exe: &Path) -> PathBuf {
    let base = exe.parent().unwrap_or_else(|| Path::new(""));
    SERVER_ENTRY_POINT
        .iter()
        .fold(base.to_path_buf(), |path, component| path.join(component))
}
