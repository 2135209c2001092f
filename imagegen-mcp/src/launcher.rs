//! Server process supervision.
//!
//! [`Launcher::run`] spawns the configured server once and waits for it. The
//! result is a [`LaunchOutcome`]: either the child ran and exited, or it never
//! started. Exactly one of the two is produced per launch.

use std::fmt;
use std::io::{self, Write};
use std::process::ExitStatus;

use tracing::{debug, instrument};

use crate::config::LaunchConfig;
use crate::error::LaunchError;

/// Exit code used when the server could not be started.
pub const FAILURE_EXIT_CODE: i32 = 1;

/// Base added to a signal number to form an exit code (shell convention).
pub const SIGNAL_EXIT_BASE: i32 = 128;

/// How the server process terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatusKind {
    /// Normal exit with a status code
    Code(i32),
    /// Killed by a signal (Unix)
    Signal(i32),
    /// The platform reported neither a code nor a signal
    Unknown,
}

impl ExitStatusKind {
    /// Classify an OS exit status.
    pub fn from_status(status: ExitStatus) -> Self {
        if let Some(code) = status.code() {
            return ExitStatusKind::Code(code);
        }

        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            if let Some(signal) = status.signal() {
                return ExitStatusKind::Signal(signal);
            }
        }

        ExitStatusKind::Unknown
    }

    /// Exit code the launcher should report for this status.
    ///
    /// Codes pass through unchanged. A signal `N` becomes `128 + N`.
    pub fn exit_code(self) -> i32 {
        match self {
            ExitStatusKind::Code(code) => code,
            ExitStatusKind::Signal(signal) => SIGNAL_EXIT_BASE + signal,
            ExitStatusKind::Unknown => FAILURE_EXIT_CODE,
        }
    }
}

impl fmt::Display for ExitStatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitStatusKind::Code(code) => write!(f, "exit code {}", code),
            ExitStatusKind::Signal(signal) => write!(f, "signal {}", signal),
            ExitStatusKind::Unknown => write!(f, "unknown status"),
        }
    }
}

/// Terminal outcome of a launch.
#[derive(Debug)]
pub enum LaunchOutcome {
    /// The server ran and terminated.
    Exited(ExitStatusKind),
    /// The server could not be started.
    FailedToStart(LaunchError),
}

impl LaunchOutcome {
    /// Exit code the launcher should terminate with.
    pub fn exit_code(&self) -> i32 {
        match self {
            LaunchOutcome::Exited(status) => status.exit_code(),
            LaunchOutcome::FailedToStart(_) => FAILURE_EXIT_CODE,
        }
    }
}

impl From<LaunchError> for LaunchOutcome {
    fn from(err: LaunchError) -> Self {
        LaunchOutcome::FailedToStart(err)
    }
}

/// Starts and supervises one server process.
#[derive(Debug, Clone)]
pub struct Launcher {
    config: LaunchConfig,
}

impl Launcher {
    /// Create a launcher for the given configuration.
    pub fn new(config: LaunchConfig) -> Self {
        Self { config }
    }

    /// Spawn the server and wait for it to terminate.
    ///
    /// There is no timeout. If the child never exits, this never returns.
    #[instrument(level = "debug", skip(self))]
    pub async fn run(self) -> LaunchOutcome {
        debug!(
            program = ?self.config.program,
            entry_point = %self.config.entry_point.display(),
            "Spawning server process"
        );

        let mut child = match self.config.command().spawn() {
            Ok(child) => child,
            Err(e) => {
                debug!(error = %e, "Server process failed to spawn");
                return LaunchError::spawn(&self.config.program, &self.config.entry_point, e)
                    .into();
            }
        };

        debug!(pid = ?child.id(), "Server process started");

        match child.wait().await {
            Ok(status) => {
                let status = ExitStatusKind::from_status(status);
                debug!(%status, "Server process exited");
                LaunchOutcome::Exited(status)
            }
            Err(e) => LaunchError::Wait(e).into(),
        }
    }
}

/// Write the launch failure diagnostic.
///
/// Spawn failures get the installation hints. A failed wait means the server
/// did start, so only the error is reported.
pub fn report_failure(err: &LaunchError, out: &mut impl Write) -> io::Result<()> {
    if let LaunchError::Wait(_) = err {
        writeln!(out, "Python server started, but {}", err)?;
        return out.flush();
    }

    writeln!(out, "Failed to start Python server: {}", err)?;
    writeln!(out)?;
    writeln!(out, "Make sure Python 3.10+ is installed and in your PATH.")?;
    writeln!(out, "Install Python dependencies: pip install -e .")?;
    out.flush()
}
