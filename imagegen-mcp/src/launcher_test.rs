//! Tests for server process supervision.
//!
//! Exit-code mapping is checked with property tests. The spawn tests run a
//! shell script as a stand-in server, so they are Unix-only.

use proptest::prelude::*;

use crate::error::LaunchError;
use crate::launcher::{
    ExitStatusKind, FAILURE_EXIT_CODE, LaunchOutcome, SIGNAL_EXIT_BASE, report_failure,
};

proptest! {
    /// A child's exit code is reported unchanged.
    #[test]
    fn exit_code_passes_through(code in 0i32..=255) {
        prop_assert_eq!(ExitStatusKind::Code(code).exit_code(), code);
        prop_assert_eq!(LaunchOutcome::Exited(ExitStatusKind::Code(code)).exit_code(), code);
    }

    /// A signal-terminated child maps to 128 + signal.
    #[test]
    fn signal_maps_above_base(signal in 1i32..=64) {
        let code = ExitStatusKind::Signal(signal).exit_code();
        prop_assert_eq!(code, SIGNAL_EXIT_BASE + signal);
        prop_assert!(code > SIGNAL_EXIT_BASE);
    }

    /// Every failure to start exits with the fixed failure code.
    #[test]
    fn failed_to_start_always_exits_one(message in "[A-Za-z0-9 ]{1,40}") {
        let err = LaunchError::Wait(std::io::Error::other(message));
        prop_assert_eq!(LaunchOutcome::FailedToStart(err).exit_code(), FAILURE_EXIT_CODE);
    }
}

#[test]
fn test_unknown_status_is_failure() {
    assert_eq!(ExitStatusKind::Unknown.exit_code(), FAILURE_EXIT_CODE);
}

#[test]
fn test_exit_status_display() {
    assert_eq!(ExitStatusKind::Code(3).to_string(), "exit code 3");
    assert_eq!(ExitStatusKind::Signal(9).to_string(), "signal 9");
    assert_eq!(ExitStatusKind::Unknown.to_string(), "unknown status");
}

#[test]
fn test_report_failure_includes_hints() {
    let err = LaunchError::spawn(
        "python".as_ref(),
        "/srv/src/imagegen_mcp/server.py".as_ref(),
        std::io::Error::from(std::io::ErrorKind::NotFound),
    );
    let mut out = Vec::new();
    report_failure(&err, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    let lines: Vec<_> = text.lines().collect();

    assert!(lines[0].starts_with("Failed to start Python server: "));
    assert!(lines[0].contains("server.py"));
    assert_eq!(lines[1], "");
    assert_eq!(
        lines[2],
        "Make sure Python 3.10+ is installed and in your PATH."
    );
    assert_eq!(lines[3], "Install Python dependencies: pip install -e .");
    assert_eq!(lines.len(), 4);
}

#[test]
fn test_report_wait_failure_is_not_a_start_failure() {
    let err = LaunchError::Wait(std::io::Error::other("interrupted wait"));
    let mut out = Vec::new();
    report_failure(&err, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();

    assert_eq!(
        text,
        "Python server started, but could not wait for server process: interrupted wait\n"
    );
    assert!(!text.contains("Failed to start"));
    assert!(!text.contains("pip install"));
}

#[cfg(unix)]
mod spawn {
    use std::fs;
    use std::path::PathBuf;

    use tempfile::TempDir;

    use crate::config::{LaunchConfig, StdioMode};
    use crate::error::LaunchError;
    use crate::launcher::{ExitStatusKind, LaunchOutcome, Launcher};

    /// Write `body` as a server script and return a config running it under `sh`.
    fn sh_server(dir: &TempDir, body: &str) -> LaunchConfig {
        let script = dir.path().join("server.py");
        fs::write(&script, body).unwrap();
        LaunchConfig::new("sh", script).with_stdio(StdioMode::Null)
    }

    #[tokio::test]
    async fn test_child_exit_zero() {
        let dir = TempDir::new().unwrap();
        let outcome = Launcher::new(sh_server(&dir, "exit 0\n")).run().await;

        assert!(matches!(
            outcome,
            LaunchOutcome::Exited(ExitStatusKind::Code(0))
        ));
        assert_eq!(outcome.exit_code(), 0);
    }

    #[tokio::test]
    async fn test_child_nonzero_exit_is_propagated() {
        let dir = TempDir::new().unwrap();
        for code in [1, 2, 42, 127, 255] {
            let config = sh_server(&dir, &format!("exit {}\n", code));
            let outcome = Launcher::new(config).run().await;
            assert_eq!(outcome.exit_code(), code, "outcome: {:?}", outcome);
        }
    }

    #[tokio::test]
    async fn test_child_killed_by_signal() {
        let dir = TempDir::new().unwrap();
        let outcome = Launcher::new(sh_server(&dir, "kill -9 $$\n")).run().await;

        assert!(matches!(
            outcome,
            LaunchOutcome::Exited(ExitStatusKind::Signal(9))
        ));
        assert_eq!(outcome.exit_code(), 137);
    }

    #[tokio::test]
    async fn test_missing_interpreter_fails_to_start() {
        let dir = TempDir::new().unwrap();
        let config = LaunchConfig::new(
            dir.path().join("no-such-python"),
            dir.path().join("server.py"),
        )
        .with_stdio(StdioMode::Null);

        let outcome = Launcher::new(config).run().await;
        match outcome {
            LaunchOutcome::FailedToStart(ref err @ LaunchError::Spawn { .. }) => {
                assert!(err.is_not_found());
            }
            ref other => panic!("expected spawn failure, got {:?}", other),
        }
        assert_eq!(outcome.exit_code(), 1);
    }

    #[tokio::test]
    async fn test_interpreter_not_on_search_path() {
        let dir = TempDir::new().unwrap();
        let empty_bin = dir.path().join("bin");
        fs::create_dir(&empty_bin).unwrap();

        let config = LaunchConfig::new("python", dir.path().join("server.py"))
            .with_env([("PATH", empty_bin.as_os_str())])
            .with_stdio(StdioMode::Null);

        let outcome = Launcher::new(config).run().await;
        assert!(matches!(outcome, LaunchOutcome::FailedToStart(_)));
        assert_eq!(outcome.exit_code(), 1);
    }

    #[tokio::test]
    async fn test_environment_passthrough_is_exact() {
        let dir = TempDir::new().unwrap();
        let out: PathBuf = dir.path().join("env.txt");
        let config = sh_server(&dir, &format!("env > '{}'\n", out.display())).with_env([
            ("OPENAI_API_KEY", "sk-test"),
            ("IMAGEGEN_MARKER", "present"),
            ("PATH", "/usr/bin:/bin"),
        ]);

        let outcome = Launcher::new(config).run().await;
        assert_eq!(outcome.exit_code(), 0);

        let env = fs::read_to_string(&out).unwrap();
        assert!(env.lines().any(|l| l == "OPENAI_API_KEY=sk-test"));
        assert!(env.lines().any(|l| l == "IMAGEGEN_MARKER=present"));

        // Only the snapshot plus what the shell itself exports
        let allowed = [
            "OPENAI_API_KEY",
            "IMAGEGEN_MARKER",
            "PATH",
            "PWD",
            "OLDPWD",
            "SHLVL",
            "_",
        ];
        for (name, _) in env.lines().filter_map(|l| l.split_once('=')) {
            assert!(allowed.contains(&name), "unexpected variable {} in child", name);
        }
    }
}
