//! Local execution of generated commands.
use std::io::Write as _;
use std::process::{Command, Output, Stdio};

use crate::command::Cmd;
use crate::error::ExecError;

/// Result of a command execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecResult {
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
    /// Whether the process exited successfully.
    pub success: bool,
    /// Exit code, if the process was not terminated by a signal.
    pub code: Option<i32>,
}

impl From<Output> for ExecResult {
    fn from(output: Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
            code: output.status.code(),
        }
    }
}

/// Runs [`Cmd`]s. Abstracted so command sequencing can be tested without
/// spawning processes.
pub trait Executor {
    /// Run `cmd` to completion, feeding its `stdin` if present.
    ///
    /// # Errors
    ///
    /// Returns an [`ExecError`] if the process cannot be started or exits
    /// unsuccessfully.
    fn run_cmd(&self, cmd: &Cmd) -> Result<ExecResult, ExecError>;
}

/// Executor backed by [`std::process::Command`] on the local machine.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemExecutor;

impl Executor for SystemExecutor {
    fn run_cmd(&self, cmd: &Cmd) -> Result<ExecResult, ExecError> {
        let spawn_error = |source| ExecError::Spawn {
            program: cmd.program.clone(),
            source,
        };

        let mut child = Command::new(&cmd.program)
            .args(&cmd.args)
            .stdin(if cmd.stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(spawn_error)?;

        // Feed stdin from a separate thread so a child that fills its stdout
        // pipe before draining stdin cannot deadlock us.
        let writer = match (cmd.stdin.clone(), child.stdin.take()) {
            (Some(input), Some(mut pipe)) => {
                Some(std::thread::spawn(move || pipe.write_all(input.as_bytes())))
            }
            _ => None,
        };

        let output = child.wait_with_output().map_err(spawn_error)?;
        if let Some(writer) = writer
            && let Ok(Err(e)) = writer.join()
            && e.kind() != std::io::ErrorKind::BrokenPipe
        {
            return Err(spawn_error(e));
        }

        let result = ExecResult::from(output);
        if !result.success {
            return Err(ExecError::Failed {
                program: cmd.program.clone(),
                code: result.code.unwrap_or(-1),
                stderr: result.stderr.trim().to_string(),
            });
        }
        Ok(result)
    }
}

#[cfg(all(test, unix))]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn run_list_form_command() {
        let result = SystemExecutor
            .run_cmd(&Cmd::new("echo", vec!["hello".to_string()]))
            .unwrap();
        assert!(result.success, "echo command should succeed");
        assert_eq!(result.stdout.trim(), "hello");
    }

    #[test]
    fn run_feeds_stdin() {
        let cmd = Cmd::shell("cat /dev/stdin").with_stdin("piped text".to_string());
        let result = SystemExecutor.run_cmd(&cmd).unwrap();
        assert_eq!(result.stdout, "piped text");
    }

    #[test]
    fn run_writes_file_like_write_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.conf");
        let cmd = Cmd::shell(format!("cat > {} /dev/stdin", path.display()))
            .with_stdin("key=value\n".to_string());
        SystemExecutor.run_cmd(&cmd).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "key=value\n");
    }

    #[test]
    fn run_failure_reports_exit_code() {
        let err = SystemExecutor
            .run_cmd(&Cmd::shell("echo boom >&2; exit 3"))
            .unwrap_err();
        assert!(
            matches!(&err, ExecError::Failed { code: 3, stderr, .. } if stderr == "boom"),
            "unexpected error: {err:?}"
        );
    }

    #[test]
    fn run_missing_program_is_spawn_error() {
        let err = SystemExecutor
            .run_cmd(&Cmd::new("this-program-does-not-exist-12345", Vec::new()))
            .unwrap_err();
        assert!(matches!(err, ExecError::Spawn { .. }));
    }
}
