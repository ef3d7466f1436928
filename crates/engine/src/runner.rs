use std::process::ExitStatus;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, error};

use crate::error::RunnerError;

/// Exit code reported when the follow-on command cannot be launched.
pub const LAUNCH_FAILURE_EXIT_CODE: i32 = 1;

/// Execute the follow-on command once the endpoint is reachable.
///
/// Implementations return the child's exit code. The default `run` folds launch
/// failures into [`LAUNCH_FAILURE_EXIT_CODE`] after logging them.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn execute(&self, command: &[String]) -> Result<i32, RunnerError>;

    async fn run(&self, command: &[String]) -> i32 {
        match self.execute(command).await {
            Ok(code) => code,
            Err(error) => {
                error!(error = %error, "Error executing command: {error}");
                LAUNCH_FAILURE_EXIT_CODE
            }
        }
    }
}

/// Runs the command through the host shell with inherited stdio.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShellCommandRunner;

impl ShellCommandRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandRunner for ShellCommandRunner {
    async fn execute(&self, command: &[String]) -> Result<i32, RunnerError> {
        if command.is_empty() {
            return Err(RunnerError::EmptyCommand);
        }
        let line = join_command(command);
        debug!(command = %line, "spawning shell command");

        let status = shell_command(&line)
            .status()
            .await
            .map_err(|source| RunnerError::Spawn {
                command: line.clone(),
                source,
            })?;

        let code = exit_code(status);
        debug!(command = %line, code, "shell command exited");
        Ok(code)
    }
}

/// Join argv into the single string handed to the shell.
pub fn join_command(command: &[String]) -> String {
    command.join(" ")
}

#[cfg(unix)]
fn shell_command(line: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(line);
    cmd
}

#[cfg(windows)]
fn shell_command(line: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(line);
    cmd
}

/// Map a child's exit status to the code this process should exit with.
///
/// Signal terminations follow the shell convention of `128 + signal`.
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    LAUNCH_FAILURE_EXIT_CODE
}
