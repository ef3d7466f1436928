//! # portwait engine
//!
//! Waits for a TCP endpoint to accept connections and then optionally hands off to a
//! follow-on shell command.
//!
//! - **`waiter`**: fixed-interval connect polling bounded by a wall-clock timeout
//! - **`runner`**: the [`CommandRunner`] seam and the shell-backed implementation
//! - **`error`**: probe and launch error types
//!
//! ```no_run
//! use portwait_engine::{PortWaiter, ShellCommandRunner, wait_and_run};
//! use portwait_types::WaitRequest;
//!
//! # async fn demo() {
//! let request = WaitRequest::new("db", 5432)
//!     .with_timeout(30)
//!     .with_command(vec!["./migrate".into()]);
//! let report = wait_and_run(&PortWaiter::new(), &ShellCommandRunner::new(), &request).await;
//! std::process::exit(report.exit_code());
//! # }
//! ```

pub mod error;
pub mod runner;
pub mod waiter;

pub use error::{ProbeError, RunnerError};
pub use runner::{CommandRunner, LAUNCH_FAILURE_EXIT_CODE, ShellCommandRunner, join_command};
pub use waiter::{PortWaiter, probe};

use portwait_types::{WaitRequest, WaitResult};
use tracing::info;

/// Exit code reported when the endpoint never became available.
pub const TIMEOUT_EXIT_CODE: i32 = 1;

/// What happened during one invocation: the wait and, if it ran, the command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunReport {
    pub wait: WaitResult,
    /// Exit code of the follow-on command, when one was executed.
    pub command_exit: Option<i32>,
}

impl RunReport {
    /// Exit code for the whole process.
    pub fn exit_code(&self) -> i32 {
        if !self.wait.succeeded() {
            return TIMEOUT_EXIT_CODE;
        }
        self.command_exit.unwrap_or(0)
    }
}

/// Wait for the request's endpoint, then run its command if the wait succeeded.
pub async fn wait_and_run<R>(waiter: &PortWaiter, runner: &R, request: &WaitRequest) -> RunReport
where
    R: CommandRunner + ?Sized,
{
    let wait = waiter.wait(request).await;
    let command_exit = match (&request.command, wait.succeeded()) {
        (Some(command), true) => {
            if !request.quiet {
                info!("Executing command: {}", join_command(command));
            }
            Some(runner.run(command).await)
        }
        _ => None,
    };
    RunReport { wait, command_exit }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use tokio::net::TcpListener;

    use super::*;

    /// Records every command it is asked to run and answers with a fixed code.
    struct RecordingRunner {
        code: i32,
        calls: Mutex<Vec<Vec<String>>>,
    }

    impl RecordingRunner {
        fn new(code: i32) -> Self {
            Self {
                code,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<Vec<String>> {
            self.calls.lock().expect("calls lock poisoned").clone()
        }
    }

    #[async_trait]
    impl CommandRunner for RecordingRunner {
        async fn execute(&self, command: &[String]) -> Result<i32, RunnerError> {
            self.calls.lock().expect("calls lock poisoned").push(command.to_vec());
            Ok(self.code)
        }
    }

    fn closed_port() -> u16 {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
        listener.local_addr().expect("local addr").port()
    }

    #[tokio::test]
    async fn runs_command_after_success_and_propagates_its_code() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind listener");
        let port = listener.local_addr().expect("local addr").port();
        let runner = RecordingRunner::new(3);

        let request = WaitRequest::new("127.0.0.1", port)
            .with_timeout(10)
            .with_command(vec!["exit".into(), "3".into()]);
        let report = wait_and_run(&PortWaiter::new(), &runner, &request).await;

        assert!(report.wait.succeeded());
        assert_eq!(report.command_exit, Some(3));
        assert_eq!(report.exit_code(), 3);
        assert_eq!(runner.calls(), vec![vec!["exit".to_string(), "3".to_string()]]);
    }

    #[tokio::test]
    async fn success_without_command_exits_zero() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind listener");
        let port = listener.local_addr().expect("local addr").port();
        let runner = RecordingRunner::new(7);

        let request = WaitRequest::new("127.0.0.1", port).with_timeout(10);
        let report = wait_and_run(&PortWaiter::new(), &runner, &request).await;

        assert_eq!(report.exit_code(), 0);
        assert!(runner.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn command_is_never_run_when_the_wait_times_out() {
        let runner = RecordingRunner::new(0);
        let request = WaitRequest::new("127.0.0.1", closed_port())
            .with_timeout(3)
            .with_quiet(true)
            .with_command(vec!["echo".into(), "hi".into()]);

        let report = wait_and_run(&PortWaiter::new(), &runner, &request).await;

        assert!(!report.wait.succeeded());
        assert_eq!(report.command_exit, None);
        assert_eq!(report.exit_code(), TIMEOUT_EXIT_CODE);
        assert!(runner.calls().is_empty());
    }
}
