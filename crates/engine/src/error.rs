//! Error types for the wait engine.

use thiserror::Error;

/// Why a single connect attempt did not succeed.
///
/// The waiter never surfaces these to callers; every variant means "not ready yet".
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("connect failed: {0}")]
    Connect(#[from] std::io::Error),

    #[error("connect timed out after {timeout_ms}ms")]
    TimedOut { timeout_ms: u64 },
}

/// Errors raised while launching the follow-on command.
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("no command to execute")]
    EmptyCommand,

    #[error("failed to launch `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
}
