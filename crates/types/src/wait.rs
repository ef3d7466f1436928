//! Value objects describing a single wait invocation and its result.

use std::fmt;
use std::time::Duration;

/// Maximum time allowed for a single connect attempt.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Fixed delay between connect attempts.
pub const POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Overall timeout used when the caller does not provide one.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Everything needed to wait for a TCP endpoint and optionally run a command afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitRequest {
    /// Hostname or IP address to connect to.
    pub host: String,
    /// TCP port to connect to.
    pub port: u16,
    /// Overall wall-clock budget, in whole seconds.
    pub timeout_secs: u64,
    /// Suppress status logging.
    pub quiet: bool,
    /// Argv of the command to run once the endpoint is reachable.
    pub command: Option<Vec<String>>,
}

impl WaitRequest {
    /// Create a request with the default timeout, logging enabled and no follow-on command.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            quiet: false,
            command: None,
        }
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Attach a follow-on command. An empty argv means no command.
    pub fn with_command(mut self, command: Vec<String>) -> Self {
        self.command = if command.is_empty() { None } else { Some(command) };
        self
    }

    /// Overall timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// The endpoint rendered as `host:port`.
    pub fn target(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Terminal state of a wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// A connection was accepted.
    Available,
    /// The overall timeout elapsed without a successful connection.
    TimedOut,
}

impl fmt::Display for WaitOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WaitOutcome::Available => f.write_str("available"),
            WaitOutcome::TimedOut => f.write_str("timed out"),
        }
    }
}

/// Result of a single wait invocation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaitResult {
    pub outcome: WaitOutcome,
    /// Time spent from the start of the wait until it resolved.
    pub elapsed: Duration,
    /// Number of connect attempts made.
    pub attempts: u32,
}

impl WaitResult {
    pub fn available(elapsed: Duration, attempts: u32) -> Self {
        Self {
            outcome: WaitOutcome::Available,
            elapsed,
            attempts,
        }
    }

    pub fn timed_out(elapsed: Duration, attempts: u32) -> Self {
        Self {
            outcome: WaitOutcome::TimedOut,
            elapsed,
            attempts,
        }
    }

    pub fn succeeded(&self) -> bool {
        self.outcome == WaitOutcome::Available
    }

    /// Elapsed time in fractional seconds.
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}
