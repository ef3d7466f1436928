//! TCP readiness polling.

use std::time::Duration;

use portwait_types::{POLL_INTERVAL, PROBE_TIMEOUT, WaitRequest, WaitResult};
use tokio::net::TcpStream;
use tokio::time::{Instant, sleep, timeout};
use tracing::{debug, error, info};

use crate::error::ProbeError;

/// Attempt a single TCP connection, closing it as soon as it is established.
pub async fn probe(host: &str, port: u16, limit: Duration) -> Result<(), ProbeError> {
    match timeout(limit, TcpStream::connect((host, port))).await {
        Ok(Ok(stream)) => {
            drop(stream);
            Ok(())
        }
        Ok(Err(error)) => Err(ProbeError::Connect(error)),
        Err(_) => Err(ProbeError::TimedOut {
            timeout_ms: limit.as_millis() as u64,
        }),
    }
}

/// Polls a TCP endpoint at a fixed interval until it accepts a connection or the
/// request's overall timeout elapses.
#[derive(Debug, Default, Clone, Copy)]
pub struct PortWaiter;

impl PortWaiter {
    pub fn new() -> Self {
        Self
    }

    /// Wait for `request.host:request.port` to accept connections.
    ///
    /// The deadline is checked once per iteration after a failed attempt, so the
    /// measured elapsed time may exceed the timeout by up to one attempt.
    pub async fn wait(&self, request: &WaitRequest) -> WaitResult {
        let endpoint = request.target();
        let budget = request.timeout();
        let started = Instant::now();
        let mut attempts = 0u32;

        if !request.quiet {
            info!("Waiting for {endpoint} (timeout: {}s)", request.timeout_secs);
        }

        loop {
            attempts += 1;
            match probe(&request.host, request.port, PROBE_TIMEOUT).await {
                Ok(()) => {
                    let elapsed = started.elapsed();
                    if !request.quiet {
                        info!(
                            attempts,
                            "{endpoint} is available after {:.2} seconds",
                            elapsed.as_secs_f64()
                        );
                    }
                    return WaitResult::available(elapsed, attempts);
                }
                Err(cause) => {
                    debug!(endpoint = %endpoint, attempt = attempts, error = %cause, "connect attempt failed");
                }
            }

            let elapsed = started.elapsed();
            if elapsed > budget {
                if !request.quiet {
                    error!(attempts, "Timeout after {}s waiting for {endpoint}", request.timeout_secs);
                }
                return WaitResult::timed_out(elapsed, attempts);
            }

            if !request.quiet {
                debug!("Port {endpoint} not ready, retrying...");
            }
            sleep(POLL_INTERVAL).await;
        }
    }
}
