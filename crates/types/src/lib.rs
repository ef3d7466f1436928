//! Shared type definitions for the portwait workspace.

pub mod wait;

pub use wait::{DEFAULT_TIMEOUT_SECS, POLL_INTERVAL, PROBE_TIMEOUT, WaitOutcome, WaitRequest, WaitResult};
