use std::io::IsTerminal;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use portwait_engine::{PortWaiter, ShellCommandRunner, wait_and_run};
use portwait_types::{DEFAULT_TIMEOUT_SECS, WaitRequest};
use tracing_subscriber::EnvFilter;

/// Wait for a TCP service to be available, then optionally run a command.
#[derive(Parser, Debug)]
#[command(name = "portwait", version, about)]
struct Args {
    /// Hostname or IP address to check
    host: String,

    /// TCP port to check
    #[arg(value_parser = clap::value_parser!(u16).range(1..))]
    port: u16,

    /// Timeout in seconds
    #[arg(short, long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout: u64,

    /// Don't output any status messages
    #[arg(short, long)]
    quiet: bool,

    /// Command to execute after the service is available; captures the rest of the line
    #[arg(long, num_args = 0.., allow_hyphen_values = true, value_name = "ARG")]
    command: Vec<String>,
}

impl From<Args> for WaitRequest {
    fn from(args: Args) -> Self {
        WaitRequest::new(args.host, args.port)
            .with_timeout(args.timeout)
            .with_quiet(args.quiet)
            .with_command(args.command)
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.quiet);

    match run(args.into()) {
        Ok(code) => ExitCode::from(u8::try_from(code).unwrap_or(1)),
        Err(error) => {
            tracing::error!(error = %error, "portwait failed");
            ExitCode::FAILURE
        }
    }
}

fn run(request: WaitRequest) -> Result<i32> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to build the tokio runtime")?;
    let report = runtime.block_on(wait_and_run(&PortWaiter::new(), &ShellCommandRunner::new(), &request));
    Ok(report.exit_code())
}

fn init_tracing(quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();
}
