//! Reference test executable for the test matrix.
//!
//! Announces the build parameters it was compiled with, runs a trivial test
//! body, and reports the outcome the way every matrix executable does.

use clap::Parser;
use std::fmt;
use std::process::ExitCode;
use testmatrix::ReporterConfig;
use thiserror::Error;
use tracing::{debug, error};

#[derive(Parser)]
#[command(name = "matrix-probe")]
#[command(about = "Reports the build parameters of this test-matrix executable")]
struct Cli {
    /// Fail the test body with this message
    #[arg(long, value_name = "MESSAGE", conflicts_with_all = ["panic", "fail_undescribed"])]
    fail: Option<String>,
    /// Fail the test body with an error that cannot describe itself
    #[arg(long, conflicts_with = "panic")]
    fail_undescribed: bool,
    /// Panic in the test body with this message
    #[arg(long, value_name = "MESSAGE")]
    panic: Option<String>,
    /// Line printed to stdout when the body passes
    #[arg(long, value_name = "TEXT")]
    success_marker: Option<String>,
    /// Only print the build parameters, do not run the body
    #[arg(long, conflicts_with_all = ["fail", "fail_undescribed", "panic", "success_marker"])]
    params_only: bool,
}

#[derive(Error, Debug)]
enum ProbeError {
    #[error("{0}")]
    Requested(String),
    #[error("{0}")]
    Undescribed(Undescribable),
}

#[derive(Debug)]
struct Undescribable;

impl fmt::Display for Undescribable {
    fn fmt(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
        panic!("failure description unavailable")
    }
}

/// What the test body should do.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
enum BodyAction {
    #[default]
    Pass,
    Fail(String),
    FailUndescribed,
    Panic(String),
}

impl From<&Cli> for BodyAction {
    fn from(cli: &Cli) -> Self {
        if let Some(message) = &cli.panic {
            BodyAction::Panic(message.clone())
        } else if let Some(message) = &cli.fail {
            BodyAction::Fail(message.clone())
        } else if cli.fail_undescribed {
            BodyAction::FailUndescribed
        } else {
            BodyAction::Pass
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.params_only {
        testmatrix::report_executable_parameters!();
        return ExitCode::SUCCESS;
    }

    let mut config = ReporterConfig::default();
    if let Some(marker) = cli.success_marker.clone() {
        config = config.with_success_marker(marker);
    }
    if let Err(message) = config.validate() {
        error!("invalid --success-marker: {}", message);
        return ExitCode::from(2);
    }

    let action = BodyAction::from(&cli);
    let params = testmatrix::build_parameters!();
    testmatrix::run(&params, config, || test_body(action))
}

fn test_body(action: BodyAction) -> Result<(), ProbeError> {
    debug!(?action, "running test body");

    match action {
        BodyAction::Pass => Ok(()),
        BodyAction::Fail(message) => Err(ProbeError::Requested(message)),
        BodyAction::FailUndescribed => Err(ProbeError::Undescribed(Undescribable)),
        BodyAction::Panic(message) => panic!("{}", message),
    }
}
