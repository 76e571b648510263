//! The start/body/result sequence of a test executable's `main`.

use crate::config::ReporterConfig;
use crate::params::BuildParameters;
use crate::reporter::{describe, Reporter, UNKNOWN_FAILURE};
use crate::unwind::catch_quietly;
use std::any::Any;
use std::fmt;
use std::io::Write;
use std::process::ExitCode;
use tracing::warn;

/// How a test body ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Passed,
    /// The body returned an error with this description
    Failed(String),
    /// The body panicked with this message
    Panicked(String),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Passed)
    }

    pub fn exit_code(&self) -> ExitCode {
        if self.is_success() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        }
    }
}

impl<O: Write, E: Write> Reporter<O, E> {
    /// Report `params`, run `body`, then report exactly one of success or error.
    ///
    /// A panic inside `body` is caught and reported like a returned error, as
    /// the only line on the error sink; the process panic hook stays quiet.
    pub fn run<F, Fail>(&mut self, params: &BuildParameters, body: F) -> Outcome
    where
        F: FnOnce() -> Result<(), Fail>,
        Fail: fmt::Display,
    {
        if let Err(e) = self.report_executable_parameters(params) {
            warn!(error = %e, "failed to report build parameters");
        }

        match catch_quietly(body) {
            Ok(Ok(())) => {
                self.report_success();
                Outcome::Passed
            }
            Ok(Err(failure)) => {
                let description = describe(&failure);
                self.write_error_line(&description);
                Outcome::Failed(description)
            }
            Err(payload) => {
                let description = panic_message(payload.as_ref())
                    .unwrap_or(UNKNOWN_FAILURE)
                    .to_string();
                self.write_error_line(&description);
                Outcome::Panicked(description)
            }
        }
    }
}

/// Run a test body against the standard streams and map the result to an
/// exit status for the matrix framework.
pub fn run<F, Fail>(params: &BuildParameters, config: ReporterConfig, body: F) -> ExitCode
where
    F: FnOnce() -> Result<(), Fail>,
    Fail: fmt::Display,
{
    Reporter::stdio()
        .with_config(config)
        .run(params, body)
        .exit_code()
}

fn panic_message(payload: &(dyn Any + Send)) -> Option<&str> {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        Some(*message)
    } else {
        payload.downcast_ref::<String>().map(String::as_str)
    }
}
