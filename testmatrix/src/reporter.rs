//! Writers for the startup block and the end-of-run result.
//!
//! Every write is followed by a flush, so output reaches the log aggregator in
//! call order even if the process dies right afterwards.

use crate::config::ReporterConfig;
use crate::params::BuildParameters;
use crate::unwind::catch_quietly;
use std::fmt::{self, Write as _};
use std::io::{self, Write};
use tracing::{debug, warn};

/// Written in place of a failure whose description cannot be produced.
pub const UNKNOWN_FAILURE: &str = "unknown exception";

/// Reports build parameters and test results to an output and an error sink.
pub struct Reporter<O = io::Stdout, E = io::Stderr> {
    out: O,
    err: E,
    config: ReporterConfig,
}

impl Reporter {
    /// Reporter bound to the process standard output and standard error.
    pub fn stdio() -> Self {
        Self::new(io::stdout(), io::stderr())
    }
}

impl<O: Write, E: Write> Reporter<O, E> {
    pub fn new(out: O, err: E) -> Self {
        Self {
            out,
            err,
            config: ReporterConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ReporterConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &ReporterConfig {
        &self.config
    }

    /// Write the identification, compiler-parameter and linker-parameter lines,
    /// in that order, then flush.
    pub fn report_executable_parameters(&mut self, params: &BuildParameters) -> io::Result<()> {
        // One write keeps the block contiguous.
        self.out.write_all(params.to_string().as_bytes())?;
        self.out.flush()?;
        debug!(
            executable = %params.executable,
            case = params.case_label(),
            "reported build parameters"
        );
        Ok(())
    }

    /// Mark the test body as passed. Writes the configured success marker, if
    /// any, and nothing to the error sink.
    pub fn report_success(&mut self) {
        if let Some(marker) = &self.config.success_marker {
            let written = writeln!(self.out, "{}", marker).and_then(|()| self.out.flush());
            if let Err(e) = written {
                warn!(error = %e, "failed to write success marker");
            }
        }
        debug!("reported success");
    }

    /// Write the failure's description and a newline to the error sink, then
    /// flush. Falls back to [`UNKNOWN_FAILURE`] if the description cannot be
    /// rendered.
    pub fn report_error<D: fmt::Display + ?Sized>(&mut self, failure: &D) {
        let description = describe(failure);
        self.write_error_line(&description);
    }

    pub(crate) fn write_error_line(&mut self, description: &str) {
        let mut line = String::with_capacity(description.len() + 1);
        line.push_str(description);
        line.push('\n');

        let written = self
            .err
            .write_all(line.as_bytes())
            .and_then(|()| self.err.flush());
        if let Err(e) = written {
            warn!(error = %e, "failed to write failure description");
        }
        debug!(failure = %description, "reported error");
    }

    /// Give back the sinks.
    pub fn into_parts(self) -> (O, E) {
        (self.out, self.err)
    }
}

/// Render a failure's description, or [`UNKNOWN_FAILURE`] if its `Display`
/// implementation errors or panics. A panic here never reaches stderr.
pub(crate) fn describe<D: fmt::Display + ?Sized>(failure: &D) -> String {
    let rendered = catch_quietly(|| {
        let mut description = String::new();
        write!(description, "{}", failure).map(|()| description)
    });

    match rendered {
        Ok(Ok(description)) => description,
        _ => UNKNOWN_FAILURE.to_string(),
    }
}
