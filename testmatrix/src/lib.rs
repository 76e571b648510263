//! Build-parameter reporting for test-matrix executables
//!
//! A test-matrix build compiles the same test source under many compiler and
//! linker flag combinations. Each resulting executable announces, at startup,
//! which combination produced it:
//!
//! ```text
//! [<executable>]            or [<executable>-run<case>]
//! __CXXPARAMS__: <compiler parameters>
//! __LDPARAMS__: <linker parameters>
//! ```
//!
//! and at the end reports either success or a one-line failure description on
//! standard error.
//!
//! The identifiers are fixed at build time. [`build_parameters!`] reads them
//! from the compile environment and refuses to compile when a required one is
//! missing; [`build_env`] forwards them from a `build.rs`.
//!
//! ```ignore
//! use std::process::ExitCode;
//!
//! fn main() -> ExitCode {
//!     let params = testmatrix::build_parameters!();
//!     testmatrix::run(&params, testmatrix::ReporterConfig::default(), || {
//!         run_the_test()
//!     })
//! }
//! ```

pub mod build_env;
pub mod config;
pub mod error;
pub mod params;
pub mod reporter;
pub mod run;
mod unwind;

pub use config::ReporterConfig;
pub use error::{ReporterError, ReporterResult};
pub use params::BuildParameters;
pub use reporter::{Reporter, UNKNOWN_FAILURE};
pub use run::{run, Outcome};

use std::fmt;
use tracing::warn;

/// Variable prefix read by [`build_parameters!`] when none is given.
pub const DEFAULT_PREFIX: &str = "TESTMATRIX";

/// The [`BuildParameters`] baked into the calling crate at compile time.
///
/// `build_parameters!()` reads `TESTMATRIX_EXE`, `TESTMATRIX_CASE` (optional),
/// `TESTMATRIX_CXXPARAMS` and `TESTMATRIX_LDPARAMS`; `build_parameters!("SUITE")`
/// reads `SUITE_EXE` and so on. A missing required variable stops the build,
/// even when the parameter strings are present:
///
/// ```compile_fail
/// // TESTMATRIX_NOEXE_CXXPARAMS and TESTMATRIX_NOEXE_LDPARAMS are set,
/// // TESTMATRIX_NOEXE_EXE is not.
/// let params = testmatrix::build_parameters!("TESTMATRIX_NOEXE");
/// ```
///
/// ```compile_fail
/// let params = testmatrix::build_parameters!("TESTMATRIX_DOCTEST_UNSET");
/// ```
#[macro_export]
macro_rules! build_parameters {
    () => {
        $crate::build_parameters!("TESTMATRIX")
    };
    ($prefix:literal) => {
        $crate::BuildParameters::from_static(
            ::core::env!(
                ::core::concat!($prefix, "_EXE"),
                "no executable identifier: this crate must be built by the test-matrix framework"
            ),
            ::core::option_env!(::core::concat!($prefix, "_CASE")),
            ::core::env!(
                ::core::concat!($prefix, "_CXXPARAMS"),
                "no compiler-parameter string: this crate must be built by the test-matrix framework"
            ),
            ::core::env!(
                ::core::concat!($prefix, "_LDPARAMS"),
                "no linker-parameter string: this crate must be built by the test-matrix framework"
            ),
        )
    };
}

/// Print the build parameters baked into the calling crate to standard output.
#[macro_export]
macro_rules! report_executable_parameters {
    () => {
        $crate::report_executable_parameters(&$crate::build_parameters!())
    };
    ($prefix:literal) => {
        $crate::report_executable_parameters(&$crate::build_parameters!($prefix))
    };
}

/// Print the identification, compiler-parameter and linker-parameter lines to
/// standard output and flush it.
pub fn report_executable_parameters(params: &BuildParameters) {
    if let Err(e) = Reporter::stdio().report_executable_parameters(params) {
        warn!(error = %e, "failed to report build parameters");
    }
}

/// Mark the test body as passed. Prints nothing; the exit status carries the
/// result.
pub fn report_success() {
    Reporter::stdio().report_success();
}

/// Print `failure`'s description to standard error.
pub fn report_error<D: fmt::Display + ?Sized>(failure: &D) {
    Reporter::stdio().report_error(failure);
}
