//! Helpers for a consuming crate's `build.rs`.
//!
//! The test-matrix framework hands the identifiers to the build either as
//! environment variables (`<PREFIX>_EXE`, `<PREFIX>_CASE`, `<PREFIX>_CXXPARAMS`,
//! `<PREFIX>_LDPARAMS`) or as a JSON manifest named by `<PREFIX>_MANIFEST`.
//! These helpers resolve them and forward them to rustc, where
//! [`build_parameters!`](crate::build_parameters) picks them up.
//!
//! ```no_run
//! // build.rs
//! fn main() -> Result<(), testmatrix::ReporterError> {
//!     testmatrix::build_env::emit_from_env(testmatrix::DEFAULT_PREFIX)?;
//!     Ok(())
//! }
//! ```

use crate::error::{ReporterError, ReporterResult};
use crate::params::BuildParameters;
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const EXE_SUFFIX: &str = "_EXE";
pub const CASE_SUFFIX: &str = "_CASE";
pub const COMPILER_PARAMS_SUFFIX: &str = "_CXXPARAMS";
pub const LINKER_PARAMS_SUFFIX: &str = "_LDPARAMS";
pub const MANIFEST_SUFFIX: &str = "_MANIFEST";

/// Name of the variable carrying one identifier, e.g. `TESTMATRIX_EXE`.
pub fn variable(prefix: &str, suffix: &str) -> String {
    format!("{prefix}{suffix}")
}

/// Build parameters resolved for a build, and the manifest they came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedParameters {
    pub params: BuildParameters,
    pub manifest: Option<PathBuf>,
}

/// Resolve the build parameters under `prefix`, reading variables through
/// `lookup`.
///
/// A manifest named by `<PREFIX>_MANIFEST` wins over individual variables.
pub fn load_build_parameters<L>(prefix: &str, lookup: L) -> ReporterResult<ResolvedParameters>
where
    L: Fn(&str) -> Option<String>,
{
    if let Some(path) = lookup(&variable(prefix, MANIFEST_SUFFIX)) {
        let manifest = PathBuf::from(path);
        let params = read_manifest(&manifest)?;
        debug!(manifest = %manifest.display(), "loaded build parameters from manifest");
        return Ok(ResolvedParameters {
            params,
            manifest: Some(manifest),
        });
    }

    let required = |suffix: &str| {
        let name = variable(prefix, suffix);
        lookup(&name).ok_or(ReporterError::MissingParameter { variable: name })
    };

    let mut params = BuildParameters::new(
        required(EXE_SUFFIX)?,
        required(COMPILER_PARAMS_SUFFIX)?,
        required(LINKER_PARAMS_SUFFIX)?,
    );
    if let Some(case) = lookup(&variable(prefix, CASE_SUFFIX)) {
        params = params.with_case(case);
    }

    Ok(ResolvedParameters {
        params,
        manifest: None,
    })
}

/// Read a JSON manifest with `executable`, optional `case`, `compiler_params`
/// and `linker_params` fields.
pub fn read_manifest(path: &Path) -> ReporterResult<BuildParameters> {
    let file = File::open(path)?;
    let params = serde_json::from_reader(BufReader::new(file))?;
    Ok(params)
}

/// Write the cargo directives that forward `resolved` to rustc and rebuild when
/// any input changes.
pub fn emit_rustc_env<W: Write>(
    prefix: &str,
    resolved: &ResolvedParameters,
    out: &mut W,
) -> ReporterResult<()> {
    for suffix in [
        MANIFEST_SUFFIX,
        EXE_SUFFIX,
        CASE_SUFFIX,
        COMPILER_PARAMS_SUFFIX,
        LINKER_PARAMS_SUFFIX,
    ] {
        writeln!(out, "cargo:rerun-if-env-changed={}", variable(prefix, suffix))?;
    }
    if let Some(manifest) = &resolved.manifest {
        writeln!(out, "cargo:rerun-if-changed={}", manifest.display())?;
    }

    // An absent case is forwarded as empty so a stale outer value cannot leak in.
    let params = &resolved.params;
    let values = [
        (EXE_SUFFIX, &*params.executable),
        (CASE_SUFFIX, params.case.as_deref().unwrap_or("")),
        (COMPILER_PARAMS_SUFFIX, &*params.compiler_params),
        (LINKER_PARAMS_SUFFIX, &*params.linker_params),
    ];
    for (suffix, value) in values {
        let name = variable(prefix, suffix);
        if value.contains(['\n', '\r']) {
            return Err(ReporterError::UnrepresentableValue { variable: name });
        }
        writeln!(out, "cargo:rustc-env={name}={value}")?;
    }

    Ok(())
}

/// Resolve the parameters from the build script's environment and forward
/// them on stdout. Returning the error from `main` fails the build.
pub fn emit_from_env(prefix: &str) -> ReporterResult<BuildParameters> {
    let resolved = load_build_parameters(prefix, |name| std::env::var(name).ok())?;
    emit_rustc_env(prefix, &resolved, &mut io::stdout().lock())?;
    Ok(resolved.params)
}
