use thiserror::Error;

/// Errors raised while the build-time identifiers are gathered.
///
/// All of these surface during the build of a consuming crate (from its
/// `build.rs`), never while a test executable runs.
#[derive(Error, Debug)]
pub enum ReporterError {
    #[error("Missing required build parameter: {variable} is not set")]
    MissingParameter { variable: String },

    #[error("Build parameter {variable} contains a line break and cannot be passed to rustc")]
    UnrepresentableValue { variable: String },

    #[error("Invalid build-parameter manifest: {0}")]
    Manifest(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ReporterResult<T> = Result<T, ReporterError>;
