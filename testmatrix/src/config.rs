use serde::{Deserialize, Serialize};

/// Runtime options of a [`Reporter`](crate::Reporter).
///
/// The default reports success silently; the process exit status carries the
/// result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReporterConfig {
    /// Line written to standard output by `report_success`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success_marker: Option<String>,
}

impl ReporterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_success_marker(mut self, marker: impl Into<String>) -> Self {
        self.success_marker = Some(marker.into());
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if let Some(marker) = &self.success_marker {
            if marker.is_empty() {
                return Err("Success marker cannot be empty".to_string());
            }

            if marker.contains(['\n', '\r']) {
                return Err("Success marker must be a single line".to_string());
            }
        }

        Ok(())
    }
}
