//! Loading reduced API specifications from JSON.

use std::path::Path;

use stepwise_contracts::{
    endpoint::ReducedApiSpec,
    error::{StepwiseError, StepwiseResult},
};

/// Parse a reduced specification from a JSON document.
///
/// Returns `ConfigError` if the JSON is malformed, an endpoint name is not
/// `METHOD /path`, or the document lists no servers.
pub fn from_json_str(s: &str) -> StepwiseResult<ReducedApiSpec> {
    let spec: ReducedApiSpec = serde_json::from_str(s).map_err(|e| StepwiseError::ConfigError {
        reason: format!("failed to parse reduced API spec: {}", e),
    })?;
    if spec.base_url().is_none() {
        return Err(StepwiseError::ConfigError {
            reason: "reduced API spec has no servers".to_string(),
        });
    }
    Ok(spec)
}

/// Read the file at `path` and parse it as a reduced specification.
pub fn from_file(path: &Path) -> StepwiseResult<ReducedApiSpec> {
    let contents = std::fs::read_to_string(path).map_err(|e| StepwiseError::ConfigError {
        reason: format!("failed to read reduced API spec '{}': {}", path.display(), e),
    })?;
    from_json_str(&contents)
}
