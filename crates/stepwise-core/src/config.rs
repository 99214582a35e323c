//! TOML-driven agent configuration.
//!
//! Every field has a default, so an empty document is a valid configuration:
//!
//! ```toml
//! [agent]
//! max_iterations = 15
//! observation_prefix = "Observation: "
//! llm_prefix = "Thought: "
//! stop = ["\nObservation:"]
//! early_stop_message = "Agent stopped due to iteration limit."
//!
//! [openapi]
//! response_length = 5000
//! unknown_endpoint_recoverable = false
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use stepwise_contracts::error::{StepwiseError, StepwiseResult};

/// Settings for the agent loop itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoopConfig {
    /// Hard cap on loop iterations. Must be at least 1.
    pub max_iterations: usize,
    /// Written before each observation in the scratchpad.
    pub observation_prefix: String,
    /// Written after each observation to prompt the model's next thought.
    pub llm_prefix: String,
    /// Stop sequences sent with every model request.
    pub stop: Vec<String>,
    /// Returned by `AgentTool` when a nested run hits its cap.
    pub early_stop_message: String,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            max_iterations: 15,
            observation_prefix: "Observation: ".to_string(),
            llm_prefix: "Thought: ".to_string(),
            stop: vec!["\nObservation:".to_string()],
            early_stop_message: "Agent stopped due to iteration limit.".to_string(),
        }
    }
}

/// Settings for the API planner/controller tools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenApiConfig {
    /// HTTP response bodies are truncated to this many characters before
    /// being handed to the model.
    pub response_length: usize,
    /// When true, a plan naming an unknown endpoint becomes an observation
    /// instead of aborting the run.
    pub unknown_endpoint_recoverable: bool,
}

impl Default for OpenApiConfig {
    fn default() -> Self {
        Self { response_length: 5000, unknown_endpoint_recoverable: false }
    }
}

/// The top-level configuration document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub agent: LoopConfig,
    pub openapi: OpenApiConfig,
}

impl AgentConfig {
    /// Parse `s` as TOML.
    ///
    /// Returns `StepwiseError::ConfigError` if the TOML is malformed, does not
    /// match the schema, or sets `max_iterations = 0`.
    pub fn from_toml_str(s: &str) -> StepwiseResult<Self> {
        let config: AgentConfig = toml::from_str(s).map_err(|e| StepwiseError::ConfigError {
            reason: format!("failed to parse agent config TOML: {}", e),
        })?;
        config.agent.validate()?;
        Ok(config)
    }

    /// Read the file at `path` and parse it as TOML configuration.
    pub fn from_file(path: &Path) -> StepwiseResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| StepwiseError::ConfigError {
            reason: format!("failed to read agent config '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }
}

impl LoopConfig {
    /// Reject settings under which the loop could never make progress.
    pub fn validate(&self) -> StepwiseResult<()> {
        if self.max_iterations == 0 {
            return Err(StepwiseError::ConfigError {
                reason: "max_iterations must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
