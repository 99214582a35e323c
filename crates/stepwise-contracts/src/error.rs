//! Runtime error types for the stepwise action-text protocol.
//!
//! All fallible operations return `StepwiseResult<T>`. Variants carry the
//! raw model text or the offending name so an aborted run can be diagnosed
//! from the error alone.

use thiserror::Error;

/// The unified error type for the stepwise runtime.
#[derive(Debug, Error)]
pub enum StepwiseError {
    /// The model reply had no recognizable action or finish structure.
    ///
    /// Recoverable parse failures never surface as this error; they are fed
    /// back to the model as an observation instead.
    #[error("could not parse model output: {message}")]
    ParseFailed { message: String, raw_text: String },

    /// The parsed action names a tool that is not registered.
    #[error("unknown tool '{name}'; available tools: [{available}]")]
    UnknownTool { name: String, available: String },

    /// A tool with the same name is already registered.
    #[error("tool '{name}' is already registered")]
    DuplicateTool { name: String },

    /// A prompt template references a placeholder nobody supplied.
    #[error("prompt template '{template}' has no value for placeholder '{placeholder}'")]
    MissingPlaceholder { template: String, placeholder: String },

    /// A plan referenced an endpoint absent from the reduced API specification.
    #[error("{endpoint} endpoint does not exist")]
    UnknownEndpoint { endpoint: String },

    /// A tool ran and reported a failure. Recoverable.
    #[error("tool '{tool}' failed: {reason}")]
    ToolFailed { tool: String, reason: String },

    /// A tool rejected its input before doing any work. Recoverable.
    #[error("invalid input for tool '{tool}': {reason}")]
    InvalidToolInput { tool: String, reason: String },

    /// The language model could not produce a completion.
    #[error("model invocation failed: {reason}")]
    ModelFailed { reason: String },

    /// The loop or transcript was driven through an illegal transition.
    #[error("state machine error: {reason}")]
    StateMachineError { reason: String },

    /// A required configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },
}

impl StepwiseError {
    /// True when the failure should be shown to the model as an observation
    /// rather than aborting the run.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            StepwiseError::ToolFailed { .. } | StepwiseError::InvalidToolInput { .. }
        )
    }

    /// True when the failure must abort the calling run even though a tool
    /// raised it. Every other tool failure becomes an observation.
    ///
    /// Only `UnknownEndpoint` qualifies: a plan naming an undocumented
    /// endpoint fails before any request is made.
    pub fn is_fatal(&self) -> bool {
        matches!(self, StepwiseError::UnknownEndpoint { .. })
    }
}

/// Convenience alias used throughout the stepwise crates.
pub type StepwiseResult<T> = Result<T, StepwiseError>;
