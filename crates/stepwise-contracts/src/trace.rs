//! Lifecycle notifications emitted while a run executes.
//!
//! Observers receive these through the `RunObserver` hooks in
//! stepwise-core; recorders store them as `TraceRecord`s.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    action::{Action, Finish},
    execution::TokenUsage,
    transcript::RunId,
};

/// A single observable event in a run's lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TraceEvent {
    ModelStart { prompt: String },
    Token { text: String },
    ModelEnd { text: String },
    ModelError { reason: String },
    AgentAction { action: Action },
    ToolStart { tool: String, input: String },
    ToolEnd { tool: String, output: String },
    ToolError { tool: String, reason: String },
    AgentFinish { finish: Finish },
    Usage { usage: TokenUsage },
}

/// A stored trace event with its position and wall-clock time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceRecord {
    /// Position in the recorder, starting at 0.
    pub sequence: u64,
    pub run_id: RunId,
    pub event: TraceEvent,
    pub timestamp: DateTime<Utc>,
}
