//! Run identity and the per-run transcript.
//!
//! A `Transcript` is owned by exactly one agent run. It is append-only and
//! enforces strict turn alternation: once an `Action` is recorded, the only
//! legal next turn is an `Observation`.

use serde::{Deserialize, Serialize};

use crate::{
    action::{Action, Finish},
    error::{StepwiseError, StepwiseResult},
};

/// Unique identifier for a single agent run.
///
/// Appears on every trace event and log line emitted during the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(pub uuid::Uuid);

impl RunId {
    /// Create a new, unique run ID.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// The text fed back to the model after a tool call (or a recoverable failure).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    /// Name of the tool that produced this observation. Empty for synthetic
    /// observations created from parse failures.
    pub tool: String,
    pub text: String,
    /// True when `text` describes a failure rather than a tool result.
    pub is_error: bool,
}

impl Observation {
    /// An observation produced by a successful tool call.
    pub fn success(tool: impl Into<String>, text: impl Into<String>) -> Self {
        Self { tool: tool.into(), text: text.into(), is_error: false }
    }

    /// An observation describing a tool failure.
    pub fn failure(tool: impl Into<String>, text: impl Into<String>) -> Self {
        Self { tool: tool.into(), text: text.into(), is_error: true }
    }

    /// A synthetic observation fed back after a recoverable parse failure.
    pub fn hint(text: impl Into<String>) -> Self {
        Self { tool: String::new(), text: text.into(), is_error: true }
    }
}

/// One entry in a run's transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Turn {
    /// Model text that produced no action (kept so the model sees its own
    /// malformed reply next to the correction hint).
    Thought(String),
    Action(Action),
    Observation(Observation),
    Finish(Finish),
}

/// The ordered turn history of a single run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// All turns in append order.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// True when the last turn is an `Action` still waiting for its observation.
    pub fn awaiting_observation(&self) -> bool {
        matches!(self.turns.last(), Some(Turn::Action(_)))
    }

    /// True once a `Finish` has been recorded.
    pub fn is_finished(&self) -> bool {
        matches!(self.turns.last(), Some(Turn::Finish(_)))
    }

    /// Iterate over every action issued in this run.
    pub fn actions(&self) -> impl Iterator<Item = &Action> {
        self.turns.iter().filter_map(|turn| match turn {
            Turn::Action(action) => Some(action),
            _ => None,
        })
    }

    /// Record model text that did not become an action.
    pub fn push_thought(&mut self, text: impl Into<String>) -> StepwiseResult<()> {
        self.guard("thought")?;
        self.turns.push(Turn::Thought(text.into()));
        Ok(())
    }

    /// Record an action. Fails if the previous action has no observation yet.
    pub fn push_action(&mut self, action: Action) -> StepwiseResult<()> {
        self.guard("action")?;
        self.turns.push(Turn::Action(action));
        Ok(())
    }

    /// Record an observation. Always legal until the run finishes.
    pub fn push_observation(&mut self, observation: Observation) -> StepwiseResult<()> {
        if self.is_finished() {
            return Err(StepwiseError::StateMachineError {
                reason: "cannot append observation to a finished transcript".to_string(),
            });
        }
        self.turns.push(Turn::Observation(observation));
        Ok(())
    }

    /// Record the terminal finish turn.
    pub fn push_finish(&mut self, finish: Finish) -> StepwiseResult<()> {
        self.guard("finish")?;
        self.turns.push(Turn::Finish(finish));
        Ok(())
    }

    fn guard(&self, kind: &str) -> StepwiseResult<()> {
        if self.is_finished() {
            return Err(StepwiseError::StateMachineError {
                reason: format!("cannot append {kind} to a finished transcript"),
            });
        }
        if self.awaiting_observation() {
            return Err(StepwiseError::StateMachineError {
                reason: format!("cannot append {kind} while an action awaits its observation"),
            });
        }
        Ok(())
    }
}
