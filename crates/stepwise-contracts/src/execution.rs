//! Model exchange types and run outcomes.
//!
//! `ModelRequest` / `Completion` are what crosses the model boundary on each
//! turn. `RunOutcome` is what the agent loop returns to its caller when a
//! run ends without a non-recoverable error.

use serde::{Deserialize, Serialize};

use crate::transcript::{RunId, Transcript};

/// A fully rendered prompt ready to be sent to a language model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelRequest {
    /// The run issuing the request.
    pub run_id: RunId,
    pub prompt: String,
    /// Sequences at which the model should stop generating.
    pub stop: Vec<String>,
}

/// Token counts reported by a model for one completion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

impl TokenUsage {
    pub fn new(prompt_tokens: u64, completion_tokens: u64) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }

    /// Add another usage report to this one.
    pub fn accumulate(&mut self, other: &TokenUsage) {
        self.prompt_tokens += other.prompt_tokens;
        self.completion_tokens += other.completion_tokens;
        self.total_tokens += other.total_tokens;
    }
}

/// The model's reply to a `ModelRequest`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    pub text: String,
    /// Present when the provider reports token accounting.
    pub usage: Option<TokenUsage>,
}

impl Completion {
    /// A completion without usage information.
    pub fn text(text: impl Into<String>) -> Self {
        Self { text: text.into(), usage: None }
    }
}

/// How a run ended, when it did not abort with an error.
///
/// Callers pattern-match on this:
/// - `Finished` → the model produced a final answer
/// - `Exhausted` → the iteration cap was reached first
///
/// Non-recoverable failures are returned as `Err(StepwiseError)` instead.
#[derive(Debug)]
pub enum RunOutcome {
    Finished {
        run_id: RunId,
        /// The final answer text.
        output: String,
        /// Number of loop iterations consumed (model calls that did not finish).
        iterations: usize,
        transcript: Transcript,
    },

    Exhausted {
        run_id: RunId,
        /// The configured cap that was hit.
        max_iterations: usize,
        transcript: Transcript,
    },
}

impl RunOutcome {
    pub fn run_id(&self) -> RunId {
        match self {
            RunOutcome::Finished { run_id, .. } | RunOutcome::Exhausted { run_id, .. } => *run_id,
        }
    }

    pub fn transcript(&self) -> &Transcript {
        match self {
            RunOutcome::Finished { transcript, .. } | RunOutcome::Exhausted { transcript, .. } => {
                transcript
            }
        }
    }

    /// The final answer, if the run finished normally.
    pub fn output(&self) -> Option<&str> {
        match self {
            RunOutcome::Finished { output, .. } => Some(output),
            RunOutcome::Exhausted { .. } => None,
        }
    }
}
