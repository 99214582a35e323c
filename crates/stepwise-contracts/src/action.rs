//! Parsed model replies.
//!
//! Every reply the loop receives is turned into exactly one `ParseResult`:
//! a tool invocation, a final answer, or a classified parse failure.

use serde::{Deserialize, Serialize};

/// A request from the model to invoke a named tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    /// Must match a registered tool name exactly (case-sensitive).
    pub tool_name: String,
    /// The tool input after trimming and quote handling.
    pub tool_input: String,
    /// The full model reply this action was parsed from.
    pub raw_text: String,
}

/// The model's final answer. Terminal for the run that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finish {
    pub output: String,
    pub raw_text: String,
}

/// A reply that matched neither an action pair nor a finish marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseError {
    /// Diagnostic message, suitable for logs and error reports.
    pub message: String,
    /// Text fed back to the model as the next observation when recoverable.
    /// Empty for non-recoverable failures.
    pub observation_hint: String,
    pub raw_text: String,
    /// `true` → self-correction through the loop; `false` → abort.
    pub recoverable: bool,
}

/// Outcome of a single parse attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParseResult {
    Action(Action),
    Finish(Finish),
    Error(ParseError),
}

impl ParseResult {
    /// Return the action if this result is one.
    pub fn as_action(&self) -> Option<&Action> {
        match self {
            ParseResult::Action(action) => Some(action),
            _ => None,
        }
    }

    /// Return the finish if this result is one.
    pub fn as_finish(&self) -> Option<&Finish> {
        match self {
            ParseResult::Finish(finish) => Some(finish),
            _ => None,
        }
    }
}
