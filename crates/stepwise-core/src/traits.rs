//! Core trait definitions for the stepwise agent loop.
//!
//! These three traits are the loop's complete boundary with the outside:
//!
//! - `LanguageModel`: opaque text generator (may stream)
//! - `Tool`: capability invoked with the model's action input
//! - `RunObserver`: fire-and-forget lifecycle hooks
//!
//! The executor wires them together. Nothing in the loop depends on what an
//! observer does with a notification.

use stepwise_contracts::{
    action::{Action, Finish},
    error::{StepwiseError, StepwiseResult},
    execution::{Completion, ModelRequest, TokenUsage},
    transcript::RunId,
};

/// A named capability the model can invoke by text.
///
/// Tools are owned by a `ToolRegistry` for the lifetime of one agent
/// configuration. A whole agent run can itself be a tool (see `AgentTool`).
pub trait Tool: Send + Sync {
    /// Unique name within a registry. The model must reproduce it exactly.
    fn name(&self) -> &str;

    /// One-line description rendered into the prompt as `name: description`.
    fn description(&self) -> &str;

    /// Run the tool on the model's action input.
    ///
    /// Inside an agent run every error becomes an observation the model can
    /// re-plan around, except those for which `is_fatal()` holds.
    fn invoke(&self, input: &str) -> StepwiseResult<String>;

    /// Run the tool as one step of an agent run observed by `observer`.
    ///
    /// Tools that call a model or run a nested agent override this so their
    /// tokens, usage and nested hooks reach the run's observer. The default
    /// ignores the observer.
    fn invoke_in_run(&self, input: &str, _observer: &dyn RunObserver) -> StepwiseResult<String> {
        self.invoke(input)
    }
}

/// The language model behind an agent.
///
/// Implementations that stream must push every fragment, in order, through
/// `observer.on_token()` and return the concatenation as `Completion::text`.
pub trait LanguageModel: Send + Sync {
    fn complete(
        &self,
        request: &ModelRequest,
        observer: &dyn RunObserver,
    ) -> StepwiseResult<Completion>;
}

/// Best-effort lifecycle hooks. Every method defaults to a no-op.
///
/// The executor calls these at fixed points but never inspects a result, so
/// an observer cannot change the course of a run.
pub trait RunObserver: Send + Sync {
    fn on_model_start(&self, _run_id: RunId, _prompt: &str) {}

    /// One streamed fragment of model output.
    fn on_token(&self, _run_id: RunId, _token: &str) {}

    fn on_model_end(&self, _run_id: RunId, _completion: &Completion) {}

    fn on_model_error(&self, _run_id: RunId, _error: &StepwiseError) {}

    fn on_agent_action(&self, _run_id: RunId, _action: &Action) {}

    fn on_tool_start(&self, _run_id: RunId, _tool: &str, _input: &str) {}

    fn on_tool_end(&self, _run_id: RunId, _tool: &str, _output: &str) {}

    fn on_tool_error(&self, _run_id: RunId, _tool: &str, _error: &StepwiseError) {}

    fn on_agent_finish(&self, _run_id: RunId, _finish: &Finish) {}

    /// Token accounting for one completion.
    fn on_usage(&self, _run_id: RunId, _usage: &TokenUsage) {}
}

/// An observer that ignores every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl RunObserver for NoopObserver {}
