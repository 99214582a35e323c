//! `tracing`-backed observer.

use tracing::{debug, info, trace, warn};

use stepwise_contracts::{
    action::{Action, Finish},
    error::StepwiseError,
    execution::{Completion, TokenUsage},
    transcript::RunId,
};
use stepwise_core::traits::RunObserver;

/// Emits one structured `tracing` event per hook.
///
/// Tokens are logged at `trace`, model and tool traffic at `debug`, agent
/// decisions and usage at `info`, failures at `warn`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl RunObserver for TracingObserver {
    fn on_model_start(&self, run_id: RunId, prompt: &str) {
        debug!(run_id = %run_id, prompt_chars = prompt.chars().count(), "model call started");
    }

    fn on_token(&self, run_id: RunId, token: &str) {
        trace!(run_id = %run_id, token, "token");
    }

    fn on_model_end(&self, run_id: RunId, completion: &Completion) {
        debug!(run_id = %run_id, text = %completion.text, "model call finished");
    }

    fn on_model_error(&self, run_id: RunId, error: &StepwiseError) {
        warn!(run_id = %run_id, error = %error, "model call failed");
    }

    fn on_agent_action(&self, run_id: RunId, action: &Action) {
        info!(run_id = %run_id, tool = %action.tool_name, input = %action.tool_input, "agent action");
    }

    fn on_tool_start(&self, run_id: RunId, tool: &str, input: &str) {
        debug!(run_id = %run_id, tool, input, "tool started");
    }

    fn on_tool_end(&self, run_id: RunId, tool: &str, output: &str) {
        debug!(run_id = %run_id, tool, output, "tool finished");
    }

    fn on_tool_error(&self, run_id: RunId, tool: &str, error: &StepwiseError) {
        warn!(run_id = %run_id, tool, error = %error, "tool failed");
    }

    fn on_agent_finish(&self, run_id: RunId, finish: &Finish) {
        info!(run_id = %run_id, output = %finish.output, "agent finished");
    }

    fn on_usage(&self, run_id: RunId, usage: &TokenUsage) {
        info!(
            run_id = %run_id,
            prompt_tokens = usage.prompt_tokens,
            completion_tokens = usage.completion_tokens,
            total_tokens = usage.total_tokens,
            "token usage"
        );
    }
}
