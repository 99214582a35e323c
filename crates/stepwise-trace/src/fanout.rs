//! Broadcast every hook to several observers.

use std::sync::Arc;

use stepwise_contracts::{
    action::{Action, Finish},
    error::StepwiseError,
    execution::{Completion, TokenUsage},
    transcript::RunId,
};
use stepwise_core::traits::RunObserver;

/// Calls each inner observer in registration order.
#[derive(Clone, Default)]
pub struct FanoutObserver {
    observers: Vec<Arc<dyn RunObserver>>,
}

impl FanoutObserver {
    pub fn new(observers: Vec<Arc<dyn RunObserver>>) -> Self {
        Self { observers }
    }

    pub fn push(&mut self, observer: Arc<dyn RunObserver>) {
        self.observers.push(observer);
    }

    fn each(&self, f: impl Fn(&dyn RunObserver)) {
        for observer in &self.observers {
            f(observer.as_ref());
        }
    }
}

impl RunObserver for FanoutObserver {
    fn on_model_start(&self, run_id: RunId, prompt: &str) {
        self.each(|o| o.on_model_start(run_id, prompt));
    }

    fn on_token(&self, run_id: RunId, token: &str) {
        self.each(|o| o.on_token(run_id, token));
    }

    fn on_model_end(&self, run_id: RunId, completion: &Completion) {
        self.each(|o| o.on_model_end(run_id, completion));
    }

    fn on_model_error(&self, run_id: RunId, error: &StepwiseError) {
        self.each(|o| o.on_model_error(run_id, error));
    }

    fn on_agent_action(&self, run_id: RunId, action: &Action) {
        self.each(|o| o.on_agent_action(run_id, action));
    }

    fn on_tool_start(&self, run_id: RunId, tool: &str, input: &str) {
        self.each(|o| o.on_tool_start(run_id, tool, input));
    }

    fn on_tool_end(&self, run_id: RunId, tool: &str, output: &str) {
        self.each(|o| o.on_tool_end(run_id, tool, output));
    }

    fn on_tool_error(&self, run_id: RunId, tool: &str, error: &StepwiseError) {
        self.each(|o| o.on_tool_error(run_id, tool, error));
    }

    fn on_agent_finish(&self, run_id: RunId, finish: &Finish) {
        self.each(|o| o.on_agent_finish(run_id, finish));
    }

    fn on_usage(&self, run_id: RunId, usage: &TokenUsage) {
        self.each(|o| o.on_usage(run_id, usage));
    }
}
