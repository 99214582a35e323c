//! Ready-made `Tool` implementations.
//!
//! `FnTool` adapts any `Fn(&str) -> StepwiseResult<String>`; `AgentTool`
//! exposes a whole agent run as a single observation-producing tool, which
//! is how a top-level loop drives a lower-level one.

use std::{fmt, sync::Arc};

use stepwise_contracts::{error::StepwiseResult, execution::RunOutcome};

use crate::{
    executor::Agent,
    traits::{NoopObserver, RunObserver, Tool},
};

type ToolFn = dyn Fn(&str) -> StepwiseResult<String> + Send + Sync;

/// A tool backed by a closure.
pub struct FnTool {
    name: String,
    description: String,
    func: Box<ToolFn>,
}

impl FnTool {
    pub fn new<F>(name: impl Into<String>, description: impl Into<String>, func: F) -> Self
    where
        F: Fn(&str) -> StepwiseResult<String> + Send + Sync + 'static,
    {
        Self { name: name.into(), description: description.into(), func: Box::new(func) }
    }
}

impl fmt::Debug for FnTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnTool").field("name", &self.name).finish()
    }
}

impl Tool for FnTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn invoke(&self, input: &str) -> StepwiseResult<String> {
        (self.func)(input)
    }
}

/// An agent exposed as a tool.
///
/// Each invocation is an independent run with its own transcript and
/// iteration cap. A run that exhausts its cap yields the agent's configured
/// `early_stop_message`. Inside an outer run the inner run reports to the
/// outer run's observer; a direct `invoke` is unobserved.
pub struct AgentTool {
    name: String,
    description: String,
    agent: Arc<Agent>,
}

impl AgentTool {
    pub fn new(name: impl Into<String>, description: impl Into<String>, agent: Arc<Agent>) -> Self {
        Self { name: name.into(), description: description.into(), agent }
    }
}

impl Tool for AgentTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn invoke(&self, input: &str) -> StepwiseResult<String> {
        self.invoke_in_run(input, &NoopObserver)
    }

    fn invoke_in_run(&self, input: &str, observer: &dyn RunObserver) -> StepwiseResult<String> {
        match self.agent.run(input, observer)? {
            RunOutcome::Finished { output, .. } => Ok(output),
            RunOutcome::Exhausted { .. } => Ok(self.agent.config().early_stop_message.clone()),
        }
    }
}
