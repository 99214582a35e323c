//! The API planner tool: one model call that turns a query into a plan.

use std::{collections::HashMap, sync::Arc};

use stepwise_contracts::{
    endpoint::{ApiPlugin, ReducedApiSpec},
    error::StepwiseResult,
};
use stepwise_core::{
    prompt::{PartialPrompt, PromptTemplate},
    traits::{LanguageModel, NoopObserver, RunObserver, Tool},
};

use crate::{
    chain::predict,
    prompts::{api_planner_tool_description, API_PLANNER_PROMPT, API_PLANNER_TOOL_NAME},
};

/// `- METHOD /path description`, one line per endpoint, in spec order.
pub fn endpoint_listing(spec: &ReducedApiSpec) -> String {
    spec.endpoints
        .iter()
        .map(|endpoint| {
            let line = format!("- {} {}", endpoint.name(), endpoint.summary.as_deref().unwrap_or_default());
            line.trim_end().to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Exposed to the orchestrator as `"{plugin} api_planner"`.
pub struct ApiPlannerTool {
    name: String,
    description: String,
    prompt: PartialPrompt,
    model: Arc<dyn LanguageModel>,
}

impl ApiPlannerTool {
    pub fn new(spec: &ReducedApiSpec, plugin: &ApiPlugin, model: Arc<dyn LanguageModel>) -> StepwiseResult<Self> {
        let statics = HashMap::from([("endpoints".to_string(), endpoint_listing(spec))]);
        let prompt = PromptTemplate::new(API_PLANNER_TOOL_NAME, API_PLANNER_PROMPT)?.partial(statics);
        prompt.validate(&["query"])?;

        Ok(Self {
            name: format!("{} {}", plugin.name, API_PLANNER_TOOL_NAME),
            description: api_planner_tool_description(&plugin.name, &plugin.description),
            prompt,
            model,
        })
    }
}

impl Tool for ApiPlannerTool {
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
        let runtime = HashMap::from([("query".to_string(), input.to_string())]);
        let prompt = self.prompt.render(&runtime)?;
        predict(self.model.as_ref(), observer, prompt)
    }
}
