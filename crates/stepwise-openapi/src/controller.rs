//! The API controller tool.
//!
//! Each invocation receives a plan, resolves the endpoints it names against
//! the reduced specification, and runs a fresh controller agent whose prompt
//! carries only the documentation for those endpoints.

use std::{collections::HashMap, sync::Arc};

use tracing::{info, warn};

use stepwise_contracts::{
    endpoint::{ApiPlugin, ReducedApiSpec},
    error::{StepwiseError, StepwiseResult},
    execution::RunOutcome,
};
use stepwise_core::{
    config::{LoopConfig, OpenApiConfig},
    executor::Agent,
    prompt::PromptTemplate,
    registry::ToolRegistry,
    traits::{LanguageModel, NoopObserver, RunObserver, Tool},
};

use crate::{
    http::HttpClient,
    matcher::resolve_plan,
    prompts::{api_controller_tool_description, API_CONTROLLER_PROMPT, API_CONTROLLER_TOOL_NAME},
    requests::requests_toolkit,
};

/// Exposed to the orchestrator as `"{plugin} api_controller"`.
pub struct ApiControllerTool {
    name: String,
    description: String,
    spec: Arc<ReducedApiSpec>,
    base_url: String,
    template: PromptTemplate,
    tools: ToolRegistry,
    model: Arc<dyn LanguageModel>,
    loop_config: LoopConfig,
    unknown_endpoint_recoverable: bool,
}

impl ApiControllerTool {
    /// Returns `ConfigError` if the specification has no server URL.
    pub fn new(
        spec: Arc<ReducedApiSpec>,
        plugin: &ApiPlugin,
        tools: ToolRegistry,
        model: Arc<dyn LanguageModel>,
        loop_config: LoopConfig,
        openapi: &OpenApiConfig,
    ) -> StepwiseResult<Self> {
        let base_url = spec
            .base_url()
            .ok_or_else(|| StepwiseError::ConfigError {
                reason: format!("API '{}' has no server URL", plugin.name),
            })?
            .to_string();

        Ok(Self {
            name: format!("{} {}", plugin.name, API_CONTROLLER_TOOL_NAME),
            description: api_controller_tool_description(&plugin.name),
            spec,
            base_url,
            template: PromptTemplate::new(API_CONTROLLER_TOOL_NAME, API_CONTROLLER_PROMPT)?,
            tools,
            model,
            loop_config,
            unknown_endpoint_recoverable: openapi.unknown_endpoint_recoverable,
        })
    }

    /// Build a controller whose agent uses the full requests toolkit.
    pub fn with_requests_tools(
        spec: Arc<ReducedApiSpec>,
        plugin: &ApiPlugin,
        http: Arc<dyn HttpClient>,
        model: Arc<dyn LanguageModel>,
        loop_config: LoopConfig,
        openapi: &OpenApiConfig,
    ) -> StepwiseResult<Self> {
        let tools = requests_toolkit(http, Arc::clone(&model), openapi.response_length)?;
        Self::new(spec, plugin, tools, model, loop_config, openapi)
    }

    /// The documentation block for every endpoint the plan names.
    ///
    /// Fails with `UnknownEndpoint`, or with a recoverable `ToolFailed` when
    /// configured, if any reference matches nothing.
    pub fn api_docs(&self, plan: &str) -> StepwiseResult<String> {
        let resolved = resolve_plan(&self.spec, plan).map_err(|err| match err {
            StepwiseError::UnknownEndpoint { .. } if self.unknown_endpoint_recoverable => {
                warn!(tool = %self.name, error = %err, "plan names an unknown endpoint");
                StepwiseError::ToolFailed { tool: self.name.clone(), reason: err.to_string() }
            }
            other => other,
        })?;

        let mut docs = String::new();
        for (reference, endpoint) in resolved {
            let rendered = serde_json::to_string_pretty(&endpoint.docs).map_err(|e| StepwiseError::ConfigError {
                reason: format!("failed to render docs for {}: {e}", endpoint.name()),
            })?;
            docs.push_str(&format!("== Docs for {} == \n{}\n", reference.name(), rendered));
        }
        Ok(docs)
    }
}

impl Tool for ApiControllerTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn invoke(&self, input: &str) -> StepwiseResult<String> {
        self.invoke_in_run(input, &NoopObserver)
    }

    /// The controller agent and its requests tools report to `observer`.
    fn invoke_in_run(&self, input: &str, observer: &dyn RunObserver) -> StepwiseResult<String> {
        let api_docs = self.api_docs(input)?;
        let statics = HashMap::from([
            ("api_url".to_string(), self.base_url.clone()),
            ("api_docs".to_string(), api_docs),
        ]);

        let agent = Agent::new(
            format!("{} agent", self.name),
            self.template.clone(),
            statics,
            self.tools.clone(),
            Arc::clone(&self.model),
            self.loop_config.clone(),
        )?;

        info!(tool = %self.name, "running controller agent on plan");
        match agent.run(input, observer)? {
            RunOutcome::Finished { output, .. } => Ok(output),
            RunOutcome::Exhausted { .. } => Ok(self.loop_config.early_stop_message.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use stepwise_contracts::{
        endpoint::{ApiPlugin, ReducedApiSpec},
        error::StepwiseError,
    };
    use stepwise_core::{
        config::{LoopConfig, OpenApiConfig},
        traits::Tool,
    };

    use crate::{
        http::HttpResponse,
        testing::{QueueModel, RecordingHttp},
    };

    use super::ApiControllerTool;

    fn users_spec() -> Arc<ReducedApiSpec> {
        Arc::new(
            serde_json::from_value(json!({
                "servers": [{ "url": "https://api.example.com" }],
                "endpoints": [
                    {
                        "name": "GET /users/{id}",
                        "description": "Fetch a user",
                        "docs": { "parameters": [{ "name": "id", "in": "path", "required": true }] }
                    }
                ]
            }))
            .unwrap(),
        )
    }

    fn controller(model: Arc<QueueModel>, http: Arc<RecordingHttp>, recoverable: bool) -> ApiControllerTool {
        ApiControllerTool::with_requests_tools(
            users_spec(),
            &ApiPlugin { name: "Users".to_string(), description: "user directory".to_string() },
            http,
            model,
            LoopConfig { max_iterations: 3, ..LoopConfig::default() },
            &OpenApiConfig { unknown_endpoint_recoverable: recoverable, ..OpenApiConfig::default() },
        )
        .unwrap()
    }

    #[test]
    fn docs_block_names_the_plan_reference() {
        let tool = controller(
            Arc::new(QueueModel::new(&[])),
            Arc::new(RecordingHttp::with_response(HttpResponse::json("{}"))),
            false,
        );

        let docs = tool.api_docs("1. GET /users/42 | fetch the user").unwrap();

        assert!(docs.starts_with("== Docs for GET /users/42 == \n{"), "unexpected docs: {docs}");
        assert!(docs.contains("\"required\": true"));
        assert!(docs.ends_with("}\n"));
    }

    #[test]
    fn plan_is_executed_by_a_controller_agent() {
        let model = Arc::new(QueueModel::new(&[
            "I need the user.\nAction: requests_get\nAction Input: {\"url\": \"https://api.example.com/users/42\", \"output_instructions\": \"the name\"}",
            "Ada",
            "Thought: done\nFinal Answer: The user is Ada.",
        ]));
        let http = Arc::new(RecordingHttp::with_response(HttpResponse::json(r#"{"id":42,"name":"Ada"}"#)));
        let tool = controller(model.clone(), http.clone(), false);

        let output = tool.invoke("1. GET /users/42 | fetch the user").unwrap();

        assert_eq!(output, "The user is Ada.");
        assert_eq!(http.calls.lock().unwrap().len(), 1);

        let prompts = model.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 3);
        assert!(prompts[0].contains("Base url: https://api.example.com"));
        assert!(prompts[0].contains("== Docs for GET /users/42 == "));
        assert!(prompts[0].contains("[requests_get, requests_post, requests_put, requests_patch, requests_delete]"));
        assert!(prompts[2].contains("Observation: Ada\nThought: "));
    }

    #[test]
    fn unknown_endpoint_is_fatal_by_default() {
        let model = Arc::new(QueueModel::new(&[]));
        let tool = controller(model.clone(), Arc::new(RecordingHttp::with_response(HttpResponse::json("{}"))), false);

        match tool.invoke("1. GET /users/42/friends | list friends") {
            Err(StepwiseError::UnknownEndpoint { endpoint }) => assert_eq!(endpoint, "GET /users/42/friends"),
            other => panic!("expected UnknownEndpoint, got {:?}", other),
        }
        assert!(model.prompts.lock().unwrap().is_empty(), "no model call may happen");
    }

    #[test]
    fn unknown_endpoint_can_be_made_recoverable() {
        let tool = controller(
            Arc::new(QueueModel::new(&[])),
            Arc::new(RecordingHttp::with_response(HttpResponse::json("{}"))),
            true,
        );

        let err = tool.invoke("POST /users").unwrap_err();
        assert!(err.is_recoverable());
        assert!(err.to_string().contains("POST /users endpoint does not exist"));
    }
}
