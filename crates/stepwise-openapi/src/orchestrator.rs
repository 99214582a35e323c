//! The top-level orchestrator agent.
//!
//! The orchestrator only plans and delegates: for every registered API it
//! holds an `api_planner` tool and an `api_controller` tool, and it recovers
//! from controller failures by re-planning.

use std::{collections::HashMap, sync::Arc};

use tracing::info;

use stepwise_contracts::{
    endpoint::{ApiPlugin, ReducedApiSpec},
    error::StepwiseResult,
};
use stepwise_core::{
    config::AgentConfig,
    executor::Agent,
    prompt::PromptTemplate,
    registry::ToolRegistry,
    traits::LanguageModel,
};

use crate::{
    controller::ApiControllerTool, http::HttpClient, planner::ApiPlannerTool,
    prompts::API_ORCHESTRATOR_PROMPT,
};

/// Build the orchestrator for `plugins`.
///
/// Tools are registered planner-then-controller per plugin, in the order
/// given. Two plugins with the same name fail with `DuplicateTool`. The
/// planner and controller report to whatever observer the orchestrator run
/// is given.
pub fn build_orchestrator(
    plugins: Vec<(ReducedApiSpec, ApiPlugin)>,
    http: Arc<dyn HttpClient>,
    model: Arc<dyn LanguageModel>,
    config: &AgentConfig,
) -> StepwiseResult<Agent> {
    let mut tools = ToolRegistry::new();

    for (spec, plugin) in plugins {
        let spec = Arc::new(spec);
        tools.register(ApiPlannerTool::new(&spec, &plugin, Arc::clone(&model))?)?;
        tools.register(ApiControllerTool::with_requests_tools(
            spec,
            &plugin,
            Arc::clone(&http),
            Arc::clone(&model),
            config.agent.clone(),
            &config.openapi,
        )?)?;
    }

    info!(tools = %tools.tool_names(), "orchestrator assembled");
    Agent::new(
        "orchestrator",
        PromptTemplate::new("api_orchestrator", API_ORCHESTRATOR_PROMPT)?,
        HashMap::new(),
        tools,
        model,
        config.agent.clone(),
    )
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use serde_json::json;

    use stepwise_contracts::{
        endpoint::{ApiPlugin, ReducedApiSpec},
        error::StepwiseError,
        execution::RunOutcome,
        transcript::RunId,
    };
    use stepwise_core::{config::AgentConfig, traits::RunObserver};

    use crate::{
        http::HttpResponse,
        testing::{QueueModel, RecordingHttp},
    };

    use super::build_orchestrator;

    fn api(name: &str) -> (ReducedApiSpec, ApiPlugin) {
        let spec = serde_json::from_value(json!({
            "servers": [{ "url": "https://games.example.com" }],
            "endpoints": [{ "name": "GET /games/search", "description": "Search games", "docs": {} }]
        }))
        .unwrap();
        (spec, ApiPlugin { name: name.to_string(), description: format!("the {name} API") })
    }

    /// Counts model calls across every nested run.
    #[derive(Default)]
    struct ModelStarts(Mutex<usize>);

    impl RunObserver for ModelStarts {
        fn on_model_start(&self, _run_id: RunId, _prompt: &str) {
            *self.0.lock().unwrap() += 1;
        }
    }

    fn http() -> Arc<RecordingHttp> {
        Arc::new(RecordingHttp::with_response(HttpResponse::json(r#"[{"id":3,"name":"Tetris"}]"#)))
    }

    #[test]
    fn tools_are_registered_per_plugin() {
        let agent = build_orchestrator(
            vec![api("Game"), api("Store")],
            http(),
            Arc::new(QueueModel::new(&[])),
            &AgentConfig::default(),
        )
        .unwrap();

        assert_eq!(
            agent.tools().tool_names(),
            "Game api_planner, Game api_controller, Store api_planner, Store api_controller"
        );
    }

    #[test]
    fn duplicate_plugin_names_are_rejected() {
        let result = build_orchestrator(
            vec![api("Game"), api("Game")],
            http(),
            Arc::new(QueueModel::new(&[])),
            &AgentConfig::default(),
        );
        assert!(matches!(result, Err(StepwiseError::DuplicateTool { ref name }) if name == "Game api_planner"));
    }

    #[test]
    fn plan_then_execute() {
        let model = Arc::new(QueueModel::new(&[
            // orchestrator
            "I should plan first.\nAction: Game api_planner\nAction Input: find a puzzle game",
            // planner
            "1. GET /games/search?q=puzzle | search puzzle games",
            // orchestrator
            "Now execute it.\nAction: Game api_controller\nAction Input: 1. GET /games/search?q=puzzle | search puzzle games",
            // controller
            "Action: requests_get\nAction Input: {\"url\": \"https://games.example.com/games/search\", \"params\": {\"q\": \"puzzle\"}, \"output_instructions\": \"game names\"}",
            // parsing prompt
            "Tetris",
            // controller
            "Final Answer: Tetris",
            // orchestrator
            "I have the answer.\nFinal Answer: Try Tetris.",
        ]));
        let http = http();
        let agent = build_orchestrator(
            vec![api("Game")],
            http.clone(),
            model.clone(),
            &AgentConfig::default(),
        )
        .unwrap();

        let starts = ModelStarts::default();

        let outcome = agent.run("recommend a puzzle game", &starts).unwrap();

        match outcome {
            RunOutcome::Finished { output, iterations, .. } => {
                assert_eq!(output, "Try Tetris.");
                assert_eq!(iterations, 2);
            }
            other => panic!("expected Finished, got {:?}", other),
        }
        assert_eq!(
            *http.calls.lock().unwrap(),
            vec!["GET https://games.example.com/games/search {\"q\":\"puzzle\"}"]
        );
        assert_eq!(model.prompts.lock().unwrap().len(), 7);
        // planner, controller and parsing calls all report to the run's observer
        assert_eq!(*starts.0.lock().unwrap(), 7);
    }
}
