//! Game-catalog demo scenarios.
//!
//! Each scenario is a self-contained module that wires the real stepwise
//! components (orchestrator, planner, controller, requests tools, observers)
//! to a scripted model and the mock catalog, and demonstrates one distinct
//! behaviour of the loop.

pub mod catalog_search;
pub mod iteration_cap;
pub mod self_correction;
pub mod unknown_endpoint;

use std::sync::Arc;

use stepwise_contracts::{
    error::StepwiseResult,
    execution::RunOutcome,
    transcript::Turn,
};
use stepwise_core::{config::AgentConfig, executor::Agent, traits::RunObserver};
use stepwise_openapi::build_orchestrator;
use stepwise_trace::{FanoutObserver, RecordingObserver, TracingObserver};

use crate::{
    http::MockHttpClient,
    mock_data::{catalog_plugin, catalog_spec},
    model::ScriptedModel,
};

/// Everything one scenario run needs, with inspectable handles.
pub struct Harness {
    pub model: Arc<ScriptedModel>,
    pub http: Arc<MockHttpClient>,
    pub recorder: RecordingObserver,
    observer: Arc<dyn RunObserver>,
}

impl Harness {
    /// A harness whose model serves `script` in order.
    pub fn new(script: &[&str]) -> Self {
        let recorder = RecordingObserver::new();
        let observer: Arc<dyn RunObserver> =
            Arc::new(FanoutObserver::new(vec![Arc::new(TracingObserver), Arc::new(recorder.clone())]));
        Self {
            model: Arc::new(ScriptedModel::new(script.iter().copied())),
            http: Arc::new(MockHttpClient::new()),
            recorder,
            observer,
        }
    }

    pub fn observer(&self) -> &dyn RunObserver {
        self.observer.as_ref()
    }

    /// An orchestrator over the catalog API.
    pub fn orchestrator(&self, config: &AgentConfig) -> StepwiseResult<Agent> {
        build_orchestrator(
            vec![(catalog_spec()?, catalog_plugin())],
            self.http.clone(),
            self.model.clone(),
            config,
        )
    }

    /// Print what the observers and the mock API saw.
    pub fn print_summary(&self) {
        let usage = self.recorder.total_usage();
        println!("  HTTP requests:          {}", self.http.requests().len());
        for request in self.http.requests() {
            println!("    - {}", request);
        }
        println!("  Agent runs observed:    {}", self.recorder.run_ids().len());
        println!("  Trace records:          {}", self.recorder.len());
        println!(
            "  Token usage (approx.):  {} prompt + {} completion = {}",
            usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
        );
    }
}

/// Print the orchestrator's actions and the outcome of a run.
pub fn print_outcome(outcome: &RunOutcome) {
    for turn in outcome.transcript().turns() {
        match turn {
            Turn::Action(action) => println!("  Action:  {} <- {}", action.tool_name, first_line(&action.tool_input)),
            Turn::Observation(observation) if observation.is_error => {
                println!("  Observation [error]: {}", first_line(&observation.text))
            }
            Turn::Observation(observation) => println!("  Observation: {}", first_line(&observation.text)),
            Turn::Thought(_) | Turn::Finish(_) => {}
        }
    }

    match outcome {
        RunOutcome::Finished { output, iterations, .. } => {
            println!("  Outcome:                FINISHED after {} iteration(s)", iterations);
            println!("  Answer:                 {}", output);
        }
        RunOutcome::Exhausted { max_iterations, .. } => {
            println!("  Outcome:                EXHAUSTED (cap of {} iterations)", max_iterations);
        }
    }
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use stepwise_contracts::{error::StepwiseError, execution::RunOutcome, trace::TraceEvent};

    use super::{catalog_search, iteration_cap, self_correction, unknown_endpoint, Harness};

    #[test]
    fn catalog_search_finishes_with_two_requests() {
        let harness = Harness::new(&catalog_search::SCRIPT);
        let outcome = catalog_search::execute(&harness).unwrap();

        match &outcome {
            RunOutcome::Finished { output, iterations, .. } => {
                assert!(output.contains("Portal Pals"));
                assert_eq!(*iterations, 2);
            }
            other => panic!("expected Finished, got {:?}", other),
        }
        assert_eq!(
            harness.http.requests(),
            vec![
                "GET https://catalog.example.com/games/search".to_string(),
                "GET https://catalog.example.com/games/7".to_string(),
            ]
        );
        assert_eq!(harness.model.remaining(), 0);
        // orchestrator, planner, controller agent, two parsing calls
        assert_eq!(harness.recorder.run_ids().len(), 5);
    }

    #[test]
    fn catalog_search_prompts_carry_matched_docs() {
        let harness = Harness::new(&catalog_search::SCRIPT);
        catalog_search::execute(&harness).unwrap();

        let prompts = harness.model.prompts();
        assert!(prompts[1].contains("- GET /games/genre/{genre} List the top games of one genre"));
        let controller_prompt = &prompts[3];
        assert!(controller_prompt.contains("Base url: https://catalog.example.com"));
        assert!(controller_prompt.contains("== Docs for GET /games/search == "));
        assert!(controller_prompt.contains("== Docs for GET /games/{id} == "));
        assert!(!controller_prompt.contains("POST /wishlist"));
    }

    #[test]
    fn self_correction_recovers_from_both_failures() {
        let harness = Harness::new(&self_correction::SCRIPT);
        let outcome = self_correction::execute(&harness).unwrap();

        assert!(outcome.output().unwrap().contains("Hex Dominion"));
        let tool_errors = harness
            .recorder
            .records()
            .into_iter()
            .filter(|r| matches!(r.event, TraceEvent::ToolError { .. }))
            .count();
        assert_eq!(tool_errors, 1);
        assert_eq!(harness.http.requests(), vec!["GET https://catalog.example.com/games/genre/strategy".to_string()]);
    }

    #[test]
    fn unknown_endpoint_aborts_by_default() {
        let harness = Harness::new(&unknown_endpoint::FATAL_SCRIPT);
        match unknown_endpoint::execute_fatal(&harness) {
            Err(StepwiseError::UnknownEndpoint { endpoint }) => assert_eq!(endpoint, "GET /games/7/reviews"),
            other => panic!("expected UnknownEndpoint, got {:?}", other),
        }
        assert!(harness.http.requests().is_empty());
    }

    #[test]
    fn unknown_endpoint_replans_when_recoverable() {
        let harness = Harness::new(&unknown_endpoint::RECOVERABLE_SCRIPT);
        let outcome = unknown_endpoint::execute_recoverable(&harness).unwrap();

        assert!(outcome.output().unwrap().contains("4.8"));
        assert_eq!(outcome.transcript().actions().count(), 4);
        assert_eq!(harness.http.requests(), vec!["GET https://catalog.example.com/games/7".to_string()]);
    }

    #[test]
    fn iteration_cap_stops_the_run() {
        let harness = Harness::new(&iteration_cap::SCRIPT);
        match iteration_cap::execute(&harness).unwrap() {
            RunOutcome::Exhausted { max_iterations, transcript, .. } => {
                assert_eq!(max_iterations, iteration_cap::MAX_ITERATIONS);
                assert_eq!(transcript.actions().count(), iteration_cap::MAX_ITERATIONS);
            }
            other => panic!("expected Exhausted, got {:?}", other),
        }
        assert_eq!(harness.model.remaining(), 0);
    }

    #[test]
    fn every_scenario_runs_end_to_end() {
        catalog_search::run_scenario().unwrap();
        self_correction::run_scenario().unwrap();
        unknown_endpoint::run_scenario().unwrap();
        iteration_cap::run_scenario().unwrap();
    }
}
