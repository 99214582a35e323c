//! Scenario 2: Self-Correction
//!
//! Two recoverable failures in one run, both fed back to the model as
//! observations:
//!
//! - the orchestrator forgets `Action Input:` and receives the format hint
//! - the controller sends a bare URL instead of JSON to `requests_get` and
//!   receives the validation error
//!
//! The model corrects itself each time and the run still finishes.

use stepwise_contracts::{error::StepwiseResult, execution::RunOutcome};

use super::{print_outcome, Harness};

pub const QUERY: &str = "What is the best strategy game in the catalog?";

pub const SCRIPT: [&str; 9] = [
    "Thought: I should plan the API calls first.\nAction: Catalog api_planner",
    "Action: Catalog api_planner\nAction Input: best strategy game",
    "1. GET /games/genre/strategy | list the top strategy games",
    "Action: Catalog api_controller\nAction Input: 1. GET /games/genre/strategy | list the top strategy games",
    "Action: requests_get\nAction Input: https://catalog.example.com/games/genre/strategy",
    "The input must be JSON.\nAction: requests_get\nAction Input: {\"url\": \"https://catalog.example.com/games/genre/strategy\", \"output_instructions\": \"title and rating of each game\"}",
    "Hex Dominion (id 33, rating 4.3)",
    "Final Answer: The top strategy game is Hex Dominion (rating 4.3).",
    "Final Answer: Hex Dominion is the best rated strategy game (4.3).",
];

/// Run the scenario on `harness` and return the orchestrator's outcome.
pub fn execute(harness: &Harness) -> StepwiseResult<RunOutcome> {
    let config = crate::config()?;
    let orchestrator = harness.orchestrator(&config)?;
    orchestrator.run(QUERY, harness.observer())
}

/// Run Scenario 2: Self-Correction.
pub fn run_scenario() -> StepwiseResult<()> {
    println!("=== Scenario 2: Self-Correction ===");
    println!();
    println!("  Query: {}", QUERY);
    println!();

    let harness = Harness::new(&SCRIPT);
    let outcome = execute(&harness)?;

    print_outcome(&outcome);
    println!();
    harness.print_summary();
    println!();
    println!("  Scenario 2 complete.");
    println!();

    Ok(())
}
