//! Scenario 1: Catalog Search
//!
//! The full two-level flow. The orchestrator asks the planner for a plan,
//! hands the plan to the controller, and the controller runs a nested agent
//! that executes each step with `requests_get`.
//!
//! Model calls, in order:
//!   1. orchestrator → `Catalog api_planner`
//!   2. planner      → two-step plan
//!   3. orchestrator → `Catalog api_controller` with the plan
//!   4. controller   → `requests_get` search
//!   5. parsing      → condensed search results
//!   6. controller   → `requests_get` game record
//!   7. parsing      → condensed game record
//!   8. controller   → final answer
//!   9. orchestrator → final answer

use stepwise_contracts::{error::StepwiseResult, execution::RunOutcome};

use super::{print_outcome, Harness};

pub const QUERY: &str = "Recommend me a highly rated puzzle game and tell me what it is about.";

pub const SCRIPT: [&str; 9] = [
    "I should plan the API calls first.\nAction: Catalog api_planner\nAction Input: find a highly rated puzzle game and its description",
    "1. GET /games/search?q=puzzle | search puzzle games\n2. GET /games/{id} | fetch the record of the best rated result",
    "I have a plan, now I should execute it.\nAction: Catalog api_controller\nAction Input: 1. GET /games/search?q=puzzle | search puzzle games\n2. GET /games/{id} | fetch the record of the best rated result",
    "First search for puzzle games.\nAction: requests_get\nAction Input: {\"url\": \"https://catalog.example.com/games/search\", \"params\": {\"q\": \"puzzle\"}, \"output_instructions\": \"ids, titles and ratings\"}",
    "Portal Pals (id 7, rating 4.8); Gear Grinder (id 12, rating 4.1)",
    "Portal Pals is rated highest, fetch its record.\nAction: requests_get\nAction Input: {\"url\": \"https://catalog.example.com/games/7\", \"output_instructions\": \"title, summary and price\"}",
    "Portal Pals: co-op portal puzzles for two players, $14.99",
    "I am finished executing the plan.\nFinal Answer: Portal Pals (rating 4.8) offers co-op portal puzzles for two players for $14.99.",
    "I have the information the user asked for.\nFinal Answer: Try Portal Pals, rated 4.8: co-op portal puzzles for two players, $14.99.",
];

/// Run the scenario on `harness` and return the orchestrator's outcome.
pub fn execute(harness: &Harness) -> StepwiseResult<RunOutcome> {
    let config = crate::config()?;
    let orchestrator = harness.orchestrator(&config)?;
    orchestrator.run(QUERY, harness.observer())
}

/// Run Scenario 1: Catalog Search.
pub fn run_scenario() -> StepwiseResult<()> {
    println!("=== Scenario 1: Catalog Search ===");
    println!();
    println!("  Query: {}", QUERY);
    println!();

    let harness = Harness::new(&SCRIPT);
    let outcome = execute(&harness)?;

    print_outcome(&outcome);
    println!();
    harness.print_summary();
    println!();
    println!("  Scenario 1 complete.");
    println!();

    Ok(())
}
