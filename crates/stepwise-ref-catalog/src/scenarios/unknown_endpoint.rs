//! Scenario 3: Unknown Endpoint
//!
//! The planner invents `GET /games/7/reviews`, which the catalog does not
//! document. The controller refuses the plan before any request is made.
//!
//!   3a. Default configuration: the failure is fatal and the run aborts with
//!       `UnknownEndpoint`.
//!   3b. `unknown_endpoint_recoverable = true`: the failure becomes an
//!       observation, the orchestrator re-plans with a documented endpoint
//!       and finishes.

use stepwise_contracts::{error::StepwiseResult, execution::RunOutcome};

use super::{print_outcome, Harness};

pub const QUERY: &str = "What do players say about Portal Pals (game 7)?";

pub const FATAL_SCRIPT: [&str; 3] = [
    "Action: Catalog api_planner\nAction Input: reviews of game 7",
    "1. GET /games/7/reviews | fetch reviews of Portal Pals",
    "Action: Catalog api_controller\nAction Input: 1. GET /games/7/reviews | fetch reviews of Portal Pals",
];

pub const RECOVERABLE_SCRIPT: [&str; 10] = [
    "Action: Catalog api_planner\nAction Input: reviews of game 7",
    "1. GET /games/7/reviews | fetch reviews of Portal Pals",
    "Action: Catalog api_controller\nAction Input: 1. GET /games/7/reviews | fetch reviews of Portal Pals",
    "There is no reviews endpoint. The game record may help instead.\nAction: Catalog api_planner\nAction Input: record of game 7",
    "1. GET /games/7 | fetch the record of Portal Pals",
    "Action: Catalog api_controller\nAction Input: 1. GET /games/7 | fetch the record of Portal Pals",
    "Action: requests_get\nAction Input: {\"url\": \"https://catalog.example.com/games/7\", \"output_instructions\": \"rating and summary\"}",
    "rating 4.8, co-op portal puzzles for two players",
    "Final Answer: Portal Pals is rated 4.8 and is a co-op portal puzzle game for two players.",
    "Final Answer: The catalog has no reviews, but Portal Pals is rated 4.8 by players.",
];

/// 3a: run with the default configuration.
pub fn execute_fatal(harness: &Harness) -> StepwiseResult<RunOutcome> {
    let config = crate::config()?;
    harness.orchestrator(&config)?.run(QUERY, harness.observer())
}

/// 3b: run with unknown endpoints configured recoverable.
pub fn execute_recoverable(harness: &Harness) -> StepwiseResult<RunOutcome> {
    let mut config = crate::config()?;
    config.openapi.unknown_endpoint_recoverable = true;
    harness.orchestrator(&config)?.run(QUERY, harness.observer())
}

/// Run Scenario 3: Unknown Endpoint.
pub fn run_scenario() -> StepwiseResult<()> {
    println!("=== Scenario 3: Unknown Endpoint ===");
    println!();
    println!("  Query: {}", QUERY);
    println!();

    println!("  3a. unknown_endpoint_recoverable = false");
    let harness = Harness::new(&FATAL_SCRIPT);
    match execute_fatal(&harness) {
        Ok(outcome) => print_outcome(&outcome),
        Err(err) => {
            println!("  ABORTED:                {}", err);
            println!("  Recoverable:            {}", err.is_recoverable());
        }
    }
    harness.print_summary();
    println!();

    println!("  3b. unknown_endpoint_recoverable = true");
    let harness = Harness::new(&RECOVERABLE_SCRIPT);
    let outcome = execute_recoverable(&harness)?;
    print_outcome(&outcome);
    harness.print_summary();
    println!();
    println!("  Scenario 3 complete.");
    println!();

    Ok(())
}
