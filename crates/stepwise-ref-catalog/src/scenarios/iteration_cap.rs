//! Scenario 4: Iteration Cap
//!
//! The model keeps re-planning and never calls the controller or answers.
//! With `max_iterations` lowered to 3 the loop stops after the third action
//! and reports `Exhausted`; it is not an error.

use stepwise_contracts::{error::StepwiseResult, execution::RunOutcome};

use super::{print_outcome, Harness};

pub const QUERY: &str = "Find the perfect game for me.";

pub const MAX_ITERATIONS: usize = 3;

const REPLAN: &str = "The plan may not be good enough yet.\nAction: Catalog api_planner\nAction Input: the perfect game";
const PLAN: &str = "1. GET /games/search?q=perfect | search for the perfect game";

pub const SCRIPT: [&str; 6] = [REPLAN, PLAN, REPLAN, PLAN, REPLAN, PLAN];

/// Run the scenario on `harness` with the lowered cap.
pub fn execute(harness: &Harness) -> StepwiseResult<RunOutcome> {
    let mut config = crate::config()?;
    config.agent.max_iterations = MAX_ITERATIONS;
    harness.orchestrator(&config)?.run(QUERY, harness.observer())
}

/// Run Scenario 4: Iteration Cap.
pub fn run_scenario() -> StepwiseResult<()> {
    println!("=== Scenario 4: Iteration Cap ===");
    println!();
    println!("  Query: {}", QUERY);
    println!("  max_iterations: {}", MAX_ITERATIONS);
    println!();

    let harness = Harness::new(&SCRIPT);
    let outcome = execute(&harness)?;

    print_outcome(&outcome);
    println!();
    harness.print_summary();
    println!();
    println!("  Scenario 4 complete.");
    println!();

    Ok(())
}
