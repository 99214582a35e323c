//! # stepwise-ref-catalog
//!
//! Game-catalog reference runtime for the stepwise agent loop.
//!
//! Demonstrates four scenarios against a mock catalog API:
//!
//! 1. **Catalog Search**: orchestrator plans, the controller executes two
//!    GET requests, the answer flows back up both levels.
//! 2. **Self-Correction**: malformed model output and an invalid request
//!    are fed back as observations and the model recovers.
//! 3. **Unknown Endpoint**: a hallucinated endpoint aborts the run, then the
//!    same plan is re-planned when the failure is configured recoverable.
//! 4. **Iteration Cap**: a model that never finishes is stopped.
//!
//! The model is scripted and the catalog is hardcoded. No external API calls
//! are made.

pub mod http;
pub mod mock_data;
pub mod model;
pub mod scenarios;

use stepwise_contracts::error::StepwiseResult;
use stepwise_core::config::AgentConfig;

/// Embedded agent configuration shared by the scenarios.
const STEPWISE_CONFIG: &str = include_str!("../config/stepwise.toml");

/// The reference runtime's configuration.
pub fn config() -> StepwiseResult<AgentConfig> {
    AgentConfig::from_toml_str(STEPWISE_CONFIG)
}
