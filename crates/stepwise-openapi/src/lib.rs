//! # stepwise-openapi
//!
//! Hierarchical agents over reduced OpenAPI specifications.
//!
//! A top-level orchestrator agent holds two tools per API:
//!
//! - `"{plugin} api_planner"`: one model call that writes a plan of
//!   `METHOD /path` steps using only the documented endpoints
//! - `"{plugin} api_controller"`: resolves the plan's endpoints, then runs a
//!   nested agent armed with the requests tools and the matching docs
//!
//! Requests tools validate their JSON input against a JSON Schema, call the
//! `HttpClient`, and condense the (truncated) response with a parsing prompt.

pub mod chain;
pub mod controller;
pub mod http;
pub mod matcher;
pub mod orchestrator;
pub mod planner;
pub mod prompts;
pub mod requests;
pub mod spec;
pub mod validate;

#[cfg(test)]
mod testing;

pub use controller::ApiControllerTool;
pub use http::{HttpClient, HttpResponse};
pub use orchestrator::build_orchestrator;
pub use planner::ApiPlannerTool;
pub use requests::RequestsTool;
