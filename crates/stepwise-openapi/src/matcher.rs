//! Endpoint extraction and structural matching.
//!
//! A plan is free text produced by the planner. Every `METHOD /path`
//! fragment in it must resolve to exactly one documented endpoint before the
//! controller makes any request.
//!
//! Matching rules, applied to each spec endpoint in order (first match wins):
//!
//! 1. methods are equal
//! 2. both paths have the same number of segments after trimming `/`
//! 3. per segment: a `{param}` template segment matches anything, unless the
//!    parameter declares `schema.enum`, in which case the concrete segment
//!    must be one of the enumerated values; literal segments compare exactly

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tracing::debug;

use stepwise_contracts::{
    endpoint::{EndpointDescriptor, ReducedApiSpec},
    error::{StepwiseError, StepwiseResult},
};

static ENDPOINT_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(GET|POST|PUT|PATCH|DELETE)\s+(/\S+)").expect("endpoint regex is valid")
});

/// Characters a plan may put right after a path: markdown code spans and
/// sentence punctuation.
const TRAILING_PUNCTUATION: &[char] = &['`', '.', ',', ';', ':', ')'];

/// A `METHOD /path` reference found in a plan, query string removed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EndpointRef {
    pub method: String,
    pub path: String,
}

impl EndpointRef {
    pub fn name(&self) -> String {
        format!("{} {}", self.method, self.path)
    }
}

/// Extract every endpoint reference from `plan`, deduplicated in first-seen
/// order.
pub fn extract_endpoints(plan: &str) -> Vec<EndpointRef> {
    let mut refs: Vec<EndpointRef> = Vec::new();
    for caps in ENDPOINT_REF.captures_iter(plan) {
        let path = caps[2].trim_end_matches(TRAILING_PUNCTUATION);
        let path = path.split('?').next().unwrap_or_default();
        let found = EndpointRef { method: caps[1].to_string(), path: path.to_string() };
        if !refs.contains(&found) {
            refs.push(found);
        }
    }
    refs
}

/// Does the concrete `reference` structurally match `endpoint`?
pub fn matches(endpoint: &EndpointDescriptor, reference: &EndpointRef) -> bool {
    if endpoint.method != reference.method {
        return false;
    }

    let template: Vec<&str> = endpoint.path.trim_matches('/').split('/').collect();
    let concrete: Vec<&str> = reference.path.trim_matches('/').split('/').collect();
    if template.len() != concrete.len() {
        return false;
    }

    template.iter().zip(&concrete).all(|(expected, actual)| {
        match expected.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
            Some(param) => match endpoint.enum_values(param) {
                Some(allowed) => allowed.iter().any(|v| enum_member(v, actual)),
                None => true,
            },
            None => expected == actual,
        }
    })
}

fn enum_member(value: &Value, segment: &str) -> bool {
    match value {
        Value::String(s) => s == segment,
        other => other.to_string() == segment,
    }
}

/// Find the first endpoint in `spec` matching `reference`.
pub fn match_endpoint<'a>(
    spec: &'a ReducedApiSpec,
    reference: &EndpointRef,
) -> Option<&'a EndpointDescriptor> {
    spec.endpoints.iter().find(|endpoint| matches(endpoint, reference))
}

/// Resolve every endpoint a plan mentions.
///
/// Fails with `UnknownEndpoint` on the first reference that matches nothing,
/// before the caller has a chance to make any request.
pub fn resolve_plan<'a>(
    spec: &'a ReducedApiSpec,
    plan: &str,
) -> StepwiseResult<Vec<(EndpointRef, &'a EndpointDescriptor)>> {
    extract_endpoints(plan)
        .into_iter()
        .map(|reference| match match_endpoint(spec, &reference) {
            Some(endpoint) => {
                debug!(reference = %reference.name(), endpoint = %endpoint.name(), "plan endpoint matched");
                Ok((reference, endpoint))
            }
            None => Err(StepwiseError::UnknownEndpoint { endpoint: reference.name() }),
        })
        .collect()
}
