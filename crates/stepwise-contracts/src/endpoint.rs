//! Reduced API specification types.
//!
//! A reduced specification is a filtered OpenAPI document that keeps only
//! what the planner and controller need: a base URL and, per endpoint, its
//! `METHOD /path` name, a one-line description and a documentation blob.
//!
//! On the wire each endpoint is a record:
//!
//! ```json
//! { "name": "GET /users/{id}", "description": "Fetch a user", "docs": { "parameters": [] } }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A server entry from the specification's `servers` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Server {
    pub url: String,
}

/// One endpoint of a reduced API specification.
///
/// Read-only during a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "EndpointRecord", into = "EndpointRecord")]
pub struct EndpointDescriptor {
    /// Uppercase HTTP method, e.g. `GET`.
    pub method: String,
    /// Path template, e.g. `/users/{id}`.
    pub path: String,
    pub summary: Option<String>,
    /// The full documentation blob for this endpoint.
    pub docs: Value,
}

impl EndpointDescriptor {
    /// The canonical `METHOD /path` name of this endpoint.
    pub fn name(&self) -> String {
        format!("{} {}", self.method, self.path)
    }

    /// The enumerated values a path parameter is restricted to, if any.
    ///
    /// Looks for `docs.parameters[*]` with a matching `name` and a
    /// `schema.enum` array. Returns `None` when the parameter is unknown or
    /// unconstrained.
    pub fn enum_values(&self, parameter: &str) -> Option<&[Value]> {
        self.docs
            .get("parameters")?
            .as_array()?
            .iter()
            .find(|p| p.get("name").and_then(Value::as_str) == Some(parameter))?
            .get("schema")?
            .get("enum")?
            .as_array()
            .map(Vec::as_slice)
    }
}

/// Serialized form of an `EndpointDescriptor`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct EndpointRecord {
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    docs: Value,
}

impl TryFrom<EndpointRecord> for EndpointDescriptor {
    type Error = String;

    fn try_from(record: EndpointRecord) -> Result<Self, Self::Error> {
        let (method, path) = record
            .name
            .trim()
            .split_once(char::is_whitespace)
            .ok_or_else(|| format!("endpoint name '{}' is not 'METHOD /path'", record.name))?;
        let path = path.trim();
        if !path.starts_with('/') {
            return Err(format!("endpoint path '{path}' must start with '/'"));
        }
        Ok(Self {
            method: method.to_uppercase(),
            path: path.to_string(),
            summary: record.description,
            docs: record.docs,
        })
    }
}

impl From<EndpointDescriptor> for EndpointRecord {
    fn from(endpoint: EndpointDescriptor) -> Self {
        Self {
            name: endpoint.name(),
            description: endpoint.summary,
            docs: endpoint.docs,
        }
    }
}

/// A filtered API specification: base servers plus an ordered endpoint list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReducedApiSpec {
    pub servers: Vec<Server>,
    #[serde(default)]
    pub description: Option<String>,
    pub endpoints: Vec<EndpointDescriptor>,
}

impl ReducedApiSpec {
    /// The first server URL, used as the base URL for requests.
    pub fn base_url(&self) -> Option<&str> {
        self.servers.first().map(|s| s.url.as_str())
    }
}

/// Display metadata for one API exposed to the orchestrator.
///
/// The plugin name prefixes the planner and controller tool names, so two
/// APIs can be registered side by side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiPlugin {
    pub name: String,
    pub description: String,
}
