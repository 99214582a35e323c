//! JSON Schema validation of requests-tool inputs.
//!
//! The model writes each request as a single-line JSON object. The input is
//! checked against a per-method schema before anything is sent, and every
//! violation is reported at once so the model can fix them in one retry.

use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::warn;

use stepwise_contracts::error::{StepwiseError, StepwiseResult};

/// The HTTP methods the requests tools support.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl RequestMethod {
    /// Every method, in the order the toolkit registers them.
    pub const ALL: [RequestMethod; 5] =
        [RequestMethod::Get, RequestMethod::Post, RequestMethod::Put, RequestMethod::Patch, RequestMethod::Delete];

    /// The tool name, e.g. `requests_get`.
    pub fn tool_name(self) -> &'static str {
        match self {
            RequestMethod::Get => "requests_get",
            RequestMethod::Post => "requests_post",
            RequestMethod::Put => "requests_put",
            RequestMethod::Patch => "requests_patch",
            RequestMethod::Delete => "requests_delete",
        }
    }

    /// The JSON Schema every input for this method must satisfy.
    pub fn input_schema(self) -> Value {
        let mut properties = json!({
            "url": { "type": "string", "minLength": 1 },
            "output_instructions": { "type": "string" },
        });
        let mut required = vec!["url", "output_instructions"];

        match self {
            RequestMethod::Get => {
                properties["params"] = json!({ "type": "object" });
            }
            RequestMethod::Post | RequestMethod::Put | RequestMethod::Patch => {
                properties["data"] = json!({ "type": "object" });
                required.push("data");
            }
            RequestMethod::Delete => {}
        }

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}

/// A validated requests-tool input.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RequestInput {
    pub url: String,
    #[serde(default)]
    pub params: Map<String, Value>,
    #[serde(default)]
    pub data: Value,
    pub output_instructions: String,
}

/// Compiled input validator for one requests tool.
pub struct InputValidator {
    method: RequestMethod,
    validator: jsonschema::Validator,
}

impl InputValidator {
    pub fn new(method: RequestMethod) -> StepwiseResult<Self> {
        let validator = jsonschema::validator_for(&method.input_schema()).map_err(|e| {
            StepwiseError::ConfigError {
                reason: format!("invalid input schema for {}: {e}", method.tool_name()),
            }
        })?;
        Ok(Self { method, validator })
    }

    pub fn method(&self) -> RequestMethod {
        self.method
    }

    /// Parse and validate `input`.
    ///
    /// Returns `InvalidToolInput` listing every violation when the text is
    /// not JSON or does not satisfy the schema.
    pub fn validate(&self, input: &str) -> StepwiseResult<RequestInput> {
        let tool = self.method.tool_name();
        let value: Value = serde_json::from_str(input).map_err(|e| StepwiseError::InvalidToolInput {
            tool: tool.to_string(),
            reason: format!("input is not valid JSON: {e}"),
        })?;

        let violations: Vec<String> = self
            .validator
            .iter_errors(&value)
            .map(|error| format!("at '{}': {}", error.instance_path, error))
            .collect();
        if !violations.is_empty() {
            let reason = violations.join("; ");
            warn!(tool, %reason, "requests tool input rejected");
            return Err(StepwiseError::InvalidToolInput { tool: tool.to_string(), reason });
        }

        serde_json::from_value(value).map_err(|e| StepwiseError::InvalidToolInput {
            tool: tool.to_string(),
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use stepwise_contracts::error::StepwiseError;

    use super::{InputValidator, RequestMethod};

    fn validator(method: RequestMethod) -> InputValidator {
        InputValidator::new(method).unwrap()
    }

    #[test]
    fn get_accepts_optional_params() {
        let input = validator(RequestMethod::Get)
            .validate(r#"{"url": "https://api.example.com/games", "params": {"q": "chess"}, "output_instructions": "names"}"#)
            .unwrap();
        assert_eq!(input.url, "https://api.example.com/games");
        assert_eq!(input.params["q"], json!("chess"));

        let bare = validator(RequestMethod::Get)
            .validate(r#"{"url": "https://api.example.com/games", "output_instructions": "names"}"#)
            .unwrap();
        assert!(bare.params.is_empty());
    }

    #[test]
    fn post_requires_data() {
        match validator(RequestMethod::Post).validate(r#"{"url": "https://x/orders", "output_instructions": "id"}"#) {
            Err(StepwiseError::InvalidToolInput { tool, reason }) => {
                assert_eq!(tool, "requests_post");
                assert!(reason.contains("data"), "unexpected reason: {reason}");
            }
            other => panic!("expected InvalidToolInput, got {:?}", other),
        }
    }

    #[test]
    fn put_requires_data_like_post() {
        let put = validator(RequestMethod::Put);
        assert!(put.validate(r#"{"url": "https://x/games/4", "output_instructions": "title"}"#).is_err());

        let input = put
            .validate(r#"{"url": "https://x/games/4", "data": {"title": "New"}, "output_instructions": "title"}"#)
            .unwrap();
        assert_eq!(input.data["title"], json!("New"));
    }

    #[test]
    fn all_violations_are_reported() {
        match validator(RequestMethod::Patch).validate(r#"{"url": 7, "data": []}"#) {
            Err(StepwiseError::InvalidToolInput { reason, .. }) => {
                assert!(reason.contains("output_instructions"), "unexpected reason: {reason}");
                assert!(reason.matches("at '").count() >= 3, "unexpected reason: {reason}");
            }
            other => panic!("expected InvalidToolInput, got {:?}", other),
        }
    }

    #[test]
    fn non_json_input_is_recoverable() {
        let err = validator(RequestMethod::Delete).validate("DELETE /orders/1").unwrap_err();
        assert!(err.is_recoverable());
        assert!(err.to_string().contains("not valid JSON"));
    }
}
