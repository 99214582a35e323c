//! The HTTP seam used by the requests tools.

use serde_json::{Map, Value};

use stepwise_contracts::error::StepwiseResult;

/// Returned in place of HTML bodies, which carry no API data.
pub const HTML_RESPONSE_PLACEHOLDER: &str =
    "Not found any relevant information, please check your params and URL / Endpoint.";

/// A completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
}

impl HttpResponse {
    /// A `200 OK` response with an `application/json` body.
    pub fn json(body: impl Into<String>) -> Self {
        Self { status: 200, content_type: Some("application/json".to_string()), body: body.into() }
    }

    pub fn is_html(&self) -> bool {
        self.content_type.as_deref().is_some_and(|ct| ct.contains("text/html"))
    }

    /// The text handed to the model: the body, or a placeholder for HTML.
    pub fn into_text(self) -> String {
        if self.is_html() {
            HTML_RESPONSE_PLACEHOLDER.to_string()
        } else {
            self.body
        }
    }
}

/// Blocking HTTP client.
///
/// Transport failures should be reported as `ToolFailed` so the controller
/// can observe them and retry or re-plan. Non-2xx responses are not errors;
/// their bodies are summarized for the model like any other.
pub trait HttpClient: Send + Sync {
    fn get(&self, url: &str, params: &Map<String, Value>) -> StepwiseResult<HttpResponse>;

    fn post(&self, url: &str, data: &Value) -> StepwiseResult<HttpResponse>;

    fn put(&self, url: &str, data: &Value) -> StepwiseResult<HttpResponse>;

    fn patch(&self, url: &str, data: &Value) -> StepwiseResult<HttpResponse>;

    fn delete(&self, url: &str) -> StepwiseResult<HttpResponse>;
}

#[cfg(test)]
mod tests {
    use super::{HttpResponse, HTML_RESPONSE_PLACEHOLDER};

    #[test]
    fn html_bodies_are_replaced() {
        let page = HttpResponse {
            status: 404,
            content_type: Some("text/html; charset=utf-8".to_string()),
            body: "<html>missing</html>".to_string(),
        };
        assert!(page.is_html());
        assert_eq!(page.into_text(), HTML_RESPONSE_PLACEHOLDER);
    }

    #[test]
    fn other_bodies_pass_through() {
        assert_eq!(HttpResponse::json("{\"id\":1}").into_text(), "{\"id\":1}");

        let untyped = HttpResponse { status: 500, content_type: None, body: "oops".to_string() };
        assert_eq!(untyped.into_text(), "oops");
    }
}
