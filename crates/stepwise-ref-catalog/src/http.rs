//! Mock HTTP client serving the catalog from `mock_data`.

use std::sync::{Mutex, PoisonError};

use serde_json::{Map, Value};
use tracing::debug;

use stepwise_contracts::error::{StepwiseError, StepwiseResult};
use stepwise_openapi::http::{HttpClient, HttpResponse};

use crate::mock_data::{serve_get, serve_post};

/// Routes requests to the mock catalog and logs `"METHOD url"` per call.
#[derive(Default)]
pub struct MockHttpClient {
    log: Mutex<Vec<String>>,
}

impl MockHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests served so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.log.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn record(&self, method: &str, url: &str) {
        debug!(method, url, "mock http request");
        self.log.lock().unwrap_or_else(PoisonError::into_inner).push(format!("{method} {url}"));
    }
}

impl HttpClient for MockHttpClient {
    fn get(&self, url: &str, params: &Map<String, Value>) -> StepwiseResult<HttpResponse> {
        self.record("GET", url);
        Ok(serve_get(url, params))
    }

    fn post(&self, url: &str, data: &Value) -> StepwiseResult<HttpResponse> {
        self.record("POST", url);
        Ok(serve_post(url, data))
    }

    fn put(&self, url: &str, _data: &Value) -> StepwiseResult<HttpResponse> {
        self.record("PUT", url);
        Err(StepwiseError::ToolFailed {
            tool: "requests_put".to_string(),
            reason: "the catalog is read-only".to_string(),
        })
    }

    fn patch(&self, url: &str, _data: &Value) -> StepwiseResult<HttpResponse> {
        self.record("PATCH", url);
        Err(StepwiseError::ToolFailed {
            tool: "requests_patch".to_string(),
            reason: "the catalog is read-only".to_string(),
        })
    }

    fn delete(&self, url: &str) -> StepwiseResult<HttpResponse> {
        self.record("DELETE", url);
        Err(StepwiseError::ToolFailed {
            tool: "requests_delete".to_string(),
            reason: "the catalog is read-only".to_string(),
        })
    }
}
