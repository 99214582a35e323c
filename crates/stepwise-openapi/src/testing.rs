//! Test doubles shared by this crate's unit tests.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use serde_json::{Map, Value};

use stepwise_contracts::{
    error::{StepwiseError, StepwiseResult},
    execution::{Completion, ModelRequest},
};
use stepwise_core::traits::{LanguageModel, RunObserver};

use crate::http::{HttpClient, HttpResponse};

/// Replays canned replies in order and records every prompt.
pub struct QueueModel {
    replies: Mutex<VecDeque<String>>,
    pub prompts: Arc<Mutex<Vec<String>>>,
}

impl QueueModel {
    pub fn new(replies: &[&str]) -> Self {
        Self {
            replies: Mutex::new(replies.iter().map(|s| s.to_string()).collect()),
            prompts: Arc::new(Mutex::new(vec![])),
        }
    }
}

impl LanguageModel for QueueModel {
    fn complete(&self, request: &ModelRequest, _observer: &dyn RunObserver) -> StepwiseResult<Completion> {
        self.prompts.lock().unwrap().push(request.prompt.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .map(Completion::text)
            .ok_or_else(|| StepwiseError::ModelFailed { reason: "no scripted reply left".to_string() })
    }
}

/// Answers every request with the same response and records
/// `"METHOD url payload"` per call.
pub struct RecordingHttp {
    response: HttpResponse,
    pub calls: Mutex<Vec<String>>,
}

impl RecordingHttp {
    pub fn with_response(response: HttpResponse) -> Self {
        Self { response, calls: Mutex::new(vec![]) }
    }

    fn record(&self, call: String) -> StepwiseResult<HttpResponse> {
        self.calls.lock().unwrap().push(call);
        Ok(self.response.clone())
    }
}

impl HttpClient for RecordingHttp {
    fn get(&self, url: &str, params: &Map<String, Value>) -> StepwiseResult<HttpResponse> {
        self.record(format!("GET {url} {}", Value::Object(params.clone())))
    }

    fn post(&self, url: &str, data: &Value) -> StepwiseResult<HttpResponse> {
        self.record(format!("POST {url} {data}"))
    }

    fn put(&self, url: &str, data: &Value) -> StepwiseResult<HttpResponse> {
        self.record(format!("PUT {url} {data}"))
    }

    fn patch(&self, url: &str, data: &Value) -> StepwiseResult<HttpResponse> {
        self.record(format!("PATCH {url} {data}"))
    }

    fn delete(&self, url: &str) -> StepwiseResult<HttpResponse> {
        self.record(format!("DELETE {url}"))
    }
}
