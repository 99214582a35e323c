//! Requests tools: one HTTP call followed by a single extraction prompt.
//!
//! The raw response is truncated before it reaches the model, so only one
//! inference step is needed per request. Truncation is blunt and can drop
//! information from long responses.

use std::{collections::HashMap, sync::Arc};

use tracing::debug;

use stepwise_contracts::error::StepwiseResult;
use stepwise_core::{
    prompt::{PartialPrompt, PromptTemplate},
    registry::ToolRegistry,
    traits::{LanguageModel, NoopObserver, RunObserver, Tool},
};

use crate::{
    chain::predict,
    http::HttpClient,
    prompts::{
        PARSING_GET_PROMPT, PARSING_WRITE_PROMPT, REQUESTS_DELETE_TOOL_DESCRIPTION,
        REQUESTS_GET_TOOL_DESCRIPTION, REQUESTS_PATCH_TOOL_DESCRIPTION, REQUESTS_POST_TOOL_DESCRIPTION,
        REQUESTS_PUT_TOOL_DESCRIPTION,
    },
    validate::{InputValidator, RequestInput, RequestMethod},
};

/// A requests tool for one HTTP method.
pub struct RequestsTool {
    validator: InputValidator,
    description: &'static str,
    parsing: PartialPrompt,
    http: Arc<dyn HttpClient>,
    model: Arc<dyn LanguageModel>,
    response_length: usize,
}

impl RequestsTool {
    pub fn new(
        method: RequestMethod,
        http: Arc<dyn HttpClient>,
        model: Arc<dyn LanguageModel>,
        response_length: usize,
    ) -> StepwiseResult<Self> {
        let (description, parsing) = match method {
            RequestMethod::Get => (REQUESTS_GET_TOOL_DESCRIPTION, PARSING_GET_PROMPT),
            RequestMethod::Post => (REQUESTS_POST_TOOL_DESCRIPTION, PARSING_WRITE_PROMPT),
            RequestMethod::Put => (REQUESTS_PUT_TOOL_DESCRIPTION, PARSING_WRITE_PROMPT),
            RequestMethod::Patch => (REQUESTS_PATCH_TOOL_DESCRIPTION, PARSING_WRITE_PROMPT),
            RequestMethod::Delete => (REQUESTS_DELETE_TOOL_DESCRIPTION, PARSING_WRITE_PROMPT),
        };
        let parsing = PromptTemplate::new(method.tool_name(), parsing)?.partial(HashMap::new());
        parsing.validate(&["response", "instructions"])?;

        Ok(Self {
            validator: InputValidator::new(method)?,
            description,
            parsing,
            http,
            model,
            response_length,
        })
    }

    fn send(&self, input: &RequestInput) -> StepwiseResult<String> {
        let response = match self.validator.method() {
            RequestMethod::Get => self.http.get(&input.url, &input.params)?,
            RequestMethod::Post => self.http.post(&input.url, &input.data)?,
            RequestMethod::Put => self.http.put(&input.url, &input.data)?,
            RequestMethod::Patch => self.http.patch(&input.url, &input.data)?,
            RequestMethod::Delete => self.http.delete(&input.url)?,
        };
        debug!(
            tool = self.validator.method().tool_name(),
            url = %input.url,
            status = response.status,
            "http response received"
        );
        Ok(response.into_text())
    }
}

impl Tool for RequestsTool {
    fn name(&self) -> &str {
        self.validator.method().tool_name()
    }

    fn description(&self) -> &str {
        self.description
    }

    fn invoke(&self, input: &str) -> StepwiseResult<String> {
        self.invoke_in_run(input, &NoopObserver)
    }

    fn invoke_in_run(&self, input: &str, observer: &dyn RunObserver) -> StepwiseResult<String> {
        let request = self.validator.validate(input)?;
        let body = self.send(&request)?;

        let mut runtime = HashMap::with_capacity(2);
        runtime.insert("response".to_string(), truncate_chars(&body, self.response_length).to_string());
        runtime.insert("instructions".to_string(), request.output_instructions);
        let prompt = self.parsing.render(&runtime)?;

        predict(self.model.as_ref(), observer, prompt)
    }
}

/// The longest prefix of `text` with at most `max` characters.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

/// A registry holding one requests tool per method, in `RequestMethod::ALL`
/// order.
pub fn requests_toolkit(
    http: Arc<dyn HttpClient>,
    model: Arc<dyn LanguageModel>,
    response_length: usize,
) -> StepwiseResult<ToolRegistry> {
    let mut tools = ToolRegistry::new();
    for method in RequestMethod::ALL {
        tools.register(RequestsTool::new(method, Arc::clone(&http), Arc::clone(&model), response_length)?)?;
    }
    Ok(tools)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use stepwise_contracts::error::StepwiseError;
    use stepwise_core::traits::Tool;

    use crate::{
        http::{HttpResponse, HTML_RESPONSE_PLACEHOLDER},
        testing::{QueueModel, RecordingHttp},
        validate::RequestMethod,
    };

    use super::{requests_toolkit, truncate_chars, RequestsTool};

    fn tool(method: RequestMethod, http: Arc<RecordingHttp>, model: Arc<QueueModel>, limit: usize) -> RequestsTool {
        RequestsTool::new(method, http, model, limit).unwrap()
    }

    #[test]
    fn get_fetches_then_extracts() {
        let http = Arc::new(RecordingHttp::with_response(HttpResponse::json(r#"[{"id":1,"name":"Chess"}]"#)));
        let model = Arc::new(QueueModel::new(&["  Chess (id 1)\n"]));
        let get = tool(RequestMethod::Get, http.clone(), model.clone(), 5000);

        let output = get
            .invoke(r#"{"url": "https://api.example.com/games", "params": {"q": "chess"}, "output_instructions": "game names"}"#)
            .unwrap();

        assert_eq!(output, "Chess (id 1)");
        assert_eq!(*http.calls.lock().unwrap(), vec!["GET https://api.example.com/games {\"q\":\"chess\"}"]);
        let prompt = &model.prompts.lock().unwrap()[0];
        assert!(prompt.contains(r#"[{"id":1,"name":"Chess"}]"#));
        assert!(prompt.contains("according to these instructions: game names"));
    }

    #[test]
    fn response_is_truncated_before_the_model_sees_it() {
        let http = Arc::new(RecordingHttp::with_response(HttpResponse::json("abcdefghij")));
        let model = Arc::new(QueueModel::new(&["ok"]));
        let get = tool(RequestMethod::Get, http, model.clone(), 4);

        get.invoke(r#"{"url": "https://x/y", "output_instructions": "all"}"#).unwrap();

        let prompt = &model.prompts.lock().unwrap()[0];
        assert!(prompt.contains("\n\nabcd\n\n===="), "unexpected prompt: {prompt}");
        assert!(!prompt.contains("abcde"));
    }

    #[test]
    fn html_responses_become_the_placeholder() {
        let http = Arc::new(RecordingHttp::with_response(HttpResponse {
            status: 200,
            content_type: Some("text/html".to_string()),
            body: "<html></html>".to_string(),
        }));
        let model = Arc::new(QueueModel::new(&["nothing found"]));
        let get = tool(RequestMethod::Get, http, model.clone(), 5000);

        get.invoke(r#"{"url": "https://x/y", "output_instructions": "all"}"#).unwrap();

        assert!(model.prompts.lock().unwrap()[0].contains(HTML_RESPONSE_PLACEHOLDER));
    }

    #[test]
    fn post_sends_data() {
        let http = Arc::new(RecordingHttp::with_response(HttpResponse::json(r#"{"id":9}"#)));
        let model = Arc::new(QueueModel::new(&["9"]));
        let post = tool(RequestMethod::Post, http.clone(), model, 5000);

        let output = post
            .invoke(r#"{"url": "https://x/orders", "data": {"game": 1}, "output_instructions": "order id"}"#)
            .unwrap();

        assert_eq!(output, "9");
        assert_eq!(*http.calls.lock().unwrap(), vec![format!("POST https://x/orders {}", json!({"game": 1}))]);
    }

    #[test]
    fn put_replaces_with_data() {
        let http = Arc::new(RecordingHttp::with_response(HttpResponse::json(r#"{"id":4,"title":"Renamed"}"#)));
        let model = Arc::new(QueueModel::new(&["Renamed"]));
        let put = tool(RequestMethod::Put, http.clone(), model, 5000);

        let output = put
            .invoke(r#"{"url": "https://x/games/4", "data": {"title": "Renamed"}, "output_instructions": "new title"}"#)
            .unwrap();

        assert_eq!(output, "Renamed");
        assert_eq!(*http.calls.lock().unwrap(), vec![format!("PUT https://x/games/4 {}", json!({"title": "Renamed"}))]);
    }

    #[test]
    fn invalid_input_never_reaches_the_network() {
        let http = Arc::new(RecordingHttp::with_response(HttpResponse::json("{}")));
        let model = Arc::new(QueueModel::new(&[]));
        let post = tool(RequestMethod::Post, http.clone(), model, 5000);

        let result = post.invoke(r#"{"url": "https://x/orders"}"#);

        assert!(matches!(result, Err(StepwiseError::InvalidToolInput { .. })));
        assert!(http.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn toolkit_registers_all_methods_in_order() {
        let tools = requests_toolkit(
            Arc::new(RecordingHttp::with_response(HttpResponse::json("{}"))),
            Arc::new(QueueModel::new(&[])),
            5000,
        )
        .unwrap();
        assert_eq!(
            tools.tool_names(),
            "requests_get, requests_post, requests_put, requests_patch, requests_delete"
        );
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("short", 50), "short");
        assert_eq!(truncate_chars("", 3), "");
    }
}
