//! A scripted, streaming language model.
//!
//! Replies are queued in advance and served in order, one per completion
//! request, no matter which agent asks. Each reply is streamed word by word
//! through the observer and reports approximate token usage.

use std::{
    collections::VecDeque,
    sync::{LazyLock, Mutex, PoisonError},
};

use regex::Regex;
use tracing::debug;

use stepwise_contracts::{
    error::{StepwiseError, StepwiseResult},
    execution::{Completion, ModelRequest, TokenUsage},
};
use stepwise_core::{stream::collect_fragments, traits::{LanguageModel, RunObserver}};

static TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w+|[^\w\s]").expect("token regex is valid"));

/// Rough token count: words and punctuation marks.
pub fn approximate_tokens(text: &str) -> u64 {
    TOKEN.find_iter(text).count() as u64
}

/// Serves queued replies in order.
#[derive(Default)]
pub struct ScriptedModel {
    replies: Mutex<VecDeque<String>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { replies: Mutex::new(replies.into_iter().map(Into::into).collect()), prompts: Mutex::default() }
    }

    /// Number of replies not yet served.
    pub fn remaining(&self) -> usize {
        self.replies.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Every prompt received so far.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl LanguageModel for ScriptedModel {
    fn complete(&self, request: &ModelRequest, observer: &dyn RunObserver) -> StepwiseResult<Completion> {
        self.prompts.lock().unwrap_or_else(PoisonError::into_inner).push(request.prompt.clone());
        let reply = self
            .replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .ok_or_else(|| StepwiseError::ModelFailed { reason: "script exhausted".to_string() })?;

        debug!(run_id = %request.run_id, remaining = self.remaining(), "serving scripted reply");

        let fragments = reply.split_inclusive(' ').map(|word| Ok(word.to_string()));
        let text = collect_fragments(request.run_id, fragments, observer)?;
        let usage = TokenUsage::new(approximate_tokens(&request.prompt), approximate_tokens(&text));

        Ok(Completion { text, usage: Some(usage) })
    }
}

#[cfg(test)]
mod tests {
    use stepwise_contracts::{error::StepwiseError, execution::ModelRequest, transcript::RunId};
    use stepwise_core::traits::{LanguageModel, NoopObserver};
    use stepwise_trace::RecordingObserver;

    use super::{approximate_tokens, ScriptedModel};

    fn request(prompt: &str) -> ModelRequest {
        ModelRequest { run_id: RunId::new(), prompt: prompt.to_string(), stop: vec![] }
    }

    #[test]
    fn replies_stream_in_order() {
        let model = ScriptedModel::new(["Final Answer: two words", "second"]);
        let recorder = RecordingObserver::new();
        let req = request("question?");

        let completion = model.complete(&req, &recorder).unwrap();

        assert_eq!(completion.text, "Final Answer: two words");
        assert_eq!(recorder.streamed_text(req.run_id), completion.text);
        assert_eq!(recorder.len(), 4);
        let usage = completion.usage.unwrap();
        assert_eq!(usage.prompt_tokens, 2);
        assert_eq!(usage.completion_tokens, 5);
        assert_eq!(model.remaining(), 1);
        assert_eq!(model.prompts(), vec!["question?".to_string()]);
    }

    #[test]
    fn exhausted_script_is_a_model_failure() {
        let model = ScriptedModel::new(Vec::<String>::new());
        let result = model.complete(&request("q"), &NoopObserver);
        assert!(matches!(result, Err(StepwiseError::ModelFailed { .. })));
    }

    #[test]
    fn token_count_splits_words_and_punctuation() {
        assert_eq!(approximate_tokens("Action: search"), 3);
        assert_eq!(approximate_tokens(""), 0);
    }
}
