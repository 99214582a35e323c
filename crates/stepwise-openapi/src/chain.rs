//! Single-shot model calls outside the agent loop.

use stepwise_contracts::{error::StepwiseResult, execution::ModelRequest, transcript::RunId};
use stepwise_core::traits::{LanguageModel, RunObserver};

/// Send `prompt` to `model` once and return the trimmed reply.
///
/// The call gets its own `RunId` and fires the same model hooks the agent
/// loop does, so streamed tokens and usage reach `observer`.
pub fn predict(model: &dyn LanguageModel, observer: &dyn RunObserver, prompt: String) -> StepwiseResult<String> {
    let run_id = RunId::new();
    observer.on_model_start(run_id, &prompt);

    let request = ModelRequest { run_id, prompt, stop: Vec::new() };
    let completion = model.complete(&request, observer).inspect_err(|err| observer.on_model_error(run_id, err))?;

    observer.on_model_end(run_id, &completion);
    if let Some(usage) = &completion.usage {
        observer.on_usage(run_id, usage);
    }
    Ok(completion.text.trim().to_string())
}
