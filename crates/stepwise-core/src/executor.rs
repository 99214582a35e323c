//! The stepwise executor: the bounded action-text loop.
//!
//! Each iteration walks the same pipeline:
//!
//!   Planning → AwaitingModel → (Dispatching) → Planning … → Finished | Aborted
//!
//! The loop owns the run's `Transcript` exclusively. A run ends in exactly
//! one of three ways: the model produces a final answer, the iteration cap
//! is reached, or a non-recoverable error aborts it.

use std::{collections::HashMap, sync::Arc};

use tracing::{debug, info, warn};

use stepwise_contracts::{
    action::ParseResult,
    error::{StepwiseError, StepwiseResult},
    execution::{Completion, ModelRequest, RunOutcome},
    transcript::{Observation, RunId, Transcript, Turn},
};

use crate::{
    config::LoopConfig,
    parser,
    prompt::{PartialPrompt, PromptTemplate},
    registry::ToolRegistry,
    traits::{LanguageModel, RunObserver},
};

/// Runtime input: the user's query (or the plan, for a nested loop).
pub const INPUT_KEY: &str = "input";
/// Runtime input: the rendered transcript.
pub const SCRATCHPAD_KEY: &str = "agent_scratchpad";
/// Static substitution: registered tool names, comma separated.
pub const TOOL_NAMES_KEY: &str = "tool_names";
/// Static substitution: one `name: description` line per tool.
pub const TOOL_DESCRIPTIONS_KEY: &str = "tool_descriptions";

/// States of the agent loop, used for transition logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Planning,
    AwaitingModel,
    Dispatching,
    Finished,
    Aborted,
}

/// One agent configuration: prompt, tools, model and loop settings.
///
/// An `Agent` holds no per-run state, so a single value can serve many
/// runs, including concurrent ones on different threads.
pub struct Agent {
    name: String,
    prompt: PartialPrompt,
    tools: ToolRegistry,
    model: Arc<dyn LanguageModel>,
    config: LoopConfig,
}

impl Agent {
    /// Build an agent.
    ///
    /// `tool_names` and `tool_descriptions` are derived from `tools` and added
    /// to `statics` unless the caller already supplied them.
    ///
    /// # Errors
    ///
    /// - `MissingPlaceholder` if the template uses a placeholder that is
    ///   neither a static nor one of `input` / `agent_scratchpad`.
    /// - `ConfigError` if `config` is invalid.
    pub fn new(
        name: impl Into<String>,
        template: PromptTemplate,
        mut statics: HashMap<String, String>,
        tools: ToolRegistry,
        model: Arc<dyn LanguageModel>,
        config: LoopConfig,
    ) -> StepwiseResult<Self> {
        config.validate()?;

        statics
            .entry(TOOL_NAMES_KEY.to_string())
            .or_insert_with(|| tools.tool_names());
        statics
            .entry(TOOL_DESCRIPTIONS_KEY.to_string())
            .or_insert_with(|| tools.tool_descriptions());

        let prompt = template.partial(statics);
        prompt.validate(&[INPUT_KEY, SCRATCHPAD_KEY])?;

        Ok(Self { name: name.into(), prompt, tools, model, config })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    pub fn config(&self) -> &LoopConfig {
        &self.config
    }

    /// Run the loop on `input` until it finishes, exhausts its cap, or aborts.
    ///
    /// # Pipeline (per iteration)
    ///
    /// 1. Planning: stop with `Exhausted` if the cap is reached; otherwise
    ///    compose the prompt from the template and the transcript
    /// 2. AwaitingModel: call the model, then parse its reply:
    ///    - `Finish` → record it, return `Finished`
    ///    - recoverable `ParseError` → record the reply and the hint as an
    ///      observation, next iteration
    ///    - non-recoverable `ParseError` → abort with `ParseFailed`
    ///    - `Action` → Dispatching
    /// 3. Dispatching: run the tool, record its observation (success or
    ///    failure alike), next iteration
    ///
    /// # Errors
    ///
    /// Returns `Err` for unknown tools, non-recoverable parse failures, model
    /// failures, prompt errors, and fatal errors raised by tools. Reaching the
    /// iteration cap is not an error; it yields `RunOutcome::Exhausted`.
    pub fn run(&self, input: &str, observer: &dyn RunObserver) -> StepwiseResult<RunOutcome> {
        let run_id = RunId::new();
        let mut transcript = Transcript::new();
        let mut iterations = 0usize;
        let mut state = LoopState::Planning;

        info!(
            run_id = %run_id,
            agent = %self.name,
            max_iterations = self.config.max_iterations,
            "agent run starting"
        );

        loop {
            // ── Planning ─────────────────────────────────────────────────────
            if iterations >= self.config.max_iterations {
                self.transition(run_id, &mut state, LoopState::Aborted);
                warn!(
                    run_id = %run_id,
                    agent = %self.name,
                    iterations,
                    "iteration cap reached, stopping run"
                );
                return Ok(RunOutcome::Exhausted {
                    run_id,
                    max_iterations: self.config.max_iterations,
                    transcript,
                });
            }

            let prompt = self
                .compose(input, &transcript)
                .map_err(|e| self.abort(run_id, &mut state, e))?;

            // ── AwaitingModel ────────────────────────────────────────────────
            self.transition(run_id, &mut state, LoopState::AwaitingModel);
            let completion = self
                .invoke_model(run_id, prompt, observer)
                .map_err(|e| self.abort(run_id, &mut state, e))?;

            match parser::parse(&completion.text) {
                ParseResult::Finish(finish) => {
                    observer.on_agent_finish(run_id, &finish);
                    let output = finish.output.clone();
                    transcript
                        .push_finish(finish)
                        .map_err(|e| self.abort(run_id, &mut state, e))?;
                    self.transition(run_id, &mut state, LoopState::Finished);
                    info!(run_id = %run_id, agent = %self.name, iterations, "agent run finished");
                    return Ok(RunOutcome::Finished { run_id, output, iterations, transcript });
                }

                ParseResult::Error(err) if err.recoverable => {
                    warn!(
                        run_id = %run_id,
                        iteration = iterations,
                        hint = %err.observation_hint,
                        "malformed model output, asking the model to correct it"
                    );
                    transcript
                        .push_thought(err.raw_text)
                        .and_then(|_| transcript.push_observation(Observation::hint(err.observation_hint)))
                        .map_err(|e| self.abort(run_id, &mut state, e))?;
                }

                ParseResult::Error(err) => {
                    return Err(self.abort(
                        run_id,
                        &mut state,
                        StepwiseError::ParseFailed { message: err.message, raw_text: err.raw_text },
                    ));
                }

                // ── Dispatching ──────────────────────────────────────────────
                ParseResult::Action(action) => {
                    self.transition(run_id, &mut state, LoopState::Dispatching);
                    observer.on_agent_action(run_id, &action);

                    let observation = self
                        .tools
                        .dispatch(run_id, &action, observer)
                        .map_err(|e| self.abort(run_id, &mut state, e))?;

                    transcript
                        .push_action(action)
                        .and_then(|_| transcript.push_observation(observation))
                        .map_err(|e| self.abort(run_id, &mut state, e))?;
                }
            }

            iterations += 1;
            self.transition(run_id, &mut state, LoopState::Planning);
        }
    }

    /// Render the prompt for the next turn.
    fn compose(&self, input: &str, transcript: &Transcript) -> StepwiseResult<String> {
        let mut runtime = HashMap::with_capacity(2);
        runtime.insert(INPUT_KEY.to_string(), input.to_string());
        runtime.insert(
            SCRATCHPAD_KEY.to_string(),
            render_scratchpad(transcript, &self.config.observation_prefix, &self.config.llm_prefix),
        );
        self.prompt.render(&runtime)
    }

    fn invoke_model(
        &self,
        run_id: RunId,
        prompt: String,
        observer: &dyn RunObserver,
    ) -> StepwiseResult<Completion> {
        observer.on_model_start(run_id, &prompt);
        let request = ModelRequest { run_id, prompt, stop: self.config.stop.clone() };

        match self.model.complete(&request, observer) {
            Ok(completion) => {
                observer.on_model_end(run_id, &completion);
                if let Some(usage) = &completion.usage {
                    observer.on_usage(run_id, usage);
                }
                Ok(completion)
            }
            Err(err) => {
                observer.on_model_error(run_id, &err);
                Err(err)
            }
        }
    }

    fn transition(&self, run_id: RunId, state: &mut LoopState, next: LoopState) {
        debug!(run_id = %run_id, from = ?state, to = ?next, "loop transition");
        *state = next;
    }

    fn abort(&self, run_id: RunId, state: &mut LoopState, err: StepwiseError) -> StepwiseError {
        self.transition(run_id, state, LoopState::Aborted);
        warn!(run_id = %run_id, agent = %self.name, error = %err, "agent run aborted");
        err
    }
}

/// Render a transcript as the model-facing scratchpad.
///
/// Thoughts and actions contribute the model's own raw text; each observation
/// is framed as `"\n{observation_prefix}{text}\n{llm_prefix}"`.
pub fn render_scratchpad(transcript: &Transcript, observation_prefix: &str, llm_prefix: &str) -> String {
    let mut scratchpad = String::new();
    for turn in transcript.turns() {
        match turn {
            Turn::Thought(text) => scratchpad.push_str(text),
            Turn::Action(action) => scratchpad.push_str(&action.raw_text),
            Turn::Observation(observation) => {
                scratchpad.push('\n');
                scratchpad.push_str(observation_prefix);
                scratchpad.push_str(&observation.text);
                scratchpad.push('\n');
                scratchpad.push_str(llm_prefix);
            }
            Turn::Finish(_) => {}
        }
    }
    scratchpad
}

// ── Tests ────────────────────────────────────────────────────────────────────
