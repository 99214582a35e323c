//! In-memory recording observer.
//!
//! `RecordingObserver` appends one `TraceRecord` per hook to a `Vec` behind a
//! `Mutex`, so a single recorder can watch nested runs (an orchestrator and
//! the controllers it spawns) and concurrent runs on other threads. Records
//! carry a global sequence number and the `RunId` they belong to.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;

use stepwise_contracts::{
    action::{Action, Finish},
    error::{StepwiseError, StepwiseResult},
    execution::{Completion, TokenUsage},
    trace::{TraceEvent, TraceRecord},
    transcript::RunId,
};
use stepwise_core::traits::RunObserver;

// ── Internal mutable state ────────────────────────────────────────────────────

#[derive(Default)]
struct RecorderState {
    records: Vec<TraceRecord>,
    sequence: u64,
}

// ── Public recorder ───────────────────────────────────────────────────────────

/// Records every lifecycle notification it receives.
#[derive(Clone, Default)]
pub struct RecordingObserver {
    state: Arc<Mutex<RecorderState>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    // Hooks cannot fail, so a poisoned lock still yields its data.
    fn lock(&self) -> MutexGuard<'_, RecorderState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, run_id: RunId, event: TraceEvent) {
        let mut state = self.lock();
        let sequence = state.sequence;
        state.records.push(TraceRecord { sequence, run_id, event, timestamp: Utc::now() });
        state.sequence += 1;
    }

    /// A snapshot of all records so far, in arrival order.
    pub fn records(&self) -> Vec<TraceRecord> {
        self.lock().records.clone()
    }

    /// The records belonging to one run.
    pub fn records_for(&self, run_id: RunId) -> Vec<TraceRecord> {
        self.lock().records.iter().filter(|r| r.run_id == run_id).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().records.is_empty()
    }

    /// The distinct run ids seen, in order of first appearance.
    pub fn run_ids(&self) -> Vec<RunId> {
        let mut ids = Vec::new();
        for record in &self.lock().records {
            if !ids.contains(&record.run_id) {
                ids.push(record.run_id);
            }
        }
        ids
    }

    /// Concatenation of the tokens streamed during `run_id`.
    pub fn streamed_text(&self, run_id: RunId) -> String {
        self.lock()
            .records
            .iter()
            .filter(|r| r.run_id == run_id)
            .filter_map(|r| match &r.event {
                TraceEvent::Token { text } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Sum of all reported token usage across every run.
    pub fn total_usage(&self) -> TokenUsage {
        let mut total = TokenUsage::default();
        for record in &self.lock().records {
            if let TraceEvent::Usage { usage } = &record.event {
                total.accumulate(usage);
            }
        }
        total
    }

    /// All records as a pretty-printed JSON array.
    pub fn export_json(&self) -> StepwiseResult<String> {
        serde_json::to_string_pretty(&self.lock().records).map_err(|e| StepwiseError::ConfigError {
            reason: format!("failed to serialize trace records: {}", e),
        })
    }
}

// ── RunObserver impl ──────────────────────────────────────────────────────────

impl RunObserver for RecordingObserver {
    fn on_model_start(&self, run_id: RunId, prompt: &str) {
        self.record(run_id, TraceEvent::ModelStart { prompt: prompt.to_string() });
    }

    fn on_token(&self, run_id: RunId, token: &str) {
        self.record(run_id, TraceEvent::Token { text: token.to_string() });
    }

    fn on_model_end(&self, run_id: RunId, completion: &Completion) {
        self.record(run_id, TraceEvent::ModelEnd { text: completion.text.clone() });
    }

    fn on_model_error(&self, run_id: RunId, error: &StepwiseError) {
        self.record(run_id, TraceEvent::ModelError { reason: error.to_string() });
    }

    fn on_agent_action(&self, run_id: RunId, action: &Action) {
        self.record(run_id, TraceEvent::AgentAction { action: action.clone() });
    }

    fn on_tool_start(&self, run_id: RunId, tool: &str, input: &str) {
        self.record(run_id, TraceEvent::ToolStart { tool: tool.to_string(), input: input.to_string() });
    }

    fn on_tool_end(&self, run_id: RunId, tool: &str, output: &str) {
        self.record(run_id, TraceEvent::ToolEnd { tool: tool.to_string(), output: output.to_string() });
    }

    fn on_tool_error(&self, run_id: RunId, tool: &str, error: &StepwiseError) {
        self.record(run_id, TraceEvent::ToolError { tool: tool.to_string(), reason: error.to_string() });
    }

    fn on_agent_finish(&self, run_id: RunId, finish: &Finish) {
        self.record(run_id, TraceEvent::AgentFinish { finish: finish.clone() });
    }

    fn on_usage(&self, run_id: RunId, usage: &TokenUsage) {
        self.record(run_id, TraceEvent::Usage { usage: *usage });
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use stepwise_contracts::{
        action::Finish,
        error::StepwiseError,
        execution::{Completion, TokenUsage},
        trace::TraceEvent,
        transcript::RunId,
    };
    use stepwise_core::{stream::collect_fragments, traits::RunObserver};

    use super::RecordingObserver;

    #[test]
    fn records_are_sequenced_in_arrival_order() {
        let recorder = RecordingObserver::new();
        let run = RunId::new();

        recorder.on_model_start(run, "prompt");
        recorder.on_model_end(run, &Completion::text("Final Answer: 1"));
        recorder.on_agent_finish(run, &Finish { output: "1".to_string(), raw_text: "Final Answer: 1".to_string() });

        let records = recorder.records();
        assert_eq!(records.len(), 3);
        assert_eq!(records.iter().map(|r| r.sequence).collect::<Vec<_>>(), vec![0, 1, 2]);
        assert!(records.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
        assert!(matches!(records[2].event, TraceEvent::AgentFinish { .. }));
    }

    #[test]
    fn streamed_tokens_reassemble_per_run() {
        let recorder = RecordingObserver::new();
        let first = RunId::new();
        let second = RunId::new();

        let fragments = ["Final", " Answer", ": 42"].map(|s| Ok(s.to_string()));
        collect_fragments(first, fragments, &recorder).unwrap();
        recorder.on_token(second, "other");

        assert_eq!(recorder.streamed_text(first), "Final Answer: 42");
        assert_eq!(recorder.streamed_text(second), "other");
        assert_eq!(recorder.run_ids(), vec![first, second]);
        assert_eq!(recorder.records_for(second).len(), 1);
    }

    #[test]
    fn usage_is_summed_across_runs() {
        let recorder = RecordingObserver::new();
        recorder.on_usage(RunId::new(), &TokenUsage::new(100, 20));
        recorder.on_usage(RunId::new(), &TokenUsage::new(50, 5));

        assert_eq!(recorder.total_usage(), TokenUsage::new(150, 25));
    }

    #[test]
    fn errors_are_recorded_as_text() {
        let recorder = RecordingObserver::new();
        recorder.on_tool_error(
            RunId::new(),
            "requests_get",
            &StepwiseError::ToolFailed { tool: "requests_get".to_string(), reason: "timeout".to_string() },
        );

        match &recorder.records()[0].event {
            TraceEvent::ToolError { tool, reason } => {
                assert_eq!(tool, "requests_get");
                assert!(reason.contains("timeout"));
            }
            other => panic!("expected ToolError, got {:?}", other),
        }
    }

    #[test]
    fn export_is_tagged_json() {
        let recorder = RecordingObserver::new();
        recorder.on_tool_start(RunId::new(), "search", "rust");

        let json = recorder.export_json().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed[0]["event"]["kind"], "tool_start");
        assert_eq!(parsed[0]["event"]["input"], "rust");
        assert_eq!(parsed[0]["sequence"], 0);
    }

    #[test]
    fn clones_share_one_log_across_threads() {
        let recorder = RecordingObserver::new();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let recorder = recorder.clone();
                std::thread::spawn(move || recorder.on_token(RunId::new(), "t"))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let shared: Arc<dyn RunObserver> = Arc::new(recorder.clone());
        shared.on_token(RunId::new(), "t");

        let mut sequences: Vec<_> = recorder.records().iter().map(|r| r.sequence).collect();
        sequences.sort();
        assert_eq!(sequences, vec![0, 1, 2, 3, 4]);
    }
}
