//! Tool registry and dispatcher.
//!
//! A `ToolRegistry` is an explicit, per-agent collection. Registration order
//! is preserved because it drives the `tool_names` and `tool_descriptions`
//! prompt substitutions.

use std::{collections::HashMap, fmt, sync::Arc};

use tracing::{debug, warn};

use stepwise_contracts::{
    action::Action,
    error::{StepwiseError, StepwiseResult},
    transcript::{Observation, RunId},
};

use crate::traits::{RunObserver, Tool};

/// The set of tools one agent may invoke.
#[derive(Default, Clone)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
    index: HashMap<String, usize>,
}

impl fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolRegistry").field("tools", &self.names()).finish()
    }
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool. Fails with `DuplicateTool` if the name is taken.
    pub fn register(&mut self, tool: impl Tool + 'static) -> StepwiseResult<()> {
        self.register_shared(Arc::new(tool))
    }

    /// Register a tool that is shared with other owners.
    pub fn register_shared(&mut self, tool: Arc<dyn Tool>) -> StepwiseResult<()> {
        let name = tool.name().to_string();
        if self.index.contains_key(&name) {
            return Err(StepwiseError::DuplicateTool { name });
        }
        self.index.insert(name, self.tools.len());
        self.tools.push(tool);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.index.get(name).map(|&i| &self.tools[i])
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Tool names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    /// The `tool_names` substitution: names joined with `", "`.
    pub fn tool_names(&self) -> String {
        self.names().join(", ")
    }

    /// The `tool_descriptions` substitution: one `name: description` per line.
    pub fn tool_descriptions(&self) -> String {
        self.tools
            .iter()
            .map(|t| format!("{}: {}", t.name(), t.description()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Invoke the tool named by `action` and capture its observation.
    ///
    /// The tool runs through `Tool::invoke_in_run`, so nested model calls
    /// report to `observer`.
    ///
    /// # Errors
    ///
    /// - `UnknownTool` if the action names an unregistered tool.
    /// - A tool error for which `is_fatal()` holds.
    ///
    /// Every other tool error is returned as an `Observation` with
    /// `is_error = true`, so the model can re-plan.
    pub fn dispatch(
        &self,
        run_id: RunId,
        action: &Action,
        observer: &dyn RunObserver,
    ) -> StepwiseResult<Observation> {
        let tool = self.get(&action.tool_name).ok_or_else(|| StepwiseError::UnknownTool {
            name: action.tool_name.clone(),
            available: self.tool_names(),
        })?;

        debug!(run_id = %run_id, tool = %action.tool_name, "dispatching tool");
        observer.on_tool_start(run_id, &action.tool_name, &action.tool_input);

        match tool.invoke_in_run(&action.tool_input, observer) {
            Ok(output) => {
                observer.on_tool_end(run_id, &action.tool_name, &output);
                Ok(Observation::success(&action.tool_name, output))
            }
            Err(err) => {
                observer.on_tool_error(run_id, &action.tool_name, &err);
                if err.is_fatal() {
                    return Err(err);
                }
                warn!(
                    run_id = %run_id,
                    tool = %action.tool_name,
                    error = %err,
                    "tool failed, feeding error back as observation"
                );
                Ok(Observation::failure(
                    &action.tool_name,
                    format!("{} raised an error: {}", action.tool_name, err),
                ))
            }
        }
    }
}
