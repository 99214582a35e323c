//! # stepwise-core
//!
//! The bounded reason-act loop for stepwise agents.
//!
//! This crate provides:
//! - The three seams (`LanguageModel`, `Tool`, `RunObserver`)
//! - The action-text `parser` that classifies each model reply
//! - `PromptTemplate` composition with static and runtime substitutions
//! - The per-agent `ToolRegistry` and its dispatcher
//! - The `Agent` that runs the loop, and `AgentTool` for nesting agents
//!
//! ## Usage
//!
//! ```rust,ignore
//! use stepwise_core::{Agent, PromptTemplate, ToolRegistry, tool::FnTool};
//!
//! let mut tools = ToolRegistry::new();
//! tools.register(FnTool::new("search", "Look things up", |q| Ok(lookup(q))))?;
//! let agent = Agent::new("demo", template, HashMap::new(), tools, model, LoopConfig::default())?;
//! let outcome = agent.run("what is rust?", &NoopObserver)?;
//! ```

pub mod config;
pub mod executor;
pub mod parser;
pub mod prompt;
pub mod registry;
pub mod stream;
pub mod tool;
pub mod traits;

pub use config::{AgentConfig, LoopConfig, OpenApiConfig};
pub use executor::{Agent, LoopState};
pub use parser::parse;
pub use prompt::{PartialPrompt, PromptTemplate};
pub use registry::ToolRegistry;
pub use traits::{LanguageModel, NoopObserver, RunObserver, Tool};
