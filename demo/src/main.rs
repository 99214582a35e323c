//! Stepwise Game-Catalog Reference Runtime: Demo CLI
//!
//! Runs one or all of the four catalog scenarios, or classifies a piece of
//! model output with the action parser.
//!
//! Usage:
//!   cargo run -p demo -- run-all
//!   cargo run -p demo -- catalog-search
//!   cargo run -p demo -- self-correction
//!   cargo run -p demo -- unknown-endpoint
//!   cargo run -p demo -- iteration-cap
//!   cargo run -p demo -- parse --escapes 'Action: search\nAction Input: "rust"'

use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use stepwise_contracts::{action::ParseResult, error::StepwiseResult};
use stepwise_core::parser;
use stepwise_ref_catalog::scenarios::{catalog_search, iteration_cap, self_correction, unknown_endpoint};

// ── CLI definition ────────────────────────────────────────────────────────────

/// Stepwise: bounded reason-act agents over HTTP APIs.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "Stepwise game-catalog reference runtime demo",
    long_about = "Runs stepwise demo scenarios showing two-level planning, self-correction\n\
                  from malformed output, endpoint validation, and the iteration cap."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run all four catalog scenarios in sequence.
    RunAll,
    /// Scenario 1: Catalog Search (orchestrator, planner, controller).
    CatalogSearch,
    /// Scenario 2: Self-Correction (format hint and invalid request input).
    SelfCorrection,
    /// Scenario 3: Unknown Endpoint (fatal by default, recoverable by config).
    UnknownEndpoint,
    /// Scenario 4: Iteration Cap (a model that never finishes).
    IterationCap,
    /// Classify TEXT as an action, a final answer, or a parse error.
    Parse {
        /// Raw model output.
        text: String,
        /// Interpret `\n` and `\t` in TEXT as newline and tab.
        #[arg(long)]
        escapes: bool,
    },
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Set RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let scenario: fn() -> StepwiseResult<()> = match cli.command {
        Command::Parse { text, escapes } => {
            let text = if escapes { unescape(&text) } else { text };
            print_parse(&text);
            return;
        }
        Command::RunAll => run_all,
        Command::CatalogSearch => catalog_search::run_scenario,
        Command::SelfCorrection => self_correction::run_scenario,
        Command::UnknownEndpoint => unknown_endpoint::run_scenario,
        Command::IterationCap => iteration_cap::run_scenario,
    };

    print_banner();
    let result = scenario();

    match result {
        Ok(()) => {
            println!("All selected scenarios completed successfully.");
        }
        Err(e) => {
            eprintln!("Demo error: {}", e);
            std::process::exit(1);
        }
    }
}

// ── Scenario dispatch ─────────────────────────────────────────────────────────

fn run_all() -> StepwiseResult<()> {
    catalog_search::run_scenario()?;
    self_correction::run_scenario()?;
    unknown_endpoint::run_scenario()?;
    iteration_cap::run_scenario()?;
    Ok(())
}

// ── Parser ────────────────────────────────────────────────────────────────────

fn unescape(text: &str) -> String {
    text.replace("\\n", "\n").replace("\\t", "\t")
}

fn print_parse(text: &str) {
    debug!(chars = text.chars().count(), "parsing model output");
    match parser::parse(text) {
        ParseResult::Action(action) => {
            println!("Action");
            println!("  tool:   {}", action.tool_name);
            println!("  input:  {}", action.tool_input);
        }
        ParseResult::Finish(finish) => {
            println!("Finish");
            println!("  output: {}", finish.output);
        }
        ParseResult::Error(err) if err.recoverable => {
            println!("Parse error (recoverable)");
            println!("  observation: {}", err.observation_hint);
        }
        ParseResult::Error(err) => {
            println!("Parse error (run aborts)");
            println!("  message: {}", err.message);
        }
    }
}

// ── Banner ────────────────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("Stepwise: Bounded Reason-Act Agents");
    println!("Game-Catalog Reference Demo");
    println!("===================================");
    println!();
    println!("Agent loop per iteration:");
    println!("  [1] Compose the prompt from the template and the transcript");
    println!("  [2] Call the model (tokens stream to the observers)");
    println!("  [3] Parse the reply: Action / Final Answer / parse error");
    println!("  [4] Dispatch the action to its tool; record the observation");
    println!("  [5] Stop on a final answer, a fatal error, or the iteration cap");
    println!();
}
