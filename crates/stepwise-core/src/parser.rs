//! The action parser: raw model text → `ParseResult`.
//!
//! Precedence, first match wins:
//!
//! 1. An `Action:` / `Action Input:` pair → `ParseResult::Action`
//! 2. A final-answer marker → `ParseResult::Finish`
//! 3. Otherwise a classified `ParseError`
//!
//! Checking the action pair first lets a reasoning trace mention
//! "Final Answer" in passing without ending the run.

use std::sync::LazyLock;

use regex::Regex;

use stepwise_contracts::action::{Action, Finish, ParseError, ParseResult};

/// Final-answer markers, checked in this order.
pub const FINAL_ANSWER_MARKERS: [&str; 2] = ["Final Answer:", "Answer For AI:"];

/// Observation fed back when the reply has an input label but no action label.
pub const MISSING_ACTION_HINT: &str = "Invalid Format: Missing 'Action:' after 'Thought:'";

/// Observation fed back when the reply names an action but gives no input.
pub const MISSING_ACTION_INPUT_HINT: &str =
    "Invalid Format: Missing 'Action Input:' after 'Action:'";

/// Inputs starting with this keyword keep their quotes.
const SQL_SELECT_PREFIX: &str = "SELECT ";

static ACTION_PAIR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)Action\s*\d*\s*:\s*(.*?)\s*Action\s*\d*\s*Input\s*\d*\s*:\s*(.*)")
        .expect("action pair pattern is valid")
});

static ACTION_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Action\s*\d*\s*:").expect("action label pattern is valid"));

static ACTION_INPUT_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Action\s*\d*\s*Input\s*\d*\s*:").expect("action input label pattern is valid")
});

/// Parse one model reply.
pub fn parse(text: &str) -> ParseResult {
    if let Some(caps) = ACTION_PAIR.captures(text) {
        let tool_name = caps.get(1).map_or("", |m| m.as_str()).trim();
        let tool_input = caps.get(2).map_or("", |m| m.as_str());
        return ParseResult::Action(Action {
            tool_name: tool_name.to_string(),
            tool_input: clean_tool_input(tool_input),
            raw_text: text.to_string(),
        });
    }

    for marker in FINAL_ANSWER_MARKERS {
        if let Some(idx) = text.find(marker) {
            return ParseResult::Finish(Finish {
                output: text[idx + marker.len()..].trim().to_string(),
                raw_text: text.to_string(),
            });
        }
    }

    ParseResult::Error(classify_failure(text))
}

/// Trim the input and strip one pair of surrounding double quotes, unless the
/// input is a `SELECT ` query whose quotes are part of the statement.
fn clean_tool_input(raw: &str) -> String {
    let input = raw.trim();
    if input.starts_with(SQL_SELECT_PREFIX) {
        return input.to_string();
    }
    input
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(input)
        .to_string()
}

fn classify_failure(text: &str) -> ParseError {
    let message = format!("Could not parse LLM output: `{text}`");

    match ACTION_LABEL.find(text) {
        None if ACTION_INPUT_LABEL.is_match(text) => recoverable(message, MISSING_ACTION_HINT, text),
        None => unrecoverable(message, text),
        Some(label) if !ACTION_INPUT_LABEL.is_match(&text[label.end()..]) => {
            recoverable(message, MISSING_ACTION_INPUT_HINT, text)
        }
        Some(_) => unrecoverable(message, text),
    }
}

fn recoverable(message: String, hint: &str, text: &str) -> ParseError {
    ParseError {
        message,
        observation_hint: hint.to_string(),
        raw_text: text.to_string(),
        recoverable: true,
    }
}

fn unrecoverable(message: String, text: &str) -> ParseError {
    ParseError {
        message,
        observation_hint: String::new(),
        raw_text: text.to_string(),
        recoverable: false,
    }
}
