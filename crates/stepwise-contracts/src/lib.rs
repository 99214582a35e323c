//! # stepwise-contracts
//!
//! Shared types and contracts for the stepwise action-text protocol.
//!
//! All crates in the workspace import from here. Apart from the transcript's
//! turn-alternation guard, no behaviour lives in this crate, only data
//! definitions and the error type.

pub mod action;
pub mod endpoint;
pub mod error;
pub mod execution;
pub mod trace;
pub mod transcript;
