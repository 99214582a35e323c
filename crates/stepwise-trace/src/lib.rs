//! # stepwise-trace
//!
//! `RunObserver` implementations for the stepwise agent loop.
//!
//! ## Overview
//!
//! Observers are notified at fixed points of every run (model start, each
//! streamed token, tool start/end, finish, token usage, ...). None of them
//! can influence a run; they only log, store or forward what they see.
//!
//! - `TracingObserver`: one `tracing` event per hook
//! - `RecordingObserver`: sequenced, timestamped `TraceRecord`s in memory
//! - `StreamingObserver`: token and billing callbacks for a live client
//! - `FanoutObserver`: forwards every hook to several observers
//!
//! ## Usage
//!
//! ```rust,ignore
//! use stepwise_trace::{FanoutObserver, RecordingObserver, TracingObserver};
//!
//! let recorder = Arc::new(RecordingObserver::new());
//! let observer = FanoutObserver::new(vec![Arc::new(TracingObserver), recorder.clone()]);
//! agent.run("find me a puzzle game", &observer)?;
//! println!("{}", recorder.export_json()?);
//! ```

pub mod fanout;
pub mod log;
pub mod recorder;
pub mod streaming;

pub use fanout::FanoutObserver;
pub use log::TracingObserver;
pub use recorder::RecordingObserver;
pub use streaming::{BillingRecord, StreamingObserver};
