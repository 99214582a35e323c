//! Streaming and billing callbacks for a live client.
//!
//! A web front end typically wants two things from a run: every model token
//! as soon as it arrives, and one billing entry per completion. Without a
//! token callback, tokens go to stdout.

use std::io::Write;

use chrono::{DateTime, Utc};

use stepwise_contracts::{execution::TokenUsage, transcript::RunId};
use stepwise_core::traits::RunObserver;

/// One billable completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BillingRecord {
    pub run_id: RunId,
    pub usage: TokenUsage,
    pub date: DateTime<Utc>,
}

type TokenFn = dyn Fn(RunId, &str) + Send + Sync;
type BillingFn = dyn Fn(BillingRecord) + Send + Sync;

/// Forwards tokens and usage to caller-supplied callbacks.
#[derive(Default)]
pub struct StreamingObserver {
    token: Option<Box<TokenFn>>,
    billing: Option<Box<BillingFn>>,
}

impl StreamingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token_callback<F>(mut self, callback: F) -> Self
    where
        F: Fn(RunId, &str) + Send + Sync + 'static,
    {
        self.token = Some(Box::new(callback));
        self
    }

    pub fn with_billing_callback<F>(mut self, callback: F) -> Self
    where
        F: Fn(BillingRecord) + Send + Sync + 'static,
    {
        self.billing = Some(Box::new(callback));
        self
    }
}

impl RunObserver for StreamingObserver {
    fn on_token(&self, run_id: RunId, token: &str) {
        match &self.token {
            Some(callback) => callback(run_id, token),
            None => {
                let mut stdout = std::io::stdout().lock();
                // Hooks cannot fail; write errors are dropped.
                let _ = stdout.write_all(token.as_bytes()).and_then(|_| stdout.flush());
            }
        }
    }

    fn on_usage(&self, run_id: RunId, usage: &TokenUsage) {
        if let Some(callback) = &self.billing {
            callback(BillingRecord { run_id, usage: *usage, date: Utc::now() });
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use stepwise_contracts::{execution::TokenUsage, transcript::RunId};
    use stepwise_core::traits::RunObserver;

    use super::{BillingRecord, StreamingObserver};

    #[test]
    fn tokens_reach_the_callback_in_order() {
        let received = Arc::new(Mutex::new(String::new()));
        let sink = Arc::clone(&received);
        let observer = StreamingObserver::new().with_token_callback(move |_, token| sink.lock().unwrap().push_str(token));

        let run = RunId::new();
        for token in ["Action", ": ", "search"] {
            observer.on_token(run, token);
        }

        assert_eq!(*received.lock().unwrap(), "Action: search");
    }

    #[test]
    fn usage_produces_one_billing_record() {
        let bills: Arc<Mutex<Vec<BillingRecord>>> = Arc::new(Mutex::new(vec![]));
        let sink = Arc::clone(&bills);
        let observer = StreamingObserver::new().with_billing_callback(move |bill| sink.lock().unwrap().push(bill));

        let run = RunId::new();
        observer.on_usage(run, &TokenUsage::new(12, 3));

        let bills = bills.lock().unwrap();
        assert_eq!(bills.len(), 1);
        assert_eq!(bills[0].run_id, run);
        assert_eq!(bills[0].usage.total_tokens, 15);
    }

    #[test]
    fn missing_billing_callback_is_ignored() {
        StreamingObserver::new().on_usage(RunId::new(), &TokenUsage::new(1, 1));
    }
}
