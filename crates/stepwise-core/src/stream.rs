//! Streaming support for `LanguageModel` implementations.

use stepwise_contracts::{error::StepwiseResult, transcript::RunId};

use crate::traits::RunObserver;

/// Forward each fragment to `observer.on_token()` in order and return their
/// concatenation.
///
/// Stops at the first error; fragments already delivered stay delivered.
pub fn collect_fragments<I>(
    run_id: RunId,
    fragments: I,
    observer: &dyn RunObserver,
) -> StepwiseResult<String>
where
    I: IntoIterator<Item = StepwiseResult<String>>,
{
    let mut text = String::new();
    for fragment in fragments {
        let fragment = fragment?;
        observer.on_token(run_id, &fragment);
        text.push_str(&fragment);
    }
    Ok(text)
}
