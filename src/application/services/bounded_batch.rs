use std::fmt::Display;
use std::future::Future;

use futures::StreamExt;
use futures::stream;
use serde::Serialize;

/// Results of a batch where each item succeeds or fails on its own.
///
/// Items arrive in completion order; callers that care about order sort by key.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchOutcome<K, T> {
    pub items: Vec<(K, T)>,
    pub errors: Vec<ItemError<K>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemError<K> {
    pub item: K,
    pub error: String,
}

impl<K, T> BatchOutcome<K, T> {
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Runs `task` over every input with at most `concurrency` calls in flight.
///
/// A failing item is logged and recorded in [`BatchOutcome::errors`]; it never
/// cancels the other items.
pub async fn run_bounded<K, I, T, E, F, Fut>(
    inputs: Vec<(K, I)>,
    concurrency: usize,
    task: F,
) -> BatchOutcome<K, T>
where
    K: Display,
    E: Display,
    F: Fn(I) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let task = &task;
    let finished: Vec<(K, Result<T, E>)> = stream::iter(inputs)
        .map(|(key, input)| async move {
            let result = task(input).await;
            (key, result)
        })
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;

    let mut outcome = BatchOutcome {
        items: Vec::with_capacity(finished.len()),
        errors: Vec::new(),
    };

    for (key, result) in finished {
        match result {
            Ok(value) => outcome.items.push((key, value)),
            Err(e) => {
                let error = format!("Error processing {key}: {e}");
                tracing::error!(item = %key, error = %e, "Batch item failed");
                outcome.errors.push(ItemError { item: key, error });
            }
        }
    }

    outcome
}
