//! Bounded-concurrency batch runner.

use futures::stream::{FuturesUnordered, StreamExt};
use std::future::Future;

use crate::core::error::Result;

pub const DEFAULT_BATCH_CONCURRENCY: usize = 5;

/// Run request factories with at most `concurrency` in flight.
///
/// A new request starts as soon as one finishes, so the pool stays full until
/// the queue drains. Results come back in completion order. The first failure
/// is logged and returned; requests still in flight are dropped.
/// A `concurrency` of 0 is treated as 1.
pub async fn batch_requests<T, F, Fut, I>(requests: I, concurrency: usize) -> Result<Vec<T>>
where
    I: IntoIterator<Item = F>,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let limit = concurrency.max(1);
    let mut queue = requests.into_iter();
    let mut executing = FuturesUnordered::new();
    let mut results = Vec::new();

    for request in queue.by_ref().take(limit) {
        executing.push(request());
    }

    while let Some(outcome) = executing.next().await {
        match outcome {
            Ok(value) => {
                results.push(value);
                if let Some(next) = queue.next() {
                    executing.push(next());
                }
            }
            Err(err) => {
                tracing::error!(error = %err, completed = results.len(), "Batch request error");
                return Err(err);
            }
        }
    }

    tracing::debug!(count = results.len(), concurrency = limit, "Batch completed");
    Ok(results)
}
