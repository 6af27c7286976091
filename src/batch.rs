//! Batch execution helpers.
//!
//! `all` joins request futures concurrently; `series` runs request-producing
//! thunks one at a time. Neither imposes a concurrency limit.

use std::future::Future;

use futures::future::try_join_all;

use crate::error::Result;

/// Await a sequence of request operations concurrently.
///
/// Resolves to the results in input order regardless of completion order,
/// and fails fast with the first error.
pub async fn all<T, F>(ops: impl IntoIterator<Item = F>) -> Result<Vec<T>>
where
    F: Future<Output = Result<T>>,
{
    try_join_all(ops).await
}

/// Run request-producing thunks one at a time, in order.
///
/// Each thunk is awaited before the next starts; the first failure aborts
/// without invoking the remaining thunks.
pub async fn series<T, F, Fut>(thunks: impl IntoIterator<Item = F>) -> Result<Vec<T>>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let thunks = thunks.into_iter();
    let mut results = Vec::with_capacity(thunks.size_hint().0);
    for thunk in thunks {
        results.push(thunk().await?);
    }
    Ok(results)
}
