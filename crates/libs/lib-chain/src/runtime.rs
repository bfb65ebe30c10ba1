//! Deadline helper that works on both native and `wasm32` targets.
//!
//! Native builds race the future against `tokio::time::sleep`; browser builds
//! race it against a `setTimeout`-backed `gloo_timers` future.

use crate::error::{Error, Result};
use std::future::Future;
use std::time::Duration;

/// Run `future`, failing with [`Error::Timeout`] once `limit` elapses.
#[cfg(not(target_arch = "wasm32"))]
pub async fn with_timeout<T, F>(operation: &'static str, limit: Duration, future: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(limit, future).await {
        Ok(result) => result,
        Err(_) => Err(timed_out(operation, limit)),
    }
}

/// Run `future`, failing with [`Error::Timeout`] once `limit` elapses.
#[cfg(target_arch = "wasm32")]
pub async fn with_timeout<T, F>(operation: &'static str, limit: Duration, future: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    use futures::future::{select, Either};
    use gloo_timers::future::TimeoutFuture;

    let millis = u32::try_from(limit.as_millis()).unwrap_or(u32::MAX);
    let deadline = TimeoutFuture::new(millis);
    futures::pin_mut!(future);
    futures::pin_mut!(deadline);

    match select(future, deadline).await {
        Either::Left((result, _)) => result,
        Either::Right(_) => Err(timed_out(operation, limit)),
    }
}

fn timed_out(operation: &'static str, limit: Duration) -> Error {
    tracing::warn!(operation, seconds = limit.as_secs(), "operation timed out");
    Error::Timeout {
        operation,
        seconds: limit.as_secs(),
    }
}
