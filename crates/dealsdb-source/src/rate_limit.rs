//! Retry with exponential backoff for transient backend errors.
//!
//! Rate limiting (429) and transport failures are retried; everything else
//! is propagated on the first attempt.

use std::future::Future;
use std::time::Duration;

use crate::error::SourceError;

fn is_retriable(err: &SourceError) -> bool {
    matches!(err, SourceError::RateLimited { .. } | SourceError::Http(_))
}

/// Executes `operation`, retrying retriable errors up to `max_retries` times.
///
/// The wait before the n-th retry is `backoff_base_secs * 2^(n-1)` seconds,
/// or the server's `Retry-After` when a rate-limit response asks for longer.
/// Once retries are exhausted the last error is returned.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_secs: u64,
    mut operation: F,
) -> Result<T, SourceError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, SourceError>>,
{
    let mut attempt = 0u32;

    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if !is_retriable(&err) || attempt >= max_retries => return Err(err),
            Err(err) => err,
        };

        let mut delay_secs = backoff_base_secs.saturating_mul(1u64 << attempt.min(62));
        if let SourceError::RateLimited {
            retry_after_secs, ..
        } = &err
        {
            delay_secs = delay_secs.max(*retry_after_secs);
        }
        tracing::warn!(
            attempt,
            max_retries,
            delay_secs,
            error = %err,
            "transient source error, retrying after backoff"
        );
        tokio::time::sleep(Duration::from_secs(delay_secs)).await;
        attempt += 1;
    }
}
