//! Fallback combinators for calls across external boundaries.
//!
//! Every climate lookup and advisor call goes through one of these, so a
//! failure always ends in a logged warning and a default value, never an error.

use std::{fmt::Display, future::Future, time::Duration};

use tracing::warn;

/// Run `compute`; on error log it and return `default`
pub fn with_fallback<T, E, F>(what: &str, compute: F, default: T) -> T
where
    F: FnOnce() -> Result<T, E>,
    E: Display,
{
    match compute() {
        Ok(value) => value,
        Err(e) => {
            warn!(boundary = what, error = %e, "falling back to default");
            default
        }
    }
}

/// Await `fut` for at most `limit`; on error or timeout log it and return `default()`
pub async fn with_fallback_timeout<T, E, Fut, D>(what: &str, limit: Duration, fut: Fut, default: D) -> T
where
    Fut: Future<Output = Result<T, E>>,
    E: Display,
    D: FnOnce() -> T,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(Ok(value)) => value,
        Ok(Err(e)) => {
            warn!(boundary = what, error = %e, "falling back to default");
            default()
        }
        Err(_) => {
            warn!(
                boundary = what,
                timeout_ms = limit.as_millis() as u64,
                "timed out, falling back to default"
            );
            default()
        }
    }
}
