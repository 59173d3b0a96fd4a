//! Bounded retry with an acceptance gate.

use std::future::Future;
use tracing::{debug, warn};

/// Every attempt either failed or produced a value the gate rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Exhausted {
    pub attempts: usize,
}

/// Runs `produce` up to `max_attempts` times and returns the first value
/// accepted by `is_acceptable`.
///
/// Errors from `produce` are logged and counted as an unsuccessful attempt.
/// Attempts are identical and run back to back.
pub async fn attempt<T, E, F, Fut, P>(
    max_attempts: usize,
    mut produce: F,
    is_acceptable: P,
) -> Result<T, Exhausted>
where
    F: FnMut(usize) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&T) -> bool,
    E: std::fmt::Display,
{
    for n in 1..=max_attempts {
        match produce(n).await {
            Ok(value) if is_acceptable(&value) => {
                debug!(attempt = n, "attempt accepted");
                return Ok(value);
            }
            Ok(_) => warn!(attempt = n, max_attempts, "attempt rejected by quality gate"),
            Err(e) => warn!(attempt = n, max_attempts, error = %e, "attempt failed"),
        }
    }
    Err(Exhausted {
        attempts: max_attempts,
    })
}
