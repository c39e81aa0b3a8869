use super::{Failure, RetryPolicy};
use crate::fetch::FetchError;

/// Calls `f` until it succeeds, the mirror gives a final answer, or the
/// policy runs out of attempts.
pub fn run_with_retry<T, F>(policy: &RetryPolicy, mut f: F) -> Result<T, FetchError>
where
    F: FnMut() -> Result<T, FetchError>,
{
    let mut attempt = 1u32;
    loop {
        let err = match f() {
            Ok(v) => return Ok(v),
            Err(e) => e,
        };
        let failure = Failure::of(&err);
        match policy.delay_after(attempt, failure) {
            None => return Err(err),
            Some(delay) => {
                tracing::debug!(
                    "attempt {} failed ({:?}: {}), retrying in {:?}",
                    attempt,
                    failure,
                    err,
                    delay
                );
                std::thread::sleep(delay);
                attempt += 1;
            }
        }
    }
}
