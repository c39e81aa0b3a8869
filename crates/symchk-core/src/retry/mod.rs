//! Retry and backoff for symbol-server requests.
//!
//! A mirror that answers "not here" has answered; the orchestrator moves to
//! the next name variant. Only a mirror that could not answer (throttled,
//! erroring, unreachable) is asked the same question again.

mod failure;
mod policy;
mod run;

pub use failure::Failure;
pub use policy::RetryPolicy;
pub use run::run_with_retry;
