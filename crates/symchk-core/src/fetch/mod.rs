//! Artifact fetcher: one GET per candidate URL, gated by the shared rate
//! limiter and retried only on transient failures.

mod error;
mod http;

pub use error::FetchError;
pub use http::CurlTransport;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::rate_limit::RateLimiter;
use crate::retry::{run_with_retry, RetryPolicy};

/// Temporary file suffix used before atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Path for the temp file: appends `.part` to the final path (e.g. `ntdll.pdb` → `ntdll.pdb.part`).
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}

/// GET-to-file seam. Non-2xx answers must surface as `FetchError::Http` and
/// must not leave a file at `dest`.
pub trait Transport: Send + Sync {
    fn get_to_file(&self, url: &str, dest: &Path) -> Result<u64, FetchError>;
}

/// Transport wrapped in the process-wide rate limiter and a retry policy.
#[derive(Clone)]
pub struct Fetcher {
    transport: Arc<dyn Transport>,
    limiter: Arc<RateLimiter>,
    retry: RetryPolicy,
}

impl Fetcher {
    pub fn new(transport: Arc<dyn Transport>, limiter: Arc<RateLimiter>, retry: RetryPolicy) -> Self {
        Self {
            transport,
            limiter,
            retry,
        }
    }

    pub fn limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    /// Downloads `url` into `dest`. Every attempt, retries included, passes
    /// through the rate limiter.
    pub fn fetch(&self, url: &str, dest: &Path) -> Result<u64, FetchError> {
        run_with_retry(&self.retry, || {
            self.limiter.run(|| self.transport.get_to_file(url, dest))
        })
    }
}
