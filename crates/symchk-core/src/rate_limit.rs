//! Request gate shared by every fetch in the process.
//!
//! One "last call finished" instant sits behind one mutex. A caller takes the
//! lock, sleeps off whatever remains of the minimum interval, runs its request
//! and stamps the completion time before releasing. Because the lock is held
//! across the request, spacing is measured from the end of one call to the
//! start of the next, across all worker threads.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    last_call: Mutex<Instant>,
}

impl RateLimiter {
    /// Gate allowing at most `max_per_second` calls per second (minimum 1).
    ///
    /// The clock starts at construction, so the very first call also waits
    /// out one interval.
    pub fn per_second(max_per_second: u32) -> Self {
        let max = max_per_second.max(1);
        Self {
            min_interval: Duration::from_secs(1) / max,
            last_call: Mutex::new(Instant::now()),
        }
    }

    /// Convenience for the common case of sharing one gate between workers.
    pub fn shared(max_per_second: u32) -> Arc<Self> {
        Arc::new(Self::per_second(max_per_second))
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Runs `f` inside the gate.
    pub fn run<T, F>(&self, f: F) -> T
    where
        F: FnOnce() -> T,
    {
        // A panic inside `f` poisons the lock; the instant is still meaningful.
        let mut last = self.last_call.lock().unwrap_or_else(PoisonError::into_inner);
        let elapsed = last.elapsed();
        if elapsed < self.min_interval {
            std::thread::sleep(self.min_interval - elapsed);
        }
        let out = f();
        *last = Instant::now();
        out
    }
}
