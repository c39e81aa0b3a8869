//! from-dir: recursive tree scan on a worker pool.

use std::path::Path;
use std::sync::Arc;
use symchk_core::batch;
use symchk_core::resolver::Resolver;

/// Scans `dir` and prints a one-line summary.
pub fn run_from_dir(resolver: Resolver, dir: &Path, out: &Path, workers: usize) {
    let summary = batch::run_batch(&Arc::new(resolver), dir, out, workers);
    println!(
        "{} files: {} resolved, {} skipped",
        summary.total, summary.resolved, summary.skipped
    );
}
