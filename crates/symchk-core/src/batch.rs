//! Tree scan: every file under a root goes through the resolver on a pool
//! of worker threads. One item's failure never touches its siblings.

use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::sync::{Arc, Mutex, PoisonError};

use walkdir::WalkDir;

use crate::identity::ResolveError;
use crate::resolver::Resolver;

/// One executable candidate and the cache it resolves into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    pub executable: PathBuf,
    pub output_dir: PathBuf,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    /// Items that produced a new artifact in the cache.
    pub resolved: usize,
    /// Everything else: not executables, unresolvable, cached, unavailable.
    pub skipped: usize,
}

enum Outcome {
    Stored(PathBuf),
    Nothing,
    Failed(ResolveError),
    Panicked,
}

/// Every regular file under `root`, recursively. Unreadable entries are
/// logged and left out.
pub fn discover(root: &Path, output_dir: &Path) -> Vec<WorkItem> {
    WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(e) => Some(e),
            Err(e) => {
                tracing::warn!("cannot enumerate under {}: {}", root.display(), e);
                None
            }
        })
        .filter(|e| e.file_type().is_file())
        .map(|e| WorkItem {
            executable: e.into_path(),
            output_dir: output_dir.to_path_buf(),
        })
        .collect()
}

fn process(resolver: &Resolver, item: &WorkItem) -> Outcome {
    let run = panic::catch_unwind(AssertUnwindSafe(|| {
        resolver.process_file(&item.executable, &item.output_dir)
    }));
    match run {
        Ok(Ok(Some(path))) => Outcome::Stored(path),
        Ok(Ok(None)) => Outcome::Nothing,
        Ok(Err(e)) => Outcome::Failed(e),
        Err(_) => Outcome::Panicked,
    }
}

/// Resolves every item on `workers` threads (at least one).
pub fn run_items(resolver: &Arc<Resolver>, items: Vec<WorkItem>, workers: usize) -> BatchSummary {
    let total = items.len();
    let mut summary = BatchSummary {
        total,
        ..BatchSummary::default()
    };
    if total == 0 {
        return summary;
    }

    let work: Arc<Mutex<VecDeque<WorkItem>>> = Arc::new(Mutex::new(items.into_iter().collect()));
    let (tx, rx) = mpsc::channel();
    let num_workers = workers.max(1).min(total);
    let mut handles = Vec::with_capacity(num_workers);
    for _ in 0..num_workers {
        let work = Arc::clone(&work);
        let tx = tx.clone();
        let resolver = Arc::clone(resolver);
        handles.push(std::thread::spawn(move || loop {
            let item = match work
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .pop_front()
            {
                Some(item) => item,
                None => break,
            };
            let outcome = process(&resolver, &item);
            if tx.send((item, outcome)).is_err() {
                break;
            }
        }));
    }
    drop(tx);

    let mut received = 0usize;
    for (item, outcome) in rx.iter() {
        received += 1;
        match outcome {
            Outcome::Stored(path) => {
                summary.resolved += 1;
                tracing::info!("{} -> {}", item.executable.display(), path.display());
            }
            Outcome::Nothing => {
                summary.skipped += 1;
                tracing::info!("{}: nothing new stored", item.executable.display());
            }
            Outcome::Failed(e) if e.is_quiet() => {
                summary.skipped += 1;
                tracing::debug!("{}: {}", item.executable.display(), e);
            }
            Outcome::Failed(e) => {
                summary.skipped += 1;
                tracing::warn!("{}: {}", item.executable.display(), e);
            }
            Outcome::Panicked => {
                summary.skipped += 1;
                tracing::error!("{}: worker panicked", item.executable.display());
            }
        }
    }

    for h in handles {
        if let Err(e) = h.join() {
            tracing::error!("worker thread panicked: {:?}", e);
        }
    }
    // Items lost with a dead worker still count.
    summary.skipped += total - received;

    tracing::info!(
        "batch done: {} files, {} resolved, {} skipped",
        summary.total,
        summary.resolved,
        summary.skipped
    );
    summary
}

/// [`discover`] then [`run_items`].
pub fn run_batch(resolver: &Arc<Resolver>, root: &Path, output_dir: &Path, workers: usize) -> BatchSummary {
    let items = discover(root, output_dir);
    tracing::info!(
        "found {} files under {}, {} workers",
        items.len(),
        root.display(),
        workers.max(1)
    );
    run_items(resolver, items, workers)
}
