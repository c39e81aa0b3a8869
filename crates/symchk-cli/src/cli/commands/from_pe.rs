//! from-pe: one executable.

use std::path::Path;
use symchk_core::resolver::Resolver;

/// Resolves and fetches symbols for `file`; prints the cached path on success.
pub fn run_from_pe(resolver: &Resolver, file: &Path, out: &Path) {
    match resolver.process_file(file, out) {
        Ok(Some(path)) => println!("{}", path.display()),
        Ok(None) => tracing::info!("{}: nothing new stored", file.display()),
        Err(e) if e.is_quiet() => tracing::info!("{}: {}", file.display(), e),
        Err(e) => tracing::error!("{}: {}", file.display(), e),
    }
}
