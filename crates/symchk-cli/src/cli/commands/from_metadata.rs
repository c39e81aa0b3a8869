//! from-metadata: identifier and file name given directly.

use std::path::Path;
use symchk_core::identity::SymbolIdentity;
use symchk_core::retrieve::SymbolStore;

/// Identifiers are stored uppercase on symbol servers; the name is used as given.
pub fn metadata_identity(guid: &str, pdb: &str) -> SymbolIdentity {
    SymbolIdentity::new(guid.trim().to_uppercase(), pdb.trim())
}

pub fn run_from_metadata(store: &SymbolStore, guid: &str, pdb: &str, out: &Path) {
    let identity = metadata_identity(guid, pdb);
    match store.fetch_and_expand(&identity, out) {
        Some(path) => println!("{}", path.display()),
        None => tracing::info!("{}: nothing new stored", identity),
    }
}
