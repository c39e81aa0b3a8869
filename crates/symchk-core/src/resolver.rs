//! Identity resolution: debug-directory entry in, symbol identity out.
//!
//! CodeView entries decode directly. Misc entries (pre-XP images) only name
//! a `.dbg` companion, so the companion is fetched first, keyed by the
//! image's own timestamp and size, and its CodeView entry is decoded instead.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::SymchkConfig;
use crate::identity::{
    identity_from_codeview, misc_filename, DebugDirectoryEntry, DebugKind, ResolveError,
    SymbolIdentity,
};
use crate::reader::{ImageReader, PeReader, ReadError};
use crate::retrieve::SymbolStore;

pub struct Resolver {
    reader: Arc<dyn ImageReader>,
    store: SymbolStore,
}

impl Resolver {
    pub fn new(reader: Arc<dyn ImageReader>, store: SymbolStore) -> Self {
        Self { reader, store }
    }

    pub fn from_config(cfg: &SymchkConfig) -> Self {
        Self::new(Arc::new(PeReader), SymbolStore::from_config(cfg))
    }

    pub fn store(&self) -> &SymbolStore {
        &self.store
    }

    /// Derives the symbol identity for `executable` from its chosen debug entry.
    ///
    /// `output_dir` is only touched for Misc entries, whose `.dbg` companion
    /// is cached there like any other artifact.
    pub fn resolve(
        &self,
        entry: &DebugDirectoryEntry,
        executable: &Path,
        output_dir: &Path,
    ) -> Result<SymbolIdentity, ResolveError> {
        match entry.kind {
            DebugKind::CodeView => {
                tracing::info!("Handle XP PE {}", executable.display());
                identity_from_codeview(&entry.payload)
            }
            DebugKind::Misc => {
                tracing::info!("Handle Win2k PE {}", executable.display());
                self.resolve_misc(entry, executable, output_dir)
            }
            DebugKind::Unknown(raw) => Err(ResolveError::UnknownDebugType(raw)),
        }
    }

    fn resolve_misc(
        &self,
        entry: &DebugDirectoryEntry,
        executable: &Path,
        output_dir: &Path,
    ) -> Result<SymbolIdentity, ResolveError> {
        let image_id = self
            .reader
            .image_identity(executable)
            .map_err(ResolveError::NotAnExecutable)?;

        let name = misc_filename(&entry.payload);
        if name.is_degraded() {
            tracing::debug!(
                "MISC name of {} decoded leniently as {:?}",
                executable.display(),
                name.as_str()
            );
        }
        let name = name.into_inner();
        if name.is_empty() {
            return Err(ResolveError::MalformedMisc);
        }

        let companion = SymbolIdentity::new(image_id, name);
        let dbg_path = self
            .store
            .fetch_and_expand(&companion, output_dir)
            .ok_or_else(|| ResolveError::CompanionUnavailable(companion.clone()))?;

        let payload = self.companion_codeview(dbg_path)?;
        identity_from_codeview(&payload)
    }

    fn companion_codeview(&self, path: PathBuf) -> Result<Vec<u8>, ResolveError> {
        match self.reader.dbg_codeview(&path) {
            Ok(payload) => Ok(payload),
            Err(ReadError::NoCodeView) => Err(ResolveError::MissingCodeView(path)),
            Err(source) => Err(ResolveError::BadCompanion { path, source }),
        }
    }

    /// Reads `executable` and resolves its identity without fetching the
    /// final artifact.
    pub fn identify(&self, executable: &Path, output_dir: &Path) -> Result<SymbolIdentity, ResolveError> {
        let entry = self
            .reader
            .debug_entry(executable)
            .map_err(ResolveError::NotAnExecutable)?;
        self.resolve(&entry, executable, output_dir)
    }

    /// Full pipeline for one executable: identify, fetch, expand.
    ///
    /// `Ok(None)` means the identity resolved but nothing new was stored
    /// (already cached, or no mirror had it).
    pub fn process_file(&self, executable: &Path, output_dir: &Path) -> Result<Option<PathBuf>, ResolveError> {
        let identity = self.identify(executable, output_dir)?;
        tracing::debug!("{} -> {}", executable.display(), identity);
        Ok(self.store.fetch_and_expand(&identity, output_dir))
    }
}
