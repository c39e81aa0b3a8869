use std::path::PathBuf;
use thiserror::Error;

use super::SymbolIdentity;
use crate::reader::ReadError;

/// Why an executable produced no symbol identity. None of these are fatal
/// to a batch run; the item is logged and skipped.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The reader could not make sense of the file (not a PE, corrupt, no debug directory).
    #[error("not an executable: {0}")]
    NotAnExecutable(#[source] ReadError),

    #[error("unknown debug type {0}")]
    UnknownDebugType(u32),

    #[error("CodeView section not NB10 or RSDS (tag {tag:?})")]
    UnsupportedCodeViewFormat { tag: String },

    /// NB09 CodeView, found inside some `.dbg` companions.
    #[error("unsupported legacy CodeView format {tag}")]
    UnsupportedLegacyFormat { tag: String },

    #[error("malformed CodeView record: {0}")]
    MalformedCodeView(&'static str),

    #[error("MISC debug record names no .dbg file")]
    MalformedMisc,

    /// The `.dbg` companion carries no CodeView entry of its own.
    #[error("{} has no CodeView entry", .0.display())]
    MissingCodeView(PathBuf),

    /// No mirror had the `.dbg` companion (or it was already cached).
    #[error("no .dbg companion retrieved for {0}")]
    CompanionUnavailable(SymbolIdentity),

    #[error("cannot read .dbg companion {}: {source}", .path.display())]
    BadCompanion {
        path: PathBuf,
        #[source]
        source: ReadError,
    },
}

impl ResolveError {
    /// Files that are simply not executables are expected in tree scans and
    /// only worth a debug line.
    pub fn is_quiet(&self) -> bool {
        matches!(self, ResolveError::NotAnExecutable(_))
    }
}
