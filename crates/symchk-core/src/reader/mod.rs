//! Binary-format reader: the seam between raw image bytes and the resolver.
//!
//! The resolver only depends on [`ImageReader`]; [`PeReader`] is the
//! production implementation (goblin for headers, hand-rolled debug
//! directory walking since the resolver needs the raw payload bytes).

mod dbg;
mod directory;
mod pe;

pub use dbg::parse_dbg_codeview;
pub use directory::{RawDebugEntry, DEBUG_DIRECTORY_ENTRY_SIZE};
pub use pe::{image_identity_from_bytes, select_entry, PeReader};

use std::path::Path;
use thiserror::Error;

use crate::identity::DebugDirectoryEntry;

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("PE parse: {0}")]
    Parse(#[from] goblin::error::Error),
    #[error("image has no optional header")]
    NoOptionalHeader,
    #[error("image has no debug directory")]
    NoDebugDirectory,
    #[error("truncated {0}")]
    Truncated(&'static str),
    #[error("not a .dbg file (signature {0:#06x})")]
    BadDbgSignature(u16),
    #[error("no CodeView entry in debug directory")]
    NoCodeView,
}

/// Decoded views of an executable (or `.dbg` companion) the resolver needs.
pub trait ImageReader: Send + Sync {
    /// The debug-directory entry that identifies the image's symbols.
    fn debug_entry(&self, path: &Path) -> Result<DebugDirectoryEntry, ReadError>;

    /// Image key from the PE header: `%08X` timestamp then `%X` SizeOfImage.
    fn image_identity(&self, path: &Path) -> Result<String, ReadError>;

    /// Raw CodeView payload from a `.dbg` file's own debug directory.
    fn dbg_codeview(&self, path: &Path) -> Result<Vec<u8>, ReadError>;
}
