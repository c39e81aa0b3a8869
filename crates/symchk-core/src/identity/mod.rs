//! Symbol identity: the (identifier, filename) key a symbol server files an
//! artifact under, and the decoders that derive it from debug-directory
//! payloads.

mod codeview;
mod error;
mod misc;

pub use codeview::{identity_from_codeview, CodeViewRecord};
pub use error::ResolveError;
pub use misc::{misc_filename, MiscName};

use std::fmt;

/// `IMAGE_DEBUG_TYPE_CODEVIEW`.
pub const IMAGE_DEBUG_TYPE_CODEVIEW: u32 = 2;
/// `IMAGE_DEBUG_TYPE_MISC`.
pub const IMAGE_DEBUG_TYPE_MISC: u32 = 4;

/// Length of a bare GUID in hex; a valid CodeView identifier is longer.
pub const BARE_GUID_LEN: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugKind {
    CodeView,
    /// Pre-XP record naming a `.dbg` companion file.
    Misc,
    /// Any other `IMAGE_DEBUG_TYPE_*` value.
    Unknown(u32),
}

impl DebugKind {
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            IMAGE_DEBUG_TYPE_CODEVIEW => DebugKind::CodeView,
            IMAGE_DEBUG_TYPE_MISC => DebugKind::Misc,
            other => DebugKind::Unknown(other),
        }
    }
}

/// One record from an image's debug directory, as handed over by the reader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebugDirectoryEntry {
    pub kind: DebugKind,
    pub payload: Vec<u8>,
}

impl DebugDirectoryEntry {
    pub fn new(kind: DebugKind, payload: Vec<u8>) -> Self {
        Self { kind, payload }
    }
}

/// Key of a symbol artifact on a symbol server and in the local cache.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SymbolIdentity {
    /// Uppercase hex: GUID+age, timestamp+age, or timestamp+image size.
    pub identifier: String,
    /// Artifact base name, case preserved.
    pub filename: String,
}

impl SymbolIdentity {
    pub fn new(identifier: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            filename: filename.into(),
        }
    }

    /// True when the identifier is no longer than a bare GUID, i.e. the age
    /// was probably left off.
    pub fn looks_truncated(&self) -> bool {
        self.identifier.len() <= BARE_GUID_LEN
    }
}

impl fmt::Display for SymbolIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.filename, self.identifier)
    }
}

/// Last path component, splitting on both Windows and POSIX separators.
pub(crate) fn base_name(path: &str) -> &str {
    path.rsplit(|c: char| c == '\\' || c == '/').next().unwrap_or(path)
}
