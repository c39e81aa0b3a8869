//! Compressed-artifact handling.
//!
//! Symbol servers may store an artifact as a cabinet under its "compressed"
//! name: the literal name with its last character replaced by `_`
//! (`ntdll.pdb` → `ntdll.pd_`). Expansion is delegated to an external tool.

use anyhow::{Context, Result};
use std::path::Path;
use std::process::Command;

pub const COMPRESSED_MARKER: char = '_';

/// `name` with its final character replaced by the compressed marker.
pub fn compressed_name(name: &str) -> String {
    let mut chars = name.chars();
    chars.next_back();
    let mut out = chars.as_str().to_string();
    out.push(COMPRESSED_MARKER);
    out
}

/// True when the file name ends with the compressed marker.
pub fn is_compressed(path: &Path) -> bool {
    path.file_name()
        .map(|n| n.to_string_lossy().ends_with(COMPRESSED_MARKER))
        .unwrap_or(false)
}

/// Expands a cabinet into `dest_dir`. Only completion is observed; the
/// caller checks for the expanded file itself.
pub trait Decompressor: Send + Sync {
    fn expand(&self, archive: &Path, dest_dir: &Path) -> Result<()>;
}

/// Runs `cabextract -q -d <dest_dir> <archive>` (or a configured replacement
/// accepting the same arguments).
#[derive(Debug, Clone)]
pub struct CabExtract {
    program: String,
}

impl CabExtract {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for CabExtract {
    fn default() -> Self {
        Self::new("cabextract")
    }
}

impl Decompressor for CabExtract {
    fn expand(&self, archive: &Path, dest_dir: &Path) -> Result<()> {
        let status = Command::new(&self.program)
            .arg("-q")
            .arg("-d")
            .arg(dest_dir)
            .arg(archive)
            .status()
            .with_context(|| format!("spawn {}", self.program))?;
        if !status.success() {
            tracing::warn!(
                "{} exited with {} for {}",
                self.program,
                status,
                archive.display()
            );
        }
        Ok(())
    }
}
