//! Retrieval orchestrator: symbol identity in, cached artifact out.
//!
//! Cache layout is `<output_dir>/<filename>/<identifier>/<artifact>`, the
//! same shape symbol-server clients use, so existing tools can read it.
//! A non-empty identity directory means the identity was already handled
//! and nothing is downloaded again, whichever mirror it came from.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::SymchkConfig;
use crate::decompress::{compressed_name, is_compressed, CabExtract, Decompressor};
use crate::fetch::{CurlTransport, Fetcher};
use crate::identity::SymbolIdentity;
use crate::rate_limit::RateLimiter;
use crate::retry::Failure;

/// One URL to try: a mirror base plus a name variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorCandidate {
    pub base: String,
    pub variant: String,
}

impl MirrorCandidate {
    pub fn url(&self, identity: &SymbolIdentity) -> String {
        format!(
            "{}/{}/{}/{}",
            self.base, identity.filename, identity.identifier, self.variant
        )
    }
}

/// Name variants in the order they are tried: compressed, then literal.
pub fn name_variants(filename: &str) -> Vec<String> {
    let compressed = compressed_name(filename);
    if compressed == filename {
        vec![compressed]
    } else {
        vec![compressed, filename.to_string()]
    }
}

/// `<output_dir>/<filename>/<identifier>`.
pub fn cache_dir(output_dir: &Path, identity: &SymbolIdentity) -> PathBuf {
    output_dir
        .join(&identity.filename)
        .join(&identity.identifier)
}

fn has_entries(dir: &Path) -> bool {
    fs::read_dir(dir)
        .map(|mut it| it.next().is_some())
        .unwrap_or(false)
}

fn remove_if_empty(dir: &Path) {
    if has_entries(dir) {
        return;
    }
    if let Err(e) = fs::remove_dir(dir) {
        if e.kind() != io::ErrorKind::NotFound {
            tracing::warn!("cannot remove empty {}: {}", dir.display(), e);
        }
    }
}

/// Mirrors, the rate-limited fetcher and the decompressor, bundled.
#[derive(Clone)]
pub struct SymbolStore {
    mirrors: Vec<String>,
    fetcher: Fetcher,
    decompressor: Arc<dyn Decompressor>,
}

impl SymbolStore {
    pub fn new(mirrors: Vec<String>, fetcher: Fetcher, decompressor: Arc<dyn Decompressor>) -> Self {
        let mirrors = mirrors
            .into_iter()
            .map(|m| m.trim_end_matches('/').to_string())
            .collect();
        Self {
            mirrors,
            fetcher,
            decompressor,
        }
    }

    /// Production wiring: libcurl transport, one shared rate limiter, cabextract.
    pub fn from_config(cfg: &SymchkConfig) -> Self {
        let fetcher = Fetcher::new(
            Arc::new(CurlTransport::from_config(cfg)),
            RateLimiter::shared(cfg.max_requests_per_sec),
            cfg.retry_policy(),
        );
        Self::new(
            cfg.mirrors.clone(),
            fetcher,
            Arc::new(CabExtract::new(cfg.decompressor.clone())),
        )
    }

    pub fn mirrors(&self) -> &[String] {
        &self.mirrors
    }

    /// Every (mirror, variant) pair in try order: all variants of a mirror
    /// before the next mirror.
    pub fn candidates(&self, identity: &SymbolIdentity) -> Vec<MirrorCandidate> {
        let variants = name_variants(&identity.filename);
        self.mirrors
            .iter()
            .flat_map(|base| {
                variants.iter().map(move |variant| MirrorCandidate {
                    base: base.clone(),
                    variant: variant.clone(),
                })
            })
            .collect()
    }

    /// Downloads the artifact for `identity` into the cache.
    ///
    /// Returns the stored path, or `None` when the identity is already cached
    /// or no mirror had it. Failures are logged, never returned.
    pub fn fetch(&self, identity: &SymbolIdentity, output_dir: &Path) -> Option<PathBuf> {
        if identity.looks_truncated() {
            tracing::warn!(
                "identifier {} is too short to be valid. Did you append the age field?",
                identity.identifier
            );
        }

        let dir = cache_dir(output_dir, identity);
        let name_dir = output_dir.join(&identity.filename);
        for candidate in self.candidates(identity) {
            let url = candidate.url(identity);
            tracing::info!("Trying {}", url);

            if has_entries(&dir) {
                tracing::info!("Skipping: {} already exists", dir.display());
                return None;
            }
            // Only a `<filename>` directory made by this attempt is ours to clean up.
            let created_name_dir = !name_dir.exists();
            if let Err(e) = fs::create_dir_all(&dir) {
                tracing::error!("Cannot create {}: {}", dir.display(), e);
                if created_name_dir {
                    remove_if_empty(&name_dir);
                }
                continue;
            }

            let dest = dir.join(&candidate.variant);
            match self.fetcher.fetch(&url, &dest) {
                Ok(bytes) => {
                    tracing::info!("Saved symbols to {} ({} bytes)", dest.display(), bytes);
                    return Some(dest);
                }
                Err(e) => {
                    match Failure::of(&e) {
                        Failure::Missing => tracing::info!("Not on mirror: {} ({})", url, e),
                        failure => tracing::error!("Cannot fetch {}: {} ({:?})", url, e, failure),
                    }
                    remove_if_empty(&dir);
                    if created_name_dir {
                        remove_if_empty(&name_dir);
                    }
                }
            }
        }
        None
    }

    /// Expands a compressed artifact next to itself. Returns the expanded
    /// path when the decompressor produced it, else the artifact unchanged.
    pub fn expand(&self, artifact: &Path, identity: &SymbolIdentity) -> PathBuf {
        if !is_compressed(artifact) {
            return artifact.to_path_buf();
        }
        let Some(dir) = artifact.parent() else {
            return artifact.to_path_buf();
        };
        if let Err(e) = self.decompressor.expand(artifact, dir) {
            tracing::error!("Cannot expand {}: {:#}", artifact.display(), e);
            return artifact.to_path_buf();
        }
        let expanded = dir.join(&identity.filename);
        if expanded.is_file() {
            tracing::info!("Expanded {} to {}", artifact.display(), expanded.display());
            expanded
        } else {
            tracing::warn!(
                "{} did not yield {}",
                artifact.display(),
                identity.filename
            );
            artifact.to_path_buf()
        }
    }

    /// [`fetch`](Self::fetch) followed by [`expand`](Self::expand).
    pub fn fetch_and_expand(&self, identity: &SymbolIdentity, output_dir: &Path) -> Option<PathBuf> {
        let saved = self.fetch(identity, output_dir)?;
        Some(self.expand(&saved, identity))
    }
}
