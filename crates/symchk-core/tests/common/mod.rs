#![allow(dead_code)]

pub mod fixtures;
pub mod symbol_server;

use std::path::Path;
use std::sync::Arc;

use symchk_core::config::SymchkConfig;
use symchk_core::reader::PeReader;
use symchk_core::resolver::Resolver;
use symchk_core::retrieve::SymbolStore;

/// Production wiring pointed at local mirrors, with a fast gate and no retries.
pub fn config(mirrors: &[&str]) -> SymchkConfig {
    SymchkConfig {
        mirrors: mirrors.iter().map(|m| m.to_string()).collect(),
        max_requests_per_sec: 200,
        connect_timeout_secs: 2,
        transfer_timeout_secs: Some(5),
        ..SymchkConfig::default()
    }
}

pub fn store(mirrors: &[&str]) -> SymbolStore {
    SymbolStore::from_config(&config(mirrors))
}

pub fn resolver(mirrors: &[&str]) -> Arc<Resolver> {
    Arc::new(Resolver::new(Arc::new(PeReader), store(mirrors)))
}

/// Every regular file below `dir`, relative, sorted.
pub fn tree(dir: &Path) -> Vec<String> {
    let mut out: Vec<String> = walkdir::WalkDir::new(dir)
        .into_iter()
        .flatten()
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            e.path()
                .strip_prefix(dir)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect();
    out.sort();
    out
}
