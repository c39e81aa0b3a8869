//! libcurl-backed GET-to-file transport.

use curl::easy::Easy;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

use super::{temp_path, FetchError, Transport};
use crate::config::SymchkConfig;

/// Blocking HTTP GET via libcurl. Follows redirects (symbol servers commonly
/// bounce to a CDN) and writes through a `.part` file so a failed transfer
/// never leaves a partial artifact under its final name.
#[derive(Debug, Clone)]
pub struct CurlTransport {
    pub user_agent: Option<String>,
    pub connect_timeout: Duration,
    /// None = no overall limit; a stalled mirror blocks the caller.
    pub transfer_timeout: Option<Duration>,
}

impl Default for CurlTransport {
    fn default() -> Self {
        Self::from_config(&SymchkConfig::default())
    }
}

impl CurlTransport {
    pub fn from_config(cfg: &SymchkConfig) -> Self {
        Self {
            user_agent: cfg.user_agent.clone(),
            connect_timeout: Duration::from_secs(cfg.connect_timeout_secs),
            transfer_timeout: cfg.transfer_timeout_secs.map(Duration::from_secs),
        }
    }

    fn configure(&self, easy: &mut Easy, url: &str) -> Result<(), curl::Error> {
        easy.url(url)?;
        easy.get(true)?;
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        easy.connect_timeout(self.connect_timeout)?;
        if let Some(timeout) = self.transfer_timeout {
            easy.timeout(timeout)?;
        }
        if let Some(ua) = &self.user_agent {
            easy.useragent(ua)?;
        }
        Ok(())
    }

    fn download(&self, url: &str, part: &Path) -> Result<u64, FetchError> {
        let mut file = File::create(part)?;
        let mut written = 0u64;
        let mut write_error: Option<io::Error> = None;

        let mut easy = Easy::new();
        self.configure(&mut easy, url)?;

        let performed = {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| match file.write_all(data) {
                Ok(()) => {
                    written += data.len() as u64;
                    Ok(data.len())
                }
                Err(e) => {
                    write_error = Some(e);
                    Ok(0) // abort transfer
                }
            })?;
            transfer.perform()
        };

        if let Some(e) = write_error {
            return Err(FetchError::Storage(e));
        }
        performed?;

        let code = easy.response_code()?;
        if !(200..300).contains(&code) {
            return Err(FetchError::Http(code));
        }
        file.flush()?;
        Ok(written)
    }
}

fn discard_part(part: &Path) {
    if let Err(rm) = fs::remove_file(part) {
        if rm.kind() != io::ErrorKind::NotFound {
            tracing::warn!("cannot remove {}: {}", part.display(), rm);
        }
    }
}

/// Moves a finished `.part` file to its final name. Whatever happens, no
/// `.part` file is left behind to make the cache entry look populated.
fn commit_part(part: &Path, dest: &Path) -> Result<(), FetchError> {
    if let Err(e) = fs::rename(part, dest) {
        discard_part(part);
        return Err(FetchError::Storage(e));
    }
    Ok(())
}

impl Transport for CurlTransport {
    fn get_to_file(&self, url: &str, dest: &Path) -> Result<u64, FetchError> {
        let part = temp_path(dest);
        match self.download(url, &part) {
            Ok(written) => {
                commit_part(&part, dest)?;
                Ok(written)
            }
            Err(e) => {
                discard_part(&part);
                Err(e)
            }
        }
    }
}
