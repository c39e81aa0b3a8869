use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::retry::RetryPolicy;

/// Microsoft's public symbol server.
pub const DEFAULT_MIRROR: &str = "http://msdl.microsoft.com/download/symbols";

/// Cache directory used when `-o` is not given.
pub const DEFAULT_OUTPUT_DIRECTORY: &str = "symcache";

/// Retry policy parameters (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per candidate URL (including the first).
    pub max_attempts: u32,
    /// Base delay in seconds for exponential backoff (e.g. 0.25 = 250ms).
    pub base_delay_secs: f64,
    /// Maximum backoff delay in seconds.
    pub max_delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_secs: 0.25,
            max_delay_secs: 10,
        }
    }
}

impl RetryConfig {
    pub fn to_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts.max(1),
            base_delay: Duration::from_secs_f64(self.base_delay_secs.max(0.0)),
            max_delay: Duration::from_secs(self.max_delay_secs),
        }
    }
}

/// Global configuration loaded from `~/.config/symchk/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymchkConfig {
    /// Symbol server base URLs, tried in order.
    pub mirrors: Vec<String>,
    /// Upper bound on outbound GETs per second, shared by every worker.
    pub max_requests_per_sec: u32,
    /// Batch worker count; `None` = available parallelism minus one.
    #[serde(default)]
    pub workers: Option<usize>,
    /// External program used to expand `_`-suffixed cabinet artifacts.
    pub decompressor: String,
    /// User-Agent sent with every request.
    #[serde(default)]
    pub user_agent: Option<String>,
    /// TCP connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Whole-transfer timeout in seconds (None = wait indefinitely).
    #[serde(default)]
    pub transfer_timeout_secs: Option<u64>,
    /// Optional retry policy for transient failures; if missing, built-in defaults are used.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
}

impl Default for SymchkConfig {
    fn default() -> Self {
        Self {
            mirrors: vec![DEFAULT_MIRROR.to_string()],
            max_requests_per_sec: 4,
            workers: None,
            decompressor: "cabextract".to_string(),
            user_agent: Some("Microsoft-Symbol-Server/10.0.0.0".to_string()),
            connect_timeout_secs: 30,
            transfer_timeout_secs: None,
            retry: None,
        }
    }
}

impl SymchkConfig {
    /// Checks mirror URLs and normalizes them (no trailing slash).
    pub fn validate(mut self) -> Result<Self> {
        if self.mirrors.is_empty() {
            anyhow::bail!("config: at least one mirror is required");
        }
        for mirror in &mut self.mirrors {
            let parsed = url::Url::parse(mirror)
                .with_context(|| format!("config: invalid mirror URL {:?}", mirror))?;
            if parsed.scheme() != "http" && parsed.scheme() != "https" {
                anyhow::bail!("config: mirror {} must be http or https", mirror);
            }
            let trimmed = mirror.trim_end_matches('/').to_string();
            *mirror = trimmed;
        }
        self.max_requests_per_sec = self.max_requests_per_sec.max(1);
        Ok(self)
    }

    /// Effective retry policy (configured section or built-in default).
    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry.clone().unwrap_or_default().to_policy()
    }

    /// Batch pool size: configured value, else available parallelism minus one, minimum 1.
    pub fn worker_count(&self) -> usize {
        if let Some(n) = self.workers {
            return n.max(1);
        }
        let cpus = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        cpus.saturating_sub(1).max(1)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("symchk")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<SymchkConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = SymchkConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)
        .with_context(|| format!("read config: {}", path.display()))?;
    let cfg: SymchkConfig =
        toml::from_str(&data).with_context(|| format!("parse config: {}", path.display()))?;
    cfg.validate()
}
