use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;

/// Number of concurrent download workers per listing.
pub const DOWNLOAD_WORKERS: usize = 10;

/// Capacity of the bounded job queue feeding the download workers.
pub const JOB_QUEUE_CAPACITY: usize = 10;

/// Client-wide request timeout when the config file does not override it.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Global configuration loaded from `~/.config/blobgob/config.toml`. Missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlobGobConfig {
    /// Timeout in seconds applied to every request (probe, listing, blob).
    pub request_timeout_secs: u64,
    /// Optional `User-Agent` header sent on every request.
    #[serde(default)]
    pub user_agent: Option<String>,
    /// SOCKS5 proxy used when `--socks` is not given.
    #[serde(default)]
    pub socks_proxy: Option<String>,
}

impl Default for BlobGobConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            user_agent: None,
            socks_proxy: None,
        }
    }
}

impl BlobGobConfig {
    /// Request timeout as a `Duration`; zero is clamped to one second so the
    /// client never runs without a timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("blobgob")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
///
/// The file is optional: when the config directory cannot be located or the
/// default file cannot be written, the run continues with defaults. Only an
/// existing file that fails to load is an error.
pub fn load_or_init() -> Result<BlobGobConfig> {
    match config_path() {
        Ok(path) => load_or_init_at(&path),
        Err(err) => {
            tracing::warn!("config directory unavailable, using defaults: {:#}", err);
            Ok(BlobGobConfig::default())
        }
    }
}

/// [`load_or_init`] for an explicit path.
pub fn load_or_init_at(path: &Path) -> Result<BlobGobConfig> {
    if path.exists() {
        return Ok(load_from_path(path)?);
    }

    let default_cfg = BlobGobConfig::default();
    match write_config(path, &default_cfg) {
        Ok(()) => tracing::info!("created default config at {}", path.display()),
        Err(err) => tracing::warn!(
            "cannot create default config at {}, using defaults: {:#}",
            path.display(),
            err
        ),
    }
    Ok(default_cfg)
}

fn write_config(path: &Path, cfg: &BlobGobConfig) -> Result<()> {
    let toml = toml::to_string_pretty(cfg)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, toml)?;
    Ok(())
}

/// Parse an existing config file.
pub fn load_from_path(path: &Path) -> Result<BlobGobConfig, ConfigError> {
    let file_err = |reason: String| ConfigError::File {
        path: path.display().to_string(),
        reason,
    };
    let data = fs::read_to_string(path).map_err(|e| file_err(e.to_string()))?;
    toml::from_str(&data).map_err(|e| file_err(e.to_string()))
}
