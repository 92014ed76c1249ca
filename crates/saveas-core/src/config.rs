use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Default delay before a transient object-URL is revoked (40 s).
pub const DEFAULT_GRACE_PERIOD_MS: u64 = 40_000;

/// Origin reported by hosts that are not backed by a web page.
pub const OPAQUE_ORIGIN: &str = "null";

/// Global configuration loaded from `~/.config/saveas/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaverConfig {
    /// How long an object-URL stays valid after a save hands it to the host.
    pub grace_period_ms: u64,
    /// Connect timeout for HEAD probes and GET fetches.
    pub connect_timeout_secs: u64,
    /// Total timeout for a GET fetch.
    pub request_timeout_secs: u64,
    /// Total timeout for the synchronous reachability probe.
    pub probe_timeout_secs: u64,
    /// Overrides the transport's User-Agent header.
    pub user_agent: Option<String>,
    /// Origin the directory host reports as its page origin.
    pub page_origin: String,
    /// Where the directory host writes files. None = current directory.
    pub download_dir: Option<PathBuf>,
}

impl Default for SaverConfig {
    fn default() -> Self {
        Self {
            grace_period_ms: DEFAULT_GRACE_PERIOD_MS,
            connect_timeout_secs: 15,
            request_timeout_secs: 30,
            probe_timeout_secs: 10,
            user_agent: None,
            page_origin: OPAQUE_ORIGIN.to_string(),
            download_dir: None,
        }
    }
}

impl SaverConfig {
    pub fn grace_period(&self) -> Duration {
        Duration::from_millis(self.grace_period_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("saveas")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<SaverConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = SaverConfig::default();
        let toml = default_cfg.to_toml()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: SaverConfig = toml::from_str(&data)?;
    Ok(cfg)
}
