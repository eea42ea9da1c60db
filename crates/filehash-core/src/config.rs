use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Notification throttle policy (optional section in config.toml).
///
/// These are UI-smoothness knobs, kept configurable on purpose: the step
/// bounds how often percent updates fire on fast disks, the quiet interval
/// guarantees periodic updates on slow ones.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressConfig {
    /// Minimum percent change between notifications.
    pub percent_step: u32,
    /// Upper bound on silence between notifications, in seconds.
    pub max_quiet_secs: f64,
}

impl ProgressConfig {
    pub fn max_quiet(&self) -> Duration {
        Duration::from_secs_f64(self.max_quiet_secs.max(0.0))
    }
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            percent_step: 5,
            max_quiet_secs: 2.0,
        }
    }
}

/// Global configuration loaded from `~/.config/filehash/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilehashConfig {
    /// Read chunk size in bytes. Large enough to amortize read overhead,
    /// small enough to keep cancellation latency low.
    pub chunk_bytes: usize,
    /// Optional throttle policy; if missing, built-in defaults are used.
    #[serde(default)]
    pub progress: Option<ProgressConfig>,
}

impl FilehashConfig {
    pub fn progress(&self) -> ProgressConfig {
        self.progress.clone().unwrap_or_default()
    }
}

impl Default for FilehashConfig {
    fn default() -> Self {
        Self {
            chunk_bytes: 4 * 1024 * 1024,
            progress: None,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("filehash")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<FilehashConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = FilehashConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: FilehashConfig = toml::from_str(&data)?;
    Ok(cfg)
}
