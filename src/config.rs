//! Application configuration.
//!
//! Configuration is loaded from a TOML file at:
//! 1. `$EMLVIEW_CONFIG` (environment variable)
//! 2. `~/.config/emlview/config.toml` (Linux/macOS)
//!    `%APPDATA%\emlview\config.toml` (Windows)
//! 3. Built-in defaults
//!
//! Command-line flags always take precedence over the file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General behavior settings.
    pub general: GeneralConfig,
    /// Input and output naming.
    pub convert: ConvertConfig,
    /// What happens to the output after it is written.
    pub viewer: ViewerConfig,
}

/// General behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub log_level: String,
    /// Override the directory used for the log file.
    pub cache_dir: Option<PathBuf>,
    /// Also write logs to `emlview.log` in the cache directory. Off by
    /// default so a run leaves nothing behind but the output file.
    pub log_to_file: bool,
}

/// Input and output naming.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    /// Extension an input file must have (without the dot).
    pub input_extension: String,
    /// Extension given to the default output file (without the dot).
    pub output_extension: String,
}

/// Browser launch and cleanup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Open the output in a browser after writing it.
    pub open_browser: bool,
    /// Program to open the output with instead of the system default.
    pub browser: Option<String>,
    /// Seconds to wait before deleting the output when deletion is requested.
    pub delete_delay_secs: u64,
}

// ── Default implementations ─────────────────────────────────────

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            cache_dir: None,
            log_to_file: false,
        }
    }
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            input_extension: "eml".to_string(),
            output_extension: "html".to_string(),
        }
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            open_browser: true,
            browser: None,
            delete_delay_secs: 2,
        }
    }
}

impl ViewerConfig {
    /// The configured deletion delay as a [`Duration`].
    pub fn delete_delay(&self) -> Duration {
        Duration::from_secs(self.delete_delay_secs)
    }
}

// ── Load / save ─────────────────────────────────────────────────

/// Load configuration, searching standard locations.
///
/// A missing file yields the defaults. A file that exists but cannot be read
/// or parsed is an error, so the caller can tell the user before falling back.
pub fn load_config() -> Result<Config, ConfigError> {
    match config_file_path() {
        Some(path) if path.exists() => load_config_from(&path),
        _ => Ok(Config::default()),
    }
}

/// Read and parse the config file at `path`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = toml::from_str::<Config>(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), "Loaded config");
    Ok(config)
}

/// Write `config` to the standard location and return where it went.
pub fn save_config(config: &Config) -> anyhow::Result<PathBuf> {
    use anyhow::Context as _;

    let path = config_file_path().context("no config directory for this platform")?;
    let dir = path.parent().unwrap_or(Path::new("."));
    std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;

    let rendered = toml::to_string_pretty(config)?;
    std::fs::write(&path, rendered).with_context(|| format!("writing {}", path.display()))?;
    tracing::info!(path = %path.display(), "Wrote config");
    Ok(path)
}

/// Determine the config file path (checking env var first, then standard dirs).
pub fn config_file_path() -> Option<PathBuf> {
    if let Ok(env_path) = std::env::var("EMLVIEW_CONFIG") {
        return Some(PathBuf::from(env_path));
    }

    dirs::config_dir().map(|d| d.join("emlview").join("config.toml"))
}

/// Return the cache directory used for logs.
pub fn cache_dir(config: &Config) -> PathBuf {
    if let Some(ref dir) = config.general.cache_dir {
        return dir.clone();
    }
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("emlview")
}

/// Return the log file path.
pub fn log_file_path(config: &Config) -> PathBuf {
    cache_dir(config).join("emlview.log")
}
