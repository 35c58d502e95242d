//! Bootstrap configuration loading
//!
//! Settings are resolved in priority order:
//! 1. Command-line arguments / environment variables (handled by the CLI)
//! 2. TOML config file
//! 3. Compiled defaults
//!
//! The TOML file is optional. A missing file at the default location is not an
//! error; a missing file that was named explicitly is.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Application directory name under the platform config dir
pub const APP_DIR_NAME: &str = "tunefetch";

/// Config file name inside [`APP_DIR_NAME`]
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Bootstrap configuration loaded from TOML
///
/// Every run-level field is optional so that command-line values can take
/// precedence and compiled defaults can fill the rest.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    /// Destination directory for downloaded tracks
    #[serde(default)]
    pub output_dir: Option<PathBuf>,

    /// Number of concurrent workers
    #[serde(default)]
    pub threads: Option<usize>,

    /// Number of results requested for artist entries
    #[serde(default)]
    pub top: Option<usize>,

    /// Ignore the existing library when deciding what to download
    #[serde(default)]
    pub force: Option<bool>,

    /// File extensions counted as already-downloaded tracks
    #[serde(default)]
    pub audio_extensions: Option<Vec<String>>,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// yt-dlp adapter configuration
    #[serde(default)]
    pub ytdlp: YtDlpConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// yt-dlp adapter configuration
#[derive(Debug, Clone, Deserialize)]
pub struct YtDlpConfig {
    /// Binary name or path
    #[serde(default = "default_ytdlp_binary")]
    pub binary: String,

    /// Target audio codec passed to `--audio-format`
    #[serde(default = "default_audio_format")]
    pub audio_format: String,

    /// Target quality passed to `--audio-quality`
    #[serde(default = "default_audio_quality")]
    pub audio_quality: String,
}

impl Default for YtDlpConfig {
    fn default() -> Self {
        Self {
            binary: default_ytdlp_binary(),
            audio_format: default_audio_format(),
            audio_quality: default_audio_quality(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_ytdlp_binary() -> String {
    "yt-dlp".to_string()
}

fn default_audio_format() -> String {
    "mp3".to_string()
}

fn default_audio_quality() -> String {
    "192K".to_string()
}

impl TomlConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))
    }

    /// Load configuration from a specific file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Read config {} failed: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Resolve and load the bootstrap configuration
    ///
    /// An explicit path must exist. Without one, the platform default location
    /// is tried and compiled defaults are used when nothing is there.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            info!("Loading config from {}", path.display());
            return Self::load(path);
        }

        match default_config_path() {
            Some(path) if path.exists() => {
                info!("Loading config from {}", path.display());
                Self::load(&path)
            }
            Some(path) => {
                debug!("No config file at {}, using defaults", path.display());
                Ok(Self::default())
            }
            None => {
                debug!("Could not determine config directory, using defaults");
                Ok(Self::default())
            }
        }
    }
}

/// Platform default config file location (`<config_dir>/tunefetch/config.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
}
