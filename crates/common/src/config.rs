//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{SlidershowError, SlidershowResult};

/// Player script embedded by the built-in page skeleton.
pub const DEFAULT_SLIDERSHOW_URL: &str =
    "https://cdn.jsdelivr.net/gh/CZ-NIC/slidershow@0.9.6/slidershow/slidershow.js";

/// Global application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Browser-compatibility conversion of media files.
    pub convert: ConvertConfig,

    /// Page template settings.
    pub page: PageConfig,

    /// Filename rewriting and lookup.
    pub filenames: FilenameConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Auto-convert settings for browser-compatible formats.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    /// Consult the cache for media that needs conversion.
    pub enable: bool,

    /// When enabled, generate missing cache entries on demand.
    /// Otherwise the cache is only consulted.
    pub autogenerate: bool,

    /// Probe `.mp4` files and convert those carrying HEVC video.
    pub check_mp4_for_hevc: bool,

    /// Directory holding converted copies.
    pub cache_dir: PathBuf,
}

/// Page template settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    /// Template file with a `{contents}` placeholder. Built-in skeleton if unset.
    pub template: Option<PathBuf>,

    /// URL of the slidershow player script, substituted for `{slidershow_url}`.
    pub slidershow_url: String,
}

/// Filename rewriting applied to the sheet's filename column.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FilenameConfig {
    /// Substring replacements applied in order, e.g. `("/mnt/user", "/mnt/foo")`.
    pub replace: Vec<(String, String)>,

    /// Directories searched recursively for bare filenames that do not exist.
    pub search_dirs: Vec<PathBuf>,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "slidershow_timeline=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            enable: false,
            autogenerate: true,
            check_mp4_for_hevc: true,
            cache_dir: PathBuf::from("/tmp"),
        }
    }
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            template: None,
            slidershow_url: DEFAULT_SLIDERSHOW_URL.to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&config_file_path())
    }

    /// Load config from `path`, falling back to defaults when it is absent or invalid.
    pub fn load_from(path: &Path) -> Self {
        if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", path, e);
                }
            }
        }
        Self::default()
    }

    /// Reject settings that cannot produce a sensible page.
    pub fn validate(&self) -> SlidershowResult<()> {
        if let Some((from, _)) = self.filenames.replace.iter().find(|(from, _)| from.is_empty()) {
            return Err(SlidershowError::config(format!(
                "Filename replacement with empty pattern {from:?}"
            )));
        }
        if self.convert.enable && self.convert.cache_dir.as_os_str().is_empty() {
            return Err(SlidershowError::config(
                "Conversion is enabled but no cache directory is set",
            ));
        }
        if self.page.slidershow_url.trim().is_empty() {
            return Err(SlidershowError::config("Empty slidershow_url"));
        }
        Ok(())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("slidershow").join("config.json")
}
