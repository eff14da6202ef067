use serde::Deserialize;
use std::{
    env, fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error;

use rankwise_types::ui::UiOptions;

use crate::session::UndoPolicy;

/// Environment variable overriding the config file location.
pub const CONFIG_PATH_ENV: &str = "RANKWISE_CONFIG";

/// `~/.rankwise/config.toml`
///
/// ```toml
/// [app]
/// ascii_only = false
/// high_contrast = false
///
/// [sort]
/// undo = "retry_step"
///
/// [output]
/// format = "text"
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RankwiseConfig {
    pub app: Option<AppConfig>,
    pub sort: Option<SortConfig>,
    pub output: Option<OutputConfig>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl ConfigError {
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    /// Use ASCII-only glyphs for icons and spinners.
    #[serde(default)]
    pub ascii_only: bool,
    /// Enable a high-contrast color palette.
    #[serde(default)]
    pub high_contrast: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct SortConfig {
    /// `"retry_step"` (default) or `"replay"`.
    #[serde(default)]
    pub undo: UndoPolicy,
}

/// How the final ranking is printed once the terminal is restored.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One item per line.
    #[default]
    Text,
    Json,
}

#[derive(Debug, Default, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

impl RankwiseConfig {
    /// Load from the default location. `Ok(None)` when there is no file.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        let Some(path) = config_path() else {
            return Ok(None);
        };
        if !path.exists() {
            return Ok(None);
        }
        Self::load_from(&path).map(Some)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| {
            tracing::warn!("Failed to read config at {:?}: {}", path, source);
            ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }
        })?;

        toml::from_str(&content).map_err(|source| {
            tracing::warn!("Failed to parse config at {:?}: {}", path, source);
            ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            }
        })
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }

    #[must_use]
    pub fn ui_options(&self) -> UiOptions {
        self.app
            .as_ref()
            .map(|app| UiOptions {
                ascii_only: app.ascii_only,
                high_contrast: app.high_contrast,
            })
            .unwrap_or_default()
    }

    #[must_use]
    pub fn undo_policy(&self) -> UndoPolicy {
        self.sort.as_ref().map(|sort| sort.undo).unwrap_or_default()
    }

    #[must_use]
    pub fn output_format(&self) -> OutputFormat {
        self.output
            .as_ref()
            .map(|output| output.format)
            .unwrap_or_default()
    }
}

pub fn config_path() -> Option<PathBuf> {
    if let Ok(raw) = env::var(CONFIG_PATH_ENV)
        && !raw.trim().is_empty()
    {
        return Some(PathBuf::from(raw));
    }
    dirs::home_dir().map(|home| home.join(".rankwise").join("config.toml"))
}
