//! Settings file for the studio CLI.
//!
//! Settings live in the platform config folder:
//! - macOS: ~/Library/Application Support/dev.proto-studio.Prototype-Studio/
//! - Windows: %APPDATA%/proto-studio/Prototype Studio/config/
//! - Linux: ~/.config/prototypestudio/
//!
//! Every key is optional.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::logging::LogFormat;

const APP_QUALIFIER: &str = "dev";
const APP_ORG: &str = "proto-studio";
const APP_NAME: &str = "Prototype Studio";
const CONFIG_FILENAME: &str = "settings.toml";
const LIBRARY_FILENAME: &str = "saved-components.json";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub library: LibrarySettings,
    pub editor: EditorSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// Bucket file for saved compositions.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// Prefix for generated component ids.
    pub id_prefix: String,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            id_prefix: "comp".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Used when `--log-format` is not given.
    pub format: Option<LogFormat>,
}

impl Settings {
    /// Library bucket: the configured path, else the platform data folder,
    /// else the working directory.
    pub fn library_path(&self) -> PathBuf {
        self.library.path.clone().unwrap_or_else(|| {
            project_dirs().map_or_else(
                || PathBuf::from(LIBRARY_FILENAME),
                |dirs| dirs.data_dir().join(LIBRARY_FILENAME),
            )
        })
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
}

/// Default location of the settings file.
///
/// Returns `None` if the platform-specific directory cannot be determined.
pub fn settings_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILENAME))
}

/// Load settings.
///
/// An explicit path must exist and parse. The default file may be absent
/// or broken; defaults are used then.
pub fn load_settings(explicit: Option<&Path>) -> Result<Settings> {
    if let Some(path) = explicit {
        let content = fs::read_to_string(path)
            .with_context(|| format!("read settings file {}", path.display()))?;
        let settings = toml::from_str(&content)
            .with_context(|| format!("parse settings file {}", path.display()))?;
        tracing::info!("Loaded settings from {}", path.display());
        return Ok(settings);
    }

    let Some(path) = settings_path() else {
        tracing::warn!("Could not determine settings path, using defaults");
        return Ok(Settings::default());
    };

    match fs::read_to_string(&path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(settings) => {
                tracing::info!("Loaded settings from {}", path.display());
                Ok(settings)
            }
            Err(e) => {
                tracing::warn!("Failed to parse settings file: {}, using defaults", e);
                Ok(Settings::default())
            }
        },
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No settings file at {}, using defaults", path.display());
            Ok(Settings::default())
        }
        Err(e) => {
            tracing::warn!("Failed to read settings file: {}, using defaults", e);
            Ok(Settings::default())
        }
    }
}
