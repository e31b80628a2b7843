//! Settings persistence.
//!
//! Handles loading and saving the snap configuration from/to the platform
//! configuration directory, plus explicit export/import to user-chosen
//! files. The on-disk format is JSON by default; a `.toml` extension selects
//! TOML for loading. Failed loads leave in-memory state untouched.

use crate::config::SnapConfig;
use crate::error::{ConfigError, SettingsError, SettingsResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Application directory name under the platform config dir.
const APP_DIR: &str = "modelshop";

/// Default configuration file name.
const CONFIG_FILE: &str = "snap.json";

/// Envelope written by [`SettingsPersistence::export_to`].
#[derive(Debug, Serialize, Deserialize)]
struct ExportEnvelope {
    /// When the export was produced.
    exported_at: chrono::DateTime<chrono::Utc>,
    /// Version of the application that produced it.
    app_version: String,
    /// The configuration payload (on-disk JSON layout).
    config: serde_json::Value,
}

/// Settings persistence layer
#[derive(Debug, Clone)]
pub struct SettingsPersistence {
    path: PathBuf,
}

impl SettingsPersistence {
    /// Creates a persistence layer for the default platform path.
    pub fn new() -> SettingsResult<Self> {
        Ok(Self {
            path: Self::default_config_path()?,
        })
    }

    /// Creates a persistence layer for an explicit file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The file this layer reads and writes.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Platform default: `<config_dir>/modelshop/snap.json`.
    pub fn default_config_path() -> SettingsResult<PathBuf> {
        let base = dirs::config_dir().ok_or_else(|| {
            SettingsError::ConfigDirectory("No platform config directory available".to_string())
        })?;
        Ok(base.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Loads the configuration from this layer's path.
    ///
    /// Returns an error (leaving the caller's state untouched) when the file
    /// is missing or corrupt; individual bad zones inside a parseable file
    /// are skipped with a warning instead.
    pub fn load(&self) -> SettingsResult<SnapConfig> {
        Self::load_from_file(&self.path)
    }

    /// Loads a configuration from an arbitrary file, format by extension.
    pub fn load_from_file(path: &Path) -> SettingsResult<SnapConfig> {
        let text = fs::read_to_string(path)
            .map_err(|e| SettingsError::LoadError(format!("{}: {}", path.display(), e)))?;
        let config = match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => SnapConfig::from_toml_str(&text)?,
            Some("json") | None => SnapConfig::from_json_str(&text)?,
            Some(other) => {
                return Err(ConfigError::UnsupportedFormat(other.to_string()).into());
            }
        };
        tracing::debug!(
            "Loaded snap configuration from {} ({} zones)",
            path.display(),
            config.zones().len()
        );
        Ok(config)
    }

    /// Saves the configuration to this layer's path, creating parent dirs.
    pub fn save(&self, config: &SnapConfig) -> SettingsResult<()> {
        Self::save_to_file(&self.path, config)
    }

    /// Saves a configuration to an arbitrary path as pretty JSON.
    pub fn save_to_file(path: &Path, config: &SnapConfig) -> SettingsResult<()> {
        config.validate()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| SettingsError::SaveError(format!("{}: {}", parent.display(), e)))?;
        }
        fs::write(path, config.to_json_string()?)
            .map_err(|e| SettingsError::SaveError(format!("{}: {}", path.display(), e)))?;
        tracing::debug!("Saved snap configuration to {}", path.display());
        Ok(())
    }

    /// Exports the configuration to a user-chosen file with metadata.
    pub fn export_to(&self, path: &Path, config: &SnapConfig) -> SettingsResult<()> {
        config.validate()?;
        let envelope = ExportEnvelope {
            exported_at: chrono::Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            config: config.to_json_value(),
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| SettingsError::SaveError(format!("{}: {}", parent.display(), e)))?;
        }
        fs::write(path, serde_json::to_string_pretty(&envelope)?)
            .map_err(|e| SettingsError::SaveError(format!("{}: {}", path.display(), e)))?;
        Ok(())
    }

    /// Imports a configuration from a user-chosen file.
    ///
    /// Accepts both the export envelope and a bare configuration file.
    pub fn import_from(&self, path: &Path) -> SettingsResult<SnapConfig> {
        let text = fs::read_to_string(path)
            .map_err(|e| SettingsError::LoadError(format!("{}: {}", path.display(), e)))?;
        let value: serde_json::Value = serde_json::from_str(&text)?;
        let payload = match value.get("config") {
            Some(inner) if value.get("exported_at").is_some() => inner.clone(),
            _ => value,
        };
        SnapConfig::from_json_value(payload)
    }
}
