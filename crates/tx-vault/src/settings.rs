//! Vault settings management
//!
//! Non-sensitive configuration lives in a plain `settings.json` in the data
//! directory. The master key is never written there; it is provisioned through
//! the `MASTER_KEY` environment variable.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use zeroize::Zeroizing;

use crate::error::{Result, VaultError};

/// Environment variable holding the hex master key
pub const MASTER_KEY_ENV: &str = "MASTER_KEY";

const SETTINGS_VERSION: u32 = 1;

/// Application settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Settings file version
    pub version: u32,
    /// Directory for the record store (defaults to the settings directory)
    pub record_dir: Option<PathBuf>,
    /// Default tracing filter directive, e.g. `info` or `tx_vault=debug`
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: SETTINGS_VERSION,
            record_dir: None,
            log_filter: "info".to_string(),
        }
    }
}

/// Settings manager
pub struct SettingsManager {
    settings_file: PathBuf,
    settings: Settings,
}

impl SettingsManager {
    /// Create a new settings manager, loading `settings.json` if present
    pub fn new(storage_dir: &Path) -> Result<Self> {
        let settings_file = storage_dir.join("settings.json");
        let settings = Self::load_from_file(&settings_file)?;

        Ok(Self {
            settings_file,
            settings,
        })
    }

    fn load_from_file(path: &Path) -> Result<Settings> {
        if !path.exists() {
            debug!("No settings file found, using defaults");
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&contents)
            .map_err(|e| VaultError::ConfigError(format!("{:?}: {}", path, e)))?;

        if settings.version != SETTINGS_VERSION {
            return Err(VaultError::ConfigError(format!(
                "{:?}: unsupported settings version {}",
                path, settings.version
            )));
        }

        debug!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    /// Save settings to file
    pub async fn save(&self) -> Result<()> {
        let contents = serde_json::to_string_pretty(&self.settings)?;

        if let Some(parent) = self.settings_file.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        // Write atomically using temp file
        let temp_path = self.settings_file.with_extension("tmp");
        tokio::fs::write(&temp_path, &contents).await?;
        tokio::fs::rename(&temp_path, &self.settings_file).await?;

        debug!("Saved settings to {:?}", self.settings_file);
        Ok(())
    }

    /// Get current settings
    pub fn get(&self) -> &Settings {
        &self.settings
    }

    /// Get mutable settings
    pub fn get_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// Directory the record store should use
    pub fn record_dir(&self) -> PathBuf {
        match &self.settings.record_dir {
            Some(dir) => dir.clone(),
            None => self
                .settings_file
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default(),
        }
    }
}

/// Warn when a master key is missing or not 64 hex characters
///
/// Returns whether the key looks well-formed. Only a warning is logged; the
/// envelope core rejects a bad key when it is actually used.
pub fn check_master_key_format(key: &str) -> bool {
    let well_formed = key.len() == 64 && key.bytes().all(|b| b.is_ascii_hexdigit());

    if !well_formed {
        warn!(
            "Master key ({} or --master-key) not set or invalid. Must be 64 hex characters (32 bytes)",
            MASTER_KEY_ENV
        );
    }

    well_formed
}

/// Read the hex master key from `MASTER_KEY`, warning if it is malformed
pub fn master_key_from_env() -> Zeroizing<String> {
    let key = Zeroizing::new(std::env::var(MASTER_KEY_ENV).unwrap_or_default());
    check_master_key_format(&key);
    key
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_settings_default() {
        let temp_dir = TempDir::new().unwrap();
        let manager = SettingsManager::new(temp_dir.path()).unwrap();

        assert_eq!(manager.get(), &Settings::default());
        assert_eq!(manager.record_dir(), temp_dir.path());
    }

    #[tokio::test]
    async fn test_settings_persistence() {
        let temp_dir = TempDir::new().unwrap();
        let records = temp_dir.path().join("records");

        {
            let mut manager = SettingsManager::new(temp_dir.path()).unwrap();
            manager.get_mut().record_dir = Some(records.clone());
            manager.get_mut().log_filter = "tx_vault=debug".to_string();
            manager.save().await.unwrap();
        }

        {
            let manager = SettingsManager::new(temp_dir.path()).unwrap();
            assert_eq!(manager.record_dir(), records);
            assert_eq!(manager.get().log_filter, "tx_vault=debug");
        }
    }

    #[test]
    fn test_partial_settings_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join("settings.json"),
            r#"{"logFilter": "warn"}"#,
        )
        .unwrap();

        let manager = SettingsManager::new(temp_dir.path()).unwrap();
        assert_eq!(manager.get().log_filter, "warn");
        assert_eq!(manager.get().version, 1);
        assert!(manager.get().record_dir.is_none());
    }

    #[test]
    fn test_corrupt_settings_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("settings.json"), "{not json").unwrap();

        assert!(matches!(
            SettingsManager::new(temp_dir.path()),
            Err(VaultError::ConfigError(_))
        ));
    }

    #[test]
    fn test_unknown_settings_version_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join("settings.json"),
            r#"{"version": 2, "logFilter": "warn"}"#,
        )
        .unwrap();

        assert!(matches!(
            SettingsManager::new(temp_dir.path()),
            Err(VaultError::ConfigError(_))
        ));
    }

    #[test]
    fn test_master_key_format_check() {
        assert!(check_master_key_format(&"ab".repeat(32)));
        assert!(check_master_key_format(&"AB".repeat(32)));

        assert!(!check_master_key_format(""));
        assert!(!check_master_key_format("abcd"));
        assert!(!check_master_key_format(&"a".repeat(32)));
        assert!(!check_master_key_format(&"g".repeat(64)));
    }

    #[test]
    fn test_master_key_from_env() {
        let key = "cd".repeat(32);
        std::env::set_var(MASTER_KEY_ENV, &key);
        assert_eq!(master_key_from_env().as_str(), key);

        std::env::remove_var(MASTER_KEY_ENV);
        assert!(master_key_from_env().is_empty());
    }
}
