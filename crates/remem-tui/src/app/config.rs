//! TUI configuration persistence
//!
//! Loads user preferences: where the credential store lives, what the
//! simulated fingerprint reader reports, and display options.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Configuration file name
const CONFIG_FILE_NAME: &str = "config.json";

/// Directory name under the config and data dirs
const APP_DIR_NAME: &str = "remem";

/// Credential store file name
const STORE_FILE_NAME: &str = "secure-store.json";

/// Log file name
const LOG_FILE_NAME: &str = "remem.log";

/// TUI configuration that persists across sessions
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TuiConfig {
    /// Credential store location (defaults to the data dir)
    #[serde(default)]
    pub store_path: Option<PathBuf>,

    /// What the fingerprint reader reports
    #[serde(default)]
    pub biometrics: BiometricConfig,

    /// Force screen reader mode on or off (unset: read the environment)
    #[serde(default)]
    pub screen_reader: Option<bool>,

    /// Use the high contrast palette
    #[serde(default)]
    pub high_contrast: bool,
}

/// Simulated fingerprint reader capabilities
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct BiometricConfig {
    /// A reader is present
    #[serde(default = "default_true")]
    pub hardware: bool,

    /// A fingerprint is enrolled
    #[serde(default = "default_true")]
    pub enrolled: bool,
}

fn default_true() -> bool {
    true
}

impl Default for BiometricConfig {
    fn default() -> Self {
        Self {
            hardware: true,
            enrolled: true,
        }
    }
}

impl TuiConfig {
    /// Get the configuration directory path
    pub fn config_dir() -> Option<PathBuf> {
        // Try XDG_CONFIG_HOME first, then fall back to ~/.config
        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            return Some(PathBuf::from(xdg_config).join(APP_DIR_NAME));
        }

        dirs::config_dir().map(|p| p.join(APP_DIR_NAME))
    }

    /// Get the full config file path
    pub fn config_file_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join(CONFIG_FILE_NAME))
    }

    /// Get the data directory path
    pub fn data_dir() -> Option<PathBuf> {
        if let Ok(xdg_data) = std::env::var("XDG_DATA_HOME") {
            return Some(PathBuf::from(xdg_data).join(APP_DIR_NAME));
        }

        dirs::data_dir().map(|p| p.join(APP_DIR_NAME))
    }

    /// Load configuration from the default location
    ///
    /// Returns default configuration if the file doesn't exist or can't be parsed.
    pub fn load() -> Self {
        match Self::config_file_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load configuration from `path`, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                tracing::warn!("Failed to parse config file: {}", e);
                Self::default()
            }),
            Err(e) => {
                tracing::warn!("Failed to read config file: {}", e);
                Self::default()
            }
        }
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<PathBuf, ConfigError> {
        let path = Self::config_file_path().ok_or(ConfigError::NoConfigDir)?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save configuration to `path`
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| ConfigError::Io(e.to_string()))?;
            }
        }

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;

        fs::write(path, contents).map_err(|e| ConfigError::Io(e.to_string()))?;

        tracing::debug!("Saved config to {:?}", path);
        Ok(())
    }

    /// Where the credential store lives
    pub fn store_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(path) = &self.store_path {
            return Ok(path.clone());
        }
        Self::data_dir()
            .map(|d| d.join(STORE_FILE_NAME))
            .ok_or(ConfigError::NoDataDir)
    }

    /// Default log file location
    pub fn default_log_path() -> Option<PathBuf> {
        Self::data_dir().map(|d| d.join(LOG_FILE_NAME))
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Could not determine data directory")]
    NoDataDir,

    #[error("IO error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialize(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = TuiConfig::default();
        assert!(config.store_path.is_none());
        assert!(config.biometrics.hardware);
        assert!(config.biometrics.enrolled);
        assert!(config.screen_reader.is_none());
        assert!(!config.high_contrast);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: TuiConfig =
            serde_json::from_str(r#"{ "biometrics": { "enrolled": false } }"#).unwrap();
        assert!(config.biometrics.hardware);
        assert!(!config.biometrics.enrolled);
        assert!(!config.high_contrast);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);

        let config = TuiConfig {
            store_path: Some(dir.path().join("store.json")),
            biometrics: BiometricConfig {
                hardware: true,
                enrolled: false,
            },
            screen_reader: Some(true),
            high_contrast: true,
        };
        config.save_to(&path).unwrap();

        assert_eq!(TuiConfig::load_from(&path), config);
    }

    #[test]
    fn test_missing_or_corrupt_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        assert_eq!(TuiConfig::load_from(&path), TuiConfig::default());

        fs::write(&path, "{ not json").unwrap();
        assert_eq!(TuiConfig::load_from(&path), TuiConfig::default());
    }

    #[test]
    fn test_explicit_store_path_wins() {
        let config = TuiConfig {
            store_path: Some(PathBuf::from("/tmp/remem/store.json")),
            ..TuiConfig::default()
        };
        assert_eq!(
            config.store_path().unwrap(),
            PathBuf::from("/tmp/remem/store.json")
        );
    }

    #[derive(Clone, Default)]
    struct Captured(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_corrupt_file_is_logged() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "{ not json").unwrap();

        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let config = tracing::subscriber::with_default(subscriber, || TuiConfig::load_from(&path));
        assert_eq!(config, TuiConfig::default());

        let logged = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(logged.contains("Failed to parse config file"));
    }
}
