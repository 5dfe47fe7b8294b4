use crate::{CliError, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use vultr_api::{mask_key, API_KEY_ENV};

/// Keys accepted by `config get/set/unset`
pub const CONFIG_KEYS: &[&str] = &["api.api_key", "api.base_url"];

/// Configuration-specific errors that can occur during config operations
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Unknown config key: {0} (expected one of: api.api_key, api.base_url)")]
    UnknownKey(String),

    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    #[error("Config directory creation failed: {0}")]
    DirectoryCreationFailed(String),

    #[error("TOML parsing error: {0}")]
    TomlError(String),
}

/// `[api]` section of the config file
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ApiSection {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
}

impl ApiSection {
    fn is_empty(&self) -> bool {
        self.api_key.is_none() && self.base_url.is_none()
    }
}

/// On-disk layout of `~/.vultr/config.toml`
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ConfigData {
    pub api: Option<ApiSection>,
}

/// Lets the API client read its key and base URL from the CLI config
impl vultr_api::ApiConfig for Config {
    type Error = CliError;

    fn get_api_key(&self) -> std::result::Result<String, Self::Error> {
        self.get_api_key()?.ok_or_else(|| {
            CliError::Config(ConfigError::MissingField(format!(
                "api.api_key (run `vultr config set api.api_key <KEY>` or set {})",
                API_KEY_ENV
            )))
        })
    }

    fn get_base_url(&self) -> std::result::Result<Option<String>, Self::Error> {
        Ok(self.data.api.as_ref().and_then(|api| api.base_url.clone()))
    }
}

/// Configuration manager that handles loading, saving, and accessing configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub config_path: PathBuf,
    pub data: ConfigData,
}

impl Config {
    /// Load `~/.vultr/config.toml`, or start empty if it does not exist yet
    pub fn new() -> Result<Self> {
        let config_path = get_config_dir()?.join("config.toml");
        Self::load_from(config_path)
    }

    /// Load the config stored at `config_path`
    pub fn load_from(config_path: PathBuf) -> Result<Self> {
        let data = if config_path.exists() {
            debug!("Loading config from {}", config_path.display());
            let content = fs::read_to_string(&config_path).map_err(CliError::Io)?;
            toml::from_str(&content).map_err(|e| ConfigError::TomlError(e.to_string()))?
        } else {
            debug!("No config at {}, using defaults", config_path.display());
            ConfigData::default()
        };

        Ok(Config { config_path, data })
    }

    /// Save the configuration to file with atomic write
    pub fn save(&self) -> Result<()> {
        let content = toml::to_string_pretty(&self.data)
            .map_err(|e| ConfigError::TomlError(e.to_string()))?;

        if let Some(parent) = self.config_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)
                    .map_err(|e| ConfigError::DirectoryCreationFailed(e.to_string()))?;
            }
        }

        // Write to a temporary file first, then rename
        let temp_path = self.config_path.with_extension("tmp");
        write_private(&temp_path, content.as_bytes()).map_err(CliError::Io)?;
        fs::rename(&temp_path, &self.config_path).map_err(CliError::Io)?;

        debug!("Saved config to {}", self.config_path.display());
        Ok(())
    }

    /// Get the API key, checking the environment variable first
    pub fn get_api_key(&self) -> Result<Option<String>> {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                debug!("Using API key from {}", API_KEY_ENV);
                return Ok(Some(key));
            }
        }

        Ok(self.file_api_key())
    }

    /// API key stored in the config file, ignoring the environment
    pub fn file_api_key(&self) -> Option<String> {
        self.data.api.as_ref().and_then(|api| api.api_key.clone())
    }

    /// Read a value by dotted key
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let api = self.data.api.as_ref();
        match key {
            "api.api_key" => Ok(api.and_then(|api| api.api_key.clone())),
            "api.base_url" => Ok(api.and_then(|api| api.base_url.clone())),
            _ => Err(ConfigError::UnknownKey(key.to_string()).into()),
        }
    }

    /// Set a value by dotted key
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        if value.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: key.to_string(),
                value: value.to_string(),
            }
            .into());
        }

        match key {
            "api.api_key" => self.api_section().api_key = Some(value.to_string()),
            "api.base_url" => {
                url::Url::parse(value).map_err(|_| ConfigError::InvalidValue {
                    field: key.to_string(),
                    value: value.to_string(),
                })?;
                self.api_section().base_url = Some(value.to_string());
            }
            _ => return Err(ConfigError::UnknownKey(key.to_string()).into()),
        }
        Ok(())
    }

    /// Remove a value by dotted key. Returns whether it was set.
    pub fn unset(&mut self, key: &str) -> Result<bool> {
        if !CONFIG_KEYS.contains(&key) {
            return Err(ConfigError::UnknownKey(key.to_string()).into());
        }

        let Some(api) = self.data.api.as_mut() else {
            return Ok(false);
        };
        let removed = match key {
            "api.api_key" => api.api_key.take(),
            _ => api.base_url.take(),
        };
        if api.is_empty() {
            self.data.api = None;
        }
        Ok(removed.is_some())
    }

    /// Show all configuration as TOML, with the API key masked
    pub fn show_config(&self) -> String {
        let mut data = self.data.clone();
        if let Some(api) = data.api.as_mut() {
            api.api_key = api.api_key.as_deref().map(mask_key);
        }
        toml::to_string_pretty(&data).unwrap_or_else(|_| "Error formatting config".to_string())
    }

    fn api_section(&mut self) -> &mut ApiSection {
        self.data.api.get_or_insert_with(ApiSection::default)
    }
}

/// Gets the path to the configuration directory (`~/.vultr`)
fn get_config_dir() -> Result<PathBuf> {
    let home_dir = home::home_dir().ok_or_else(|| {
        ConfigError::DirectoryCreationFailed("Could not find home directory".to_string())
    })?;

    Ok(home_dir.join(".vultr"))
}

// The file holds an API key
#[cfg(unix)]
fn write_private(path: &Path, content: &[u8]) -> std::io::Result<()> {
    use std::io::Write;
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    // mode only applies on creation; a stale temp file keeps its old bits
    file.set_permissions(fs::Permissions::from_mode(0o600))?;
    file.write_all(content)?;
    file.sync_all()
}

#[cfg(not(unix))]
fn write_private(path: &Path, content: &[u8]) -> std::io::Result<()> {
    fs::write(path, content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_config(dir: &TempDir) -> Config {
        Config::load_from(dir.path().join("vultr").join("config.toml")).unwrap()
    }

    #[test]
    fn test_missing_file_loads_defaults() {
        let dir = TempDir::new().unwrap();
        let config = temp_config(&dir);
        assert_eq!(config.data, ConfigData::default());
        assert!(config.file_api_key().is_none());
    }

    #[test]
    fn test_set_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let mut config = temp_config(&dir);
        config.set("api.api_key", "EXAMPLEKEY1234567890").unwrap();
        config.set("api.base_url", "http://localhost:8080/v1/").unwrap();
        config.save().unwrap();

        let reloaded = Config::load_from(config.config_path.clone()).unwrap();
        assert_eq!(reloaded.file_api_key().as_deref(), Some("EXAMPLEKEY1234567890"));
        assert_eq!(
            reloaded.get("api.base_url").unwrap().as_deref(),
            Some("http://localhost:8080/v1/")
        );
        assert!(!config.config_path.with_extension("tmp").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_saved_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let mut config = temp_config(&dir);
        config.set("api.api_key", "EXAMPLEKEY1234567890").unwrap();

        // leftover temp file from an interrupted save, world readable
        fs::create_dir_all(config.config_path.parent().unwrap()).unwrap();
        let temp_path = config.config_path.with_extension("tmp");
        fs::write(&temp_path, "stale").unwrap();
        fs::set_permissions(&temp_path, fs::Permissions::from_mode(0o644)).unwrap();

        config.save().unwrap();

        let mode = fs::metadata(&config.config_path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert!(!temp_path.exists());
    }

    #[test]
    fn test_unset() {
        let dir = TempDir::new().unwrap();
        let mut config = temp_config(&dir);
        config.set("api.api_key", "KEY").unwrap();

        assert!(config.unset("api.api_key").unwrap());
        assert!(!config.unset("api.api_key").unwrap());
        assert!(config.data.api.is_none());
    }

    #[test]
    fn test_rejects_unknown_keys_and_bad_values() {
        let dir = TempDir::new().unwrap();
        let mut config = temp_config(&dir);

        assert!(matches!(
            config.set("ssh.user", "root"),
            Err(CliError::Config(ConfigError::UnknownKey(_)))
        ));
        assert!(matches!(
            config.set("api.base_url", "not a url"),
            Err(CliError::Config(ConfigError::InvalidValue { .. }))
        ));
        assert!(config.set("api.api_key", "  ").is_err());
        assert!(config.get("api.region").is_err());
        assert!(config.unset("api.region").is_err());
    }

    #[test]
    fn test_show_config_masks_key() {
        let dir = TempDir::new().unwrap();
        let mut config = temp_config(&dir);
        config.set("api.api_key", "EXAMPLEKEY1234567890").unwrap();

        let shown = config.show_config();
        assert!(shown.contains("EXAM...7890"));
        assert!(!shown.contains("EXAMPLEKEY1234567890"));
    }

    #[test]
    fn test_invalid_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "api = [").unwrap();

        assert!(matches!(
            Config::load_from(path),
            Err(CliError::Config(ConfigError::TomlError(_)))
        ));
    }
}
