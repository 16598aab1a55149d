//! Application configuration.
//!
//! Values come from an optional TOML file, then environment variables
//! (a `.env` file is loaded by the binary), then command-line flags.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::games::rps::PlayerName;

/// Selects the storage backend override.
pub const ENV_STORE: &str = "ROSHAMBO_STORE";
/// Directory holding the database and ledger files.
pub const ENV_DATA_DIR: &str = "DATA_DIR";
/// SQLite file name inside the data directory.
pub const ENV_DB_FILE: &str = "ROSHAMBO_DB_FILE";
/// Ledger file name inside the data directory.
pub const ENV_LEDGER_FILE: &str = "ROSHAMBO_LEDGER_FILE";
/// Name the bot plays under.
pub const ENV_BOT_NAME: &str = "ROSHAMBO_BOT_NAME";

/// Which history backend to use.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum StorageKind {
    /// Embedded SQLite database.
    #[default]
    Sqlite,
    /// Hash-chained append-only ledger file.
    Ledger,
    /// Process memory; history is lost on exit.
    Memory,
}

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct AppConfig {
    /// History backend.
    #[serde(default)]
    storage: StorageKind,

    /// Directory for database and ledger files.
    #[serde(default = "default_data_dir")]
    data_dir: PathBuf,

    /// SQLite database file name.
    #[serde(default = "default_database_file")]
    database_file: String,

    /// Ledger file name.
    #[serde(default = "default_ledger_file")]
    ledger_file: String,

    /// Name used for the automated opponent.
    #[serde(default = "default_bot_name")]
    bot_name: String,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_database_file() -> String {
    "roshambo.db".to_string()
}

fn default_ledger_file() -> String {
    "ledger.jsonl".to_string()
}

fn default_bot_name() -> String {
    "Bot".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage: StorageKind::default(),
            data_dir: default_data_dir(),
            database_file: default_database_file(),
            ledger_file: default_ledger_file(),
            bot_name: default_bot_name(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed, or if
    /// `bot_name` is not a valid player name.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.check_bot_name()?;

        info!(storage = %config.storage, "Config loaded successfully");
        Ok(config)
    }

    /// Loads the file (if any) and applies process environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file is unreadable or an override is invalid.
    #[instrument]
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let base = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        base.with_env(|key| std::env::var(key).ok())
    }

    /// Applies overrides looked up by environment variable name.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `ROSHAMBO_STORE` names an unknown backend or
    /// `ROSHAMBO_BOT_NAME` is not a valid player name.
    #[instrument(skip(self, lookup))]
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        if let Some(store) = lookup(ENV_STORE) {
            self.storage = StorageKind::from_str(store.trim()).map_err(|_| {
                ConfigError::new(format!("{} has unknown storage '{}'", ENV_STORE, store))
            })?;
        }
        if let Some(dir) = lookup(ENV_DATA_DIR) {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(file) = lookup(ENV_DB_FILE) {
            self.database_file = file;
        }
        if let Some(file) = lookup(ENV_LEDGER_FILE) {
            self.ledger_file = file;
        }
        if let Some(name) = lookup(ENV_BOT_NAME) {
            self.bot_name = name;
            self.check_bot_name()?;
        }
        debug!(storage = %self.storage, data_dir = %self.data_dir.display(), "Environment applied");
        Ok(self)
    }

    /// Replaces the storage backend.
    pub fn with_storage(mut self, storage: StorageKind) -> Self {
        self.storage = storage;
        self
    }

    /// Replaces the data directory.
    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    /// The bot sits in a player seat, so its name follows the player rules.
    fn check_bot_name(&self) -> Result<(), ConfigError> {
        PlayerName::parse(self.bot_name.as_str()).map_err(|e| {
            ConfigError::new(format!("bot name '{}' is invalid: {}", self.bot_name, e))
        })?;
        Ok(())
    }

    /// Full path of the SQLite database.
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(&self.database_file)
    }

    /// Full path of the ledger file.
    pub fn ledger_path(&self) -> PathBuf {
        self.data_dir.join(&self.ledger_file)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(*config.storage(), StorageKind::Sqlite);
        assert_eq!(config.database_path(), PathBuf::from("data/roshambo.db"));
        assert_eq!(config.ledger_path(), PathBuf::from("data/ledger.jsonl"));
        assert_eq!(config.bot_name(), "Bot");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: AppConfig = toml::from_str("storage = \"ledger\"\nbot_name = \"Hal\"").unwrap();
        assert_eq!(*config.storage(), StorageKind::Ledger);
        assert_eq!(config.bot_name(), "Hal");
        assert_eq!(config.database_file(), "roshambo.db");
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("roshambo.toml");
        std::fs::write(&path, "data_dir = \"/var/lib/rps\"\nstorage = \"memory\"\n").unwrap();
        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(*config.storage(), StorageKind::Memory);
        assert_eq!(config.database_path(), PathBuf::from("/var/lib/rps/roshambo.db"));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(AppConfig::from_file("/definitely/not/here.toml").is_err());
    }

    #[test]
    fn test_env_overrides() {
        let config = AppConfig::default()
            .with_env(env(&[
                (ENV_STORE, "Ledger"),
                (ENV_DATA_DIR, "/tmp/rps"),
                (ENV_LEDGER_FILE, "chain.jsonl"),
                (ENV_BOT_NAME, "Robo"),
            ]))
            .unwrap();
        assert_eq!(*config.storage(), StorageKind::Ledger);
        assert_eq!(config.ledger_path(), PathBuf::from("/tmp/rps/chain.jsonl"));
        assert_eq!(config.bot_name(), "Robo");
    }

    #[test]
    fn test_unknown_store_rejected() {
        let result = AppConfig::default().with_env(env(&[(ENV_STORE, "postgres")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_bot_name_from_env_rejected() {
        for bad in ["", "Draw", "SixteenCharName!"] {
            let result = AppConfig::default().with_env(env(&[(ENV_BOT_NAME, bad)]));
            assert!(result.is_err(), "bot name {bad:?} accepted");
        }
    }

    #[test]
    fn test_invalid_bot_name_from_file_rejected() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("roshambo.toml");
        std::fs::write(&path, "bot_name = \"draw\"\n").unwrap();
        let err = AppConfig::from_file(&path).unwrap_err();
        assert!(err.message.contains("bot name"));
    }

    #[test]
    fn test_builder_overrides() {
        let config = AppConfig::default()
            .with_storage(StorageKind::Memory)
            .with_data_dir("elsewhere");
        assert_eq!(*config.storage(), StorageKind::Memory);
        assert_eq!(config.data_dir(), &PathBuf::from("elsewhere"));
    }
}
