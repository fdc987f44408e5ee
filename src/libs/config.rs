//! Application configuration.
//!
//! Stored as pretty-printed JSON in `config.json` inside the data directory.
//! A missing file yields [`Config::default`]; missing sections inside an
//! existing file fall back to their own defaults.

use super::data_storage::DataStorage;
use crate::db::db::DB_FILE_NAME;
use crate::libs::messages::Message;
use crate::libs::vehicle::DEFAULT_REMINDER_FREQUENCY_DAYS;
use crate::msg_print;
use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, MultiSelect};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "config.json";
/// Full path of the database file; beats `storage.db_file`.
pub const DB_PATH_ENV: &str = "FUELBOOK_DB";

#[derive(Debug, Clone)]
pub struct ConfigModule {
    pub key: &'static str,
    pub name: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    /// File name inside the data directory, or an absolute path.
    pub db_file: String,
    /// `PRAGMA journal_mode = WAL` on open.
    pub wal: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            db_file: DB_FILE_NAME.to_string(),
            wal: true,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ReminderConfig {
    /// Used when a new vehicle does not state its own frequency.
    pub default_frequency_days: u32,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        ReminderConfig {
            default_frequency_days: DEFAULT_REMINDER_FREQUENCY_DAYS,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub storage: StorageConfig,
    pub reminders: ReminderConfig,
}

impl Config {
    pub fn read() -> Result<Config> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;

        if !config_file_path.exists() {
            return Ok(Config::default());
        }

        let config_str = fs::read_to_string(config_file_path)?;
        let config: Config = serde_json::from_str(&config_str)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;

        let config_file = File::create(config_file_path)?;
        serde_json::to_writer_pretty(&config_file, &self)?;
        tracing::debug!("configuration saved");
        Ok(())
    }

    /// Removes the config file. Returns `false` when there was none.
    pub fn delete() -> Result<bool> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        if !config_file_path.exists() {
            return Ok(false);
        }
        fs::remove_file(config_file_path)?;
        Ok(true)
    }

    /// Location of the SQLite file: `FUELBOOK_DB`, then `storage.db_file`.
    pub fn database_path(&self) -> Result<PathBuf> {
        if let Ok(path) = env::var(DB_PATH_ENV) {
            if !path.trim().is_empty() {
                return Ok(PathBuf::from(path));
            }
        }
        let configured = Path::new(&self.storage.db_file);
        if configured.is_absolute() {
            return Ok(configured.to_path_buf());
        }
        Ok(DataStorage::new().get_path(&self.storage.db_file)?)
    }

    /// Interactive wizard over the selected sections.
    pub fn init() -> Result<Self> {
        let mut config = Self::read().unwrap_or_default();

        let modules = [
            ConfigModule {
                key: "storage",
                name: Message::ConfigModuleStorage.to_string(),
            },
            ConfigModule {
                key: "reminders",
                name: Message::ConfigModuleReminders.to_string(),
            },
        ];

        let selected = MultiSelect::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptSelectModules.to_string())
            .items(&modules.iter().map(|module| &module.name).collect::<Vec<_>>())
            .interact()?;

        for &selection in &selected {
            match modules[selection].key {
                "storage" => {
                    msg_print!(Message::ConfigModuleStorage);
                    config.storage = StorageConfig {
                        db_file: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptDbFile.to_string())
                            .default(config.storage.db_file.clone())
                            .interact_text()?,
                        wal: Confirm::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptWal.to_string())
                            .default(config.storage.wal)
                            .interact()?,
                    };
                }
                "reminders" => {
                    msg_print!(Message::ConfigModuleReminders);
                    config.reminders = ReminderConfig {
                        default_frequency_days: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptDefaultFrequency.to_string())
                            .default(config.reminders.default_frequency_days)
                            .validate_with(|days: &u32| if *days > 0 { Ok(()) } else { Err("must be at least 1") })
                            .interact_text()?,
                    };
                }
                _ => {}
            }
        }

        Ok(config)
    }
}
