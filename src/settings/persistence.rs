//! Persistence backends for setting values
//!
//! The store never touches disk itself; the host loads a [`PersistedValues`]
//! map before declaration and saves the store's snapshot after edits.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::store::PersistedValues;
use super::value::SettingValue;

/// Host settings-persistence service
pub trait SettingsPersistence {
    fn load(&self) -> Result<PersistedValues>;

    fn save(&self, values: &PersistedValues) -> Result<()>;
}

/// On-disk layout of the settings file
#[derive(Debug, Default, Serialize, Deserialize)]
struct SettingsFile {
    #[serde(default)]
    settings: PersistedValues,
}

/// Settings file as read back, before each entry is checked on its own
#[derive(Debug, Deserialize)]
struct RawSettingsFile {
    #[serde(default)]
    settings: BTreeMap<String, toml::Value>,
}

fn setting_value(raw: toml::Value) -> Option<SettingValue> {
    match raw {
        toml::Value::Boolean(b) => Some(SettingValue::Bool(b)),
        toml::Value::Integer(i) => Some(SettingValue::Int(i)),
        toml::Value::Float(f) => Some(SettingValue::Float(f)),
        toml::Value::String(s) => Some(SettingValue::Choice(s)),
        _ => None,
    }
}

/// TOML file backend
#[derive(Debug, Clone)]
pub struct TomlFileStore {
    path: PathBuf,
}

impl TomlFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the platform config directory
    pub fn at_default_path() -> Self {
        Self::new(Self::default_path())
    }

    pub fn default_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(crate::constants::config::APP_DIR);
        path.push(crate::constants::config::FILENAME);
        path
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsPersistence for TomlFileStore {
    /// Missing file means a fresh environment: nothing persisted yet
    fn load(&self) -> Result<PersistedValues> {
        if !self.path.exists() {
            info!(path = %self.path.display(), "Settings file not found, starting from defaults");
            return Ok(PersistedValues::new());
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read settings from {:?}", self.path))?;

        let file: RawSettingsFile = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse TOML from {:?}", self.path))?;

        let mut values = PersistedValues::new();
        for (key, raw) in file.settings {
            let kind = raw.type_str();
            match setting_value(raw) {
                Some(value) => {
                    values.insert(key, value);
                }
                None => warn!(key = %key, kind, "Ignoring persisted setting of unsupported type"),
            }
        }

        info!(path = %self.path.display(), count = values.len(), "Loaded persisted settings");
        Ok(values)
    }

    fn save(&self, values: &PersistedValues) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {:?}", parent))?;
        }

        let file = SettingsFile {
            settings: values.clone(),
        };
        let toml_string =
            toml::to_string_pretty(&file).context("Failed to serialize settings to TOML")?;

        fs::write(&self.path, toml_string)
            .with_context(|| format!("Failed to write settings to {:?}", self.path))?;

        info!(path = %self.path.display(), "Saved settings");
        Ok(())
    }
}

/// In-memory backend, nothing survives the process
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RefCell<PersistedValues>,
}

impl MemoryStore {
    pub fn new(values: PersistedValues) -> Self {
        Self {
            values: RefCell::new(values),
        }
    }
}

impl SettingsPersistence for MemoryStore {
    fn load(&self) -> Result<PersistedValues> {
        Ok(self.values.borrow().clone())
    }

    fn save(&self, values: &PersistedValues) -> Result<()> {
        *self.values.borrow_mut() = values.clone();
        Ok(())
    }
}
