//! TOML-backed settings store.
//!
//! The file holds a single `[Settings]` table whose keys are the settings
//! record keys:
//!
//! ```toml
//! [Settings]
//! JigglePeriod = "60"
//! ZenJiggle = "0"
//! EnabledDays = "Mon,Tue,Wed,Thu,Fri"
//! ```
//!
//! Values are written as strings. On read, integers and booleans are accepted
//! as well and converted to their record text.

use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::config_dir;
use crate::error::ConfigError;
use crate::settings::{format_flag, JiggleConfig, SettingsRecord};

pub const SETTINGS_FILE: &str = "settings.toml";
pub const SETTINGS_TABLE: &str = "Settings";

#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `<config dir>/settings.toml`.
    ///
    /// # Errors
    ///
    /// Returns an error if the config directory cannot be created.
    pub fn open_default() -> crate::Result<Self> {
        let dir = config_dir()?;
        Ok(Self::new(dir.join(SETTINGS_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the raw record. A missing file is an empty record.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_record(&self) -> Result<SettingsRecord, ConfigError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no settings file; using defaults");
                return Ok(SettingsRecord::new());
            }
            Err(e) => {
                return Err(ConfigError::LoadFailed {
                    path: self.path.clone(),
                    message: e.to_string(),
                })
            }
        };

        parse_record(&content)
    }

    /// Writes the record, creating the parent directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be serialized or written.
    pub fn save_record(&self, record: &SettingsRecord) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: self.path.clone(),
            message,
        };

        let content = render_record(record).map_err(|e| save_failed(e.to_string()))?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| save_failed(e.to_string()))?;
        }
        std::fs::write(&self.path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Loads and validates the configuration.
    ///
    /// # Errors
    ///
    /// Same as [`SettingsStore::load_record`].
    pub fn load(&self) -> Result<JiggleConfig, ConfigError> {
        Ok(JiggleConfig::from_record(&self.load_record()?))
    }

    /// Persists every field of `config`.
    ///
    /// # Errors
    ///
    /// Same as [`SettingsStore::save_record`].
    pub fn save(&self, config: &JiggleConfig) -> Result<(), ConfigError> {
        self.save_record(&config.to_record())
    }

    /// Load from disk, returning defaults on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default(&self) -> JiggleConfig {
        self.load().unwrap_or_else(|err| {
            warn!(%err, "settings unreadable; using defaults");
            JiggleConfig::default()
        })
    }
}

fn parse_record(content: &str) -> Result<SettingsRecord, ConfigError> {
    let document: toml::Table = content
        .parse()
        .map_err(|e: toml::de::Error| ConfigError::ParseFailed(e.to_string()))?;

    let Some(section) = document.get(SETTINGS_TABLE) else {
        return Ok(SettingsRecord::new());
    };
    let section = section.as_table().ok_or_else(|| {
        ConfigError::ParseFailed(format!("[{SETTINGS_TABLE}] must be a table"))
    })?;

    let mut record = SettingsRecord::new();
    for (key, value) in section {
        let text = match value {
            toml::Value::String(s) => s.clone(),
            toml::Value::Integer(n) => n.to_string(),
            toml::Value::Boolean(b) => format_flag(*b).to_string(),
            other => {
                warn!(key = %key, kind = other.type_str(), "ignoring non-scalar setting");
                continue;
            }
        };
        record.set(key.clone(), text);
    }
    Ok(record)
}

fn render_record(record: &SettingsRecord) -> Result<String, toml::ser::Error> {
    let section: toml::Table = record
        .iter()
        .map(|(k, v)| (k.to_string(), toml::Value::String(v.to_string())))
        .collect();
    let mut document = toml::Table::new();
    document.insert(SETTINGS_TABLE.to_string(), toml::Value::Table(section));
    toml::to_string_pretty(&document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::keys;
    use tempfile::TempDir;

    fn setup() -> (TempDir, SettingsStore) {
        let temp_dir = TempDir::new().unwrap();
        let store = SettingsStore::new(temp_dir.path().join(SETTINGS_FILE));
        (temp_dir, store)
    }

    #[test]
    fn missing_file_loads_defaults() {
        let (_temp_dir, store) = setup();
        assert!(store.load_record().unwrap().is_empty());
        assert_eq!(store.load().unwrap(), JiggleConfig::default());
    }

    #[test]
    fn save_then_load() {
        let (_temp_dir, store) = setup();
        let config = JiggleConfig::default().with_period_secs(42).with_zen_mode(true);
        store.save(&config).unwrap();

        let content = std::fs::read_to_string(store.path()).unwrap();
        assert!(content.contains("[Settings]"));
        assert!(content.contains("JigglePeriod = \"42\""));

        assert_eq!(store.load().unwrap(), config);
    }

    #[test]
    fn accepts_native_toml_scalars() {
        let (_temp_dir, store) = setup();
        std::fs::write(
            store.path(),
            "[Settings]\nJigglePeriod = 15\nZenJiggle = true\nEnabledDays = \"sat,SUN\"\n",
        )
        .unwrap();

        let record = store.load_record().unwrap();
        assert_eq!(record.get(keys::JIGGLE_PERIOD), Some("15"));
        assert_eq!(record.get(keys::ZEN_JIGGLE), Some("1"));

        let config = store.load().unwrap();
        assert_eq!(config.period_secs(), 15);
        assert!(config.zen_mode());
        assert_eq!(config.restriction().active_days.to_string(), "Sun,Sat");
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let (_temp_dir, store) = setup();
        std::fs::write(store.path(), "[Settings\nJigglePeriod = ").unwrap();
        assert!(matches!(store.load(), Err(ConfigError::ParseFailed(_))));
        assert_eq!(store.load_or_default(), JiggleConfig::default());
    }

    #[test]
    fn file_without_settings_table_is_empty() {
        let (_temp_dir, store) = setup();
        std::fs::write(store.path(), "[Other]\nx = 1\n").unwrap();
        assert!(store.load_record().unwrap().is_empty());
    }

    #[test]
    fn save_creates_parent_directory() {
        let temp_dir = TempDir::new().unwrap();
        let store = SettingsStore::new(temp_dir.path().join("nested").join(SETTINGS_FILE));
        store.save(&JiggleConfig::default()).unwrap();
        assert!(store.path().exists());
    }
}
