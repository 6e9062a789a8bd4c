use clap::Subcommand;
use jiggler_core::{ConfigError, JiggleConfig, SettingsRecord, SettingsStore};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a setting (e.g. "JigglePeriod", "EnabledDays")
    Get {
        /// Settings key
        key: String,
    },
    /// Set a setting; out-of-range numbers are clamped
    Set {
        /// Settings key
        key: String,
        /// New value
        value: String,
    },
    /// List all settings
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Reset settings to defaults
    Reset,
    /// Print the settings file path
    Path,
}

/// Stored record as the engine would see it: every key present, every
/// value clamped into its domain.
fn normalized(store: &SettingsStore) -> Result<SettingsRecord, ConfigError> {
    Ok(JiggleConfig::from_record(&store.load_record()?).to_record())
}

fn lookup<'a>(record: &'a SettingsRecord, key: &str) -> Result<&'a str, ConfigError> {
    record
        .get(key)
        .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = SettingsStore::open_default()?;
    match action {
        ConfigAction::Get { key } => {
            let record = normalized(&store)?;
            println!("{}", lookup(&record, &key)?);
        }
        ConfigAction::Set { key, value } => {
            SettingsRecord::validate_entry(&key, &value)?;
            let mut record = store.load_record()?;
            record.set(key.as_str(), value.trim());

            let record = JiggleConfig::from_record(&record).to_record();
            store.save_record(&record)?;
            println!("{key} = {}", lookup(&record, &key)?);
        }
        ConfigAction::List { json } => {
            let record = normalized(&store)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&record)?);
            } else {
                for (key, value) in record.iter() {
                    println!("{key} = {value}");
                }
            }
        }
        ConfigAction::Reset => {
            store.save(&JiggleConfig::default())?;
            println!("settings reset to defaults");
        }
        ConfigAction::Path => {
            println!("{}", store.path().display());
        }
    }
    Ok(())
}
