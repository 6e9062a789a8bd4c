mod settings_store;

pub use settings_store::SettingsStore;

use std::path::PathBuf;

/// Returns the settings directory.
///
/// `JIGGLER_CONFIG_DIR` wins when set. Otherwise `~/.config/jiggler[-dev]/`,
/// with `JIGGLER_ENV=dev` selecting the development directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn config_dir() -> std::io::Result<PathBuf> {
    let dir = match std::env::var_os("JIGGLER_CONFIG_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("JIGGLER_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("jiggler-dev")
            } else {
                base_dir.join("jiggler")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
