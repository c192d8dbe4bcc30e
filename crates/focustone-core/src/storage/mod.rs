mod config;

pub use config::{AlarmConfig, Config, SessionConfig, SoundsConfig, MAX_REPEAT_COUNT};

use std::path::PathBuf;

use crate::error::Result;

/// Returns `~/.config/focustone[-dev]/` based on FOCUSTONE_ENV.
///
/// Set FOCUSTONE_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let base_dir = dirs::config_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
        .unwrap_or_else(|| PathBuf::from("."));

    let env = std::env::var("FOCUSTONE_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("focustone-dev")
    } else {
        base_dir.join("focustone")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
