mod settings;

pub use settings::{Settings, Theme};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns the directory holding `settings.toml`, creating it if needed.
///
/// Resolution order:
/// 1. `STUDYTIMER_DATA_DIR`, used as-is.
/// 2. `~/.config/studytimer-dev/` when `STUDYTIMER_ENV=dev`.
/// 3. `~/.config/studytimer/`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("STUDYTIMER_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("STUDYTIMER_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("studytimer-dev")
            } else {
                base_dir.join("studytimer")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::NoDataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
