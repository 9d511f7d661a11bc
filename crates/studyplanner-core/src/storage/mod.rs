mod config;
pub mod state;
pub mod store;

pub use config::{Config, CONFIG_FILE, MAX_WINDOW_DAYS};
pub use state::{PlannerState, SCHEMA_VERSION};
pub use store::{JsonFileStore, MemoryStore, StateStore, STATE_FILE};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns the data directory, creating it if needed.
///
/// `STUDYPLANNER_DATA_DIR` wins when set. Otherwise this is
/// `~/.config/studyplanner[-dev]/`, with the `-dev` suffix selected by
/// `STUDYPLANNER_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("STUDYPLANNER_DATA_DIR") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env =
                std::env::var("STUDYPLANNER_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("studyplanner-dev")
            } else {
                base_dir.join("studyplanner")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
