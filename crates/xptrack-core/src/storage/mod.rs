mod config;
pub mod database;

pub use config::{ChartConfig, Config, CourseConfig, EconomyConfig, GoalConfig, ThemeConfig};
pub use database::Database;

use std::path::PathBuf;

/// Returns `~/.config/xptrack[-dev]/` based on XPTRACK_ENV.
///
/// Set XPTRACK_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if the home directory cannot be determined or if
/// creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("XPTRACK_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("xptrack-dev")
    } else {
        base_dir.join("xptrack")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
