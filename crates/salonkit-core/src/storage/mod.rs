mod config;
pub mod migrations;
pub mod salon_db;

pub use config::{BookingConfig, Config};
pub use salon_db::{PurgeSummary, SalonDb};

use std::path::PathBuf;

use crate::error::CoreError;

/// Returns `~/.config/salonkit[-dev]/` based on SALONKIT_ENV.
///
/// Set SALONKIT_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, CoreError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("SALONKIT_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("salonkit-dev")
    } else {
        base_dir.join("salonkit")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
