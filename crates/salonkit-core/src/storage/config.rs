//! TOML-based application configuration.
//!
//! Stores the booking-grid preferences the surrounding application uses
//! when rendering open slots. Configuration is stored at
//! `~/.config/salonkit/config.toml`.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::{ConfigError, CoreError};

fn default_slot_minutes() -> u16 {
    30
}

fn default_min_notice_minutes() -> u16 {
    60
}

/// Booking-grid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingConfig {
    /// Grid step used when listing candidate booking start times.
    #[serde(default = "default_slot_minutes")]
    pub slot_minutes: u16,
    /// Minimum notice before a booking may start.
    #[serde(default = "default_min_notice_minutes")]
    pub min_notice_minutes: u16,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            slot_minutes: default_slot_minutes(),
            min_notice_minutes: default_min_notice_minutes(),
        }
    }
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/salonkit/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub booking: BookingConfig,
    /// Display name of the business, if set.
    #[serde(default)]
    pub business_name: Option<String>,
}

impl Config {
    fn path() -> Result<PathBuf, CoreError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load the config file, falling back to defaults when it is missing
    /// or unreadable.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Load the config file.
    pub fn load() -> Result<Self, CoreError> {
        let path = Self::path()?;
        let text = std::fs::read_to_string(&path)
            .map_err(|source| ConfigError::ReadFailed { path, source })?;
        let config = toml::from_str(&text).map_err(ConfigError::ParseFailed)?;
        Ok(config)
    }

    /// Write the config file.
    pub fn save(&self) -> Result<(), CoreError> {
        let path = Self::path()?;
        let text = toml::to_string_pretty(self).map_err(ConfigError::SerializeFailed)?;
        std::fs::write(&path, text).map_err(|source| ConfigError::WriteFailed { path, source })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_fields() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.booking.slot_minutes, 30);
        assert_eq!(config.booking.min_notice_minutes, 60);
        assert_eq!(config.business_name, None);
    }

    #[test]
    fn partial_toml_keeps_per_field_defaults() {
        let config: Config = toml::from_str(
            "business_name = \"Chez Nous\"\n\n[booking]\nslot_minutes = 15\n",
        )
        .unwrap();
        assert_eq!(config.booking.slot_minutes, 15);
        assert_eq!(config.booking.min_notice_minutes, 60);
        assert_eq!(config.business_name.as_deref(), Some("Chez Nous"));
    }

    #[test]
    fn toml_round_trips() {
        let mut config = Config::default();
        config.booking.slot_minutes = 20;
        let text = toml::to_string_pretty(&config).unwrap();
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back, config);
    }
}
