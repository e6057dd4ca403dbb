//! Configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Geocoding service configuration
    pub geocoder: GeocoderConfig,

    /// Description store configuration
    pub descriptions: DescriptionsConfig,

    /// Chart computation configuration
    pub chart: ChartConfig,
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .astrobot.yml
        let local_config = PathBuf::from(".astrobot.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/astrobot/astrobot.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("astrobot").join("astrobot.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// Geocoding service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocoderConfig {
    /// Search endpoint base URL
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// User agent sent with every request (required by Nominatim's policy)
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://nominatim.openstreetmap.org".to_string(),
            user_agent: concat!("astrobot/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_ms: 10_000,
        }
    }
}

/// Description store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DescriptionsConfig {
    /// Path to the SQLite database file
    pub database: PathBuf,
}

impl Default for DescriptionsConfig {
    fn default() -> Self {
        let database = dirs::data_dir()
            .map(|d| d.join("astrobot").join("descriptions.db"))
            .unwrap_or_else(|| PathBuf::from("descriptions.db"));
        Self { database }
    }
}

/// Chart computation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Latest accepted birth year; later years are rejected as not yet arrived
    #[serde(rename = "year-cutoff")]
    pub year_cutoff: i32,

    /// Observer altitude above sea level, in meters
    #[serde(rename = "observer-altitude-m")]
    pub observer_altitude_m: f64,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            year_cutoff: 2024,
            observer_altitude_m: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.geocoder.base_url, "https://nominatim.openstreetmap.org");
        assert_eq!(config.chart.year_cutoff, 2024);
        assert_eq!(config.chart.observer_altitude_m, 0.0);
    }

    #[test]
    fn test_deserialize_config() {
        let yaml = r#"
geocoder:
  base-url: https://geo.example.com
  user-agent: my-bot/1.0
  timeout-ms: 2500

descriptions:
  database: /var/lib/astrobot/zodiac.db

chart:
  year-cutoff: 2030
  observer-altitude-m: 150.0
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.geocoder.base_url, "https://geo.example.com");
        assert_eq!(config.geocoder.user_agent, "my-bot/1.0");
        assert_eq!(config.geocoder.timeout_ms, 2500);
        assert_eq!(config.descriptions.database, PathBuf::from("/var/lib/astrobot/zodiac.db"));
        assert_eq!(config.chart.year_cutoff, 2030);
        assert_eq!(config.chart.observer_altitude_m, 150.0);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let yaml = r#"
chart:
  year-cutoff: 2026
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        // Specified value
        assert_eq!(config.chart.year_cutoff, 2026);

        // Defaults for unspecified
        assert_eq!(config.geocoder.timeout_ms, 10_000);
        assert_eq!(config.chart.observer_altitude_m, 0.0);
    }
}
