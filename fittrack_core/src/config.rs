//! Configuration file support for FitTrack.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/fittrack/config.toml`.

use crate::{Error, Result};
use chrono::{FixedOffset, Local, Offset};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub goals: GoalConfig,

    #[serde(default)]
    pub progress: ProgressConfig,

    #[serde(default)]
    pub display: DisplayConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Goal engine parameters
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct GoalConfig {
    #[serde(default = "default_calorie_floor_kcal")]
    pub calorie_floor_kcal: f64,

    #[serde(default = "default_calorie_offset_kcal")]
    pub deficit_kcal: f64,

    #[serde(default = "default_calorie_offset_kcal")]
    pub surplus_kcal: f64,

    #[serde(default = "default_water_ml_per_kg")]
    pub water_ml_per_kg: f64,

    #[serde(default = "default_water_floor_ml")]
    pub water_floor_ml: f64,

    #[serde(default = "default_fiber_g")]
    pub fiber_g: f64,
}

impl Default for GoalConfig {
    fn default() -> Self {
        Self {
            calorie_floor_kcal: default_calorie_floor_kcal(),
            deficit_kcal: default_calorie_offset_kcal(),
            surplus_kcal: default_calorie_offset_kcal(),
            water_ml_per_kg: default_water_ml_per_kg(),
            water_floor_ml: default_water_floor_ml(),
            fiber_g: default_fiber_g(),
        }
    }
}

/// Progress band parameters, as fractions of the target
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ProgressConfig {
    #[serde(default = "default_lower_fraction")]
    pub lower_fraction: f64,

    #[serde(default = "default_upper_fraction")]
    pub upper_fraction: f64,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            lower_fraction: default_lower_fraction(),
            upper_fraction: default_upper_fraction(),
        }
    }
}

/// Presentation configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_water_glass_ml")]
    pub water_glass_ml: f64,

    /// Offset used to decide which calendar day an entry belongs to.
    /// Falls back to the local offset when unset.
    #[serde(default)]
    pub utc_offset_minutes: Option<i32>,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            water_glass_ml: default_water_glass_ml(),
            utc_offset_minutes: None,
        }
    }
}

impl DisplayConfig {
    /// Resolve the configured day boundary offset
    pub fn utc_offset(&self) -> Result<FixedOffset> {
        match self.utc_offset_minutes {
            Some(minutes) => minutes
                .checked_mul(60)
                .and_then(FixedOffset::east_opt)
                .ok_or_else(|| {
                    Error::Config(format!("utc_offset_minutes out of range: {}", minutes))
                }),
            None => Ok(Local::now().offset().fix()),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| {
        std::env::var_os("HOME")
            .map(|home| PathBuf::from(home).join(".local/share"))
            .unwrap_or_else(|| PathBuf::from("."))
    });
    base.join("fittrack")
}

fn default_calorie_floor_kcal() -> f64 {
    1200.0
}

fn default_calorie_offset_kcal() -> f64 {
    500.0
}

fn default_water_ml_per_kg() -> f64 {
    35.0
}

fn default_water_floor_ml() -> f64 {
    1500.0
}

fn default_fiber_g() -> f64 {
    25.0
}

fn default_lower_fraction() -> f64 {
    0.9
}

fn default_upper_fraction() -> f64 {
    1.1
}

fn default_water_glass_ml() -> f64 {
    250.0
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            std::env::var_os("HOME")
                .map(|home| PathBuf::from(home).join(".config"))
                .unwrap_or_else(|| PathBuf::from("."))
        });
        base.join("fittrack").join("config.toml")
    }

    /// Reject constants that would make the goal engine or evaluator meaningless
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("goals.calorie_floor_kcal", self.goals.calorie_floor_kcal),
            ("goals.water_ml_per_kg", self.goals.water_ml_per_kg),
            ("goals.water_floor_ml", self.goals.water_floor_ml),
            ("goals.fiber_g", self.goals.fiber_g),
            ("progress.lower_fraction", self.progress.lower_fraction),
            ("progress.upper_fraction", self.progress.upper_fraction),
            ("display.water_glass_ml", self.display.water_glass_ml),
        ];
        for (key, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::Config(format!("{} must be positive, got {}", key, value)));
            }
        }

        for (key, value) in [
            ("goals.deficit_kcal", self.goals.deficit_kcal),
            ("goals.surplus_kcal", self.goals.surplus_kcal),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(Error::Config(format!("{} must not be negative, got {}", key, value)));
            }
        }

        if self.progress.lower_fraction > self.progress.upper_fraction {
            return Err(Error::Config(format!(
                "progress.lower_fraction ({}) exceeds progress.upper_fraction ({})",
                self.progress.lower_fraction, self.progress.upper_fraction
            )));
        }

        self.display.utc_offset()?;
        Ok(())
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.goals.calorie_floor_kcal, 1200.0);
        assert_eq!(config.goals.deficit_kcal, 500.0);
        assert_eq!(config.goals.water_floor_ml, 1500.0);
        assert_eq!(config.goals.fiber_g, 25.0);
        assert_eq!(config.progress.lower_fraction, 0.9);
        assert_eq!(config.display.water_glass_ml, 250.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");

        let mut config = Config::default();
        config.goals.surplus_kcal = 300.0;
        config.display.utc_offset_minutes = Some(60);
        config.save_to(&path).unwrap();

        let parsed = Config::load_from(&path).unwrap();
        assert_eq!(parsed.goals, config.goals);
        assert_eq!(parsed.display.utc_offset_minutes, Some(60));
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[goals]
calorie_floor_kcal = 1500.0
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.goals.calorie_floor_kcal, 1500.0);
        assert_eq!(config.goals.water_ml_per_kg, 35.0); // default
        assert_eq!(config.progress.upper_fraction, 1.1); // default
    }

    #[test]
    fn test_inverted_progress_bands_rejected() {
        let mut config = Config::default();
        config.progress.lower_fraction = 1.2;
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_offset_out_of_range_rejected() {
        let mut config = Config::default();
        config.display.utc_offset_minutes = Some(24 * 60);
        assert!(config.validate().is_err());

        config.display.utc_offset_minutes = Some(i32::MAX);
        assert!(matches!(config.display.utc_offset(), Err(Error::Config(_))));
        config.display.utc_offset_minutes = Some(i32::MIN);
        assert!(config.validate().is_err());

        config.display.utc_offset_minutes = Some(-300);
        let offset = config.display.utc_offset().unwrap();
        assert_eq!(offset.local_minus_utc(), -300 * 60);
    }
}
