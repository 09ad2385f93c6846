//! Treasure tuning loaded once at startup.
//!
//! A missing or unreadable `config.json` is never fatal: the loader logs
//! the reason and hands back the built-in defaults.

use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = "config.json";

/// Number of attributes a chest gamble can touch.
pub const GAMBLE_ATTRIBUTE_POOL: u32 = 5;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Chest behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreasureConfig {
    pub chest_per_floor: u32,
    pub mimic_chance: f64,
    pub heal_rate: f64,
    pub gamble_attr_count_min: u32,
    pub gamble_attr_count_max: u32,
    pub backfire_prob: f64,
    /// Extra magnitude granted by a mimic's reward, as a fraction.
    pub mimic_boost_bias: f64,
}

impl Default for TreasureConfig {
    fn default() -> Self {
        Self {
            chest_per_floor: 1,
            mimic_chance: 0.30,
            heal_rate: 0.30,
            gamble_attr_count_min: 1,
            gamble_attr_count_max: 3,
            backfire_prob: 0.20,
            mimic_boost_bias: 0.20,
        }
    }
}

impl TreasureConfig {
    /// Clamps every value into a range the resolver can use.
    pub fn sanitized(mut self) -> Self {
        self.mimic_chance = clamp_unit(self.mimic_chance);
        self.heal_rate = clamp_unit(self.heal_rate);
        self.backfire_prob = clamp_unit(self.backfire_prob);
        self.mimic_boost_bias = if self.mimic_boost_bias.is_finite() {
            self.mimic_boost_bias.max(0.0)
        } else {
            0.0
        };
        self.gamble_attr_count_min = self.gamble_attr_count_min.min(GAMBLE_ATTRIBUTE_POOL);
        self.gamble_attr_count_max = self
            .gamble_attr_count_max
            .clamp(self.gamble_attr_count_min, GAMBLE_ATTRIBUTE_POOL);
        self
    }
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub treasure: TreasureConfig,
}

impl GameConfig {
    /// Parses a config document. Keys left out keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        Ok(config.sanitized())
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Loads `path`, falling back to defaults on any failure.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::from_path(path) {
            Ok(config) => {
                info!("loaded config from {}", path.display());
                config
            }
            Err(e) => {
                warn!("using default config ({})", e);
                Self::default()
            }
        }
    }

    pub fn sanitized(mut self) -> Self {
        self.treasure = self.treasure.sanitized();
        self
    }
}
