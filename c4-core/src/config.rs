//! Configuration schema shared by the engine and the self-play driver.
//!
//! Loaded from YAML; every field has a default so a partial file (or no file
//! at all) yields the stock tuning.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration loading errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    /// Search engine settings.
    #[serde(default)]
    pub engine: EngineConfig,
    /// Self-play settings.
    #[serde(default)]
    pub selfplay: SelfplayConfig,
}

/// Search engine configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EngineConfig {
    /// PUCT exploration constant.
    #[serde(default = "default_c_puct")]
    pub c_puct: f32,
    /// Playout budget per search.
    #[serde(default = "default_playouts")]
    pub playouts: u64,
    /// Optional arena budget in megabytes; when unset the arena is sized
    /// from the playout budget.
    #[serde(default)]
    pub memory_mb: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            c_puct: default_c_puct(),
            playouts: default_playouts(),
            memory_mb: None,
        }
    }
}

/// Self-play configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SelfplayConfig {
    /// Dirichlet concentration for root move sampling.
    #[serde(default = "default_dir_alpha")]
    pub dir_alpha: f64,
    /// Ply at which sampling switches from temperature 1.0 to near-greedy.
    #[serde(default = "default_temp_cutoff")]
    pub temp_cutoff: u32,
}

impl Default for SelfplayConfig {
    fn default() -> Self {
        Self {
            dir_alpha: default_dir_alpha(),
            temp_cutoff: default_temp_cutoff(),
        }
    }
}

fn default_c_puct() -> f32 {
    3.0
}

fn default_playouts() -> u64 {
    800
}

fn default_dir_alpha() -> f64 {
    1.3
}

fn default_temp_cutoff() -> u32 {
    12
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&contents)?)
    }

    /// Load configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_yaml_string_with_defaults() {
        let yaml = r#"
engine:
  playouts: 200

selfplay:
  temp_cutoff: 6
"#;
        let config = Config::from_yaml(yaml).expect("parse");
        assert_eq!(config.engine.playouts, 200);
        assert_eq!(config.engine.c_puct, 3.0);
        assert_eq!(config.engine.memory_mb, None);
        assert_eq!(config.selfplay.temp_cutoff, 6);
        assert_eq!(config.selfplay.dir_alpha, 1.3);
    }

    #[test]
    fn empty_document_yields_stock_tuning() {
        let config = Config::from_yaml("{}").expect("parse");
        assert_eq!(config.engine.c_puct, 3.0);
        assert_eq!(config.engine.playouts, 800);
        assert_eq!(config.selfplay.dir_alpha, 1.3);
        assert_eq!(config.selfplay.temp_cutoff, 12);
    }

    #[test]
    fn shipped_default_file_loads() {
        let config = Config::load("../configs/default.yaml").expect("load configs/default.yaml");
        assert_eq!(config.engine.playouts, 800);
    }

    #[test]
    fn invalid_yaml_fails() {
        assert!(Config::from_yaml("engine: [not: a: map").is_err());
    }
}
