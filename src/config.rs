//! World configuration, loadable from TOML or RON.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::collision::PhysicsLayer;
use crate::math::vec2::Vec2;

/// Tunables of a physics world and its fixed-timestep loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Acceleration applied to dynamic bodies. Positive y points down.
    pub gravity: Vec2,
    /// Physics steps per second.
    pub physics_rate_hz: f64,
    /// Game update steps per second.
    pub update_rate_hz: f64,
    /// Most physics steps run for a single frame before excess time is dropped.
    pub max_catch_up_steps: u32,
    /// Multiplier on every step's delta time.
    pub time_scale: f64,
    /// Layer pairs that never collide.
    pub disabled_layer_pairs: Vec<(PhysicsLayer, PhysicsLayer)>,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec2::new(0.0, 9.81),
            physics_rate_hz: 120.0,
            update_rate_hz: 60.0,
            max_catch_up_steps: 8,
            time_scale: 1.0,
            disabled_layer_pairs: Vec::new(),
        }
    }
}

impl PhysicsConfig {
    /// Loads from a `.toml` or `.ron` file and validates the values.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config: Self = match Format::of(path)? {
            Format::Toml => toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))?,
            Format::Ron => ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks the values a world and its timestep would otherwise reject.
    /// Layer indices are range-checked when deserialized.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, rate) in [("physics_rate_hz", self.physics_rate_hz), ("update_rate_hz", self.update_rate_hz)] {
            if !(rate.is_finite() && rate > 0.0) {
                return Err(ConfigError::Invalid(format!("{name} must be positive, got {rate}")));
            }
        }
        if !(self.time_scale.is_finite() && self.time_scale >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "time_scale must be non-negative, got {}",
                self.time_scale
            )));
        }
        if !self.gravity.is_finite() {
            return Err(ConfigError::Invalid(format!("gravity must be finite, got {:?}", self.gravity)));
        }
        Ok(())
    }

    /// Saves to a `.toml` or `.ron` file.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = match Format::of(path)? {
            Format::Toml => toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?,
            Format::Ron => ron::ser::to_string_pretty(self, Default::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?,
        };
        std::fs::write(path, contents)?;
        Ok(())
    }
}

enum Format {
    Toml,
    Ron,
}

impl Format {
    fn of(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(Format::Toml),
            Some("ron") => Ok(Format::Ron),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Serialization error: {0}")]
    Serialize(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid value: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn custom() -> PhysicsConfig {
        PhysicsConfig {
            gravity: Vec2::new(0.0, 20.0),
            physics_rate_hz: 240.0,
            max_catch_up_steps: 4,
            disabled_layer_pairs: vec![(PhysicsLayer::new(1), PhysicsLayer::new(2))],
            ..PhysicsConfig::default()
        }
    }

    #[test]
    fn test_toml_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("physics.toml");
        custom().save_to_file(&path).unwrap();
        assert_eq!(PhysicsConfig::load_from_file(&path).unwrap(), custom());
    }

    #[test]
    fn test_ron_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("physics.ron");
        custom().save_to_file(&path).unwrap();
        assert_eq!(PhysicsConfig::load_from_file(&path).unwrap(), custom());
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.toml");
        std::fs::write(&path, "time_scale = 0.5\n").unwrap();
        let config = PhysicsConfig::load_from_file(&path).unwrap();
        assert_eq!(config.time_scale, 0.5);
        assert_eq!(config.physics_rate_hz, 120.0);
        assert_eq!(config.gravity, Vec2::new(0.0, 9.81));
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("physics.json");
        assert!(matches!(custom().save_to_file(&path), Err(ConfigError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_zero_rate_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stalled.toml");
        std::fs::write(&path, "physics_rate_hz = 0.0\n").unwrap();
        assert!(matches!(PhysicsConfig::load_from_file(&path), Err(ConfigError::Invalid(_))));

        let config = PhysicsConfig { time_scale: -1.0, ..PhysicsConfig::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
        assert!(PhysicsConfig::default().validate().is_ok());
    }

    #[test]
    fn test_out_of_range_layer_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layers.toml");
        std::fs::write(&path, "disabled_layer_pairs = [[40, 1]]\n").unwrap();
        assert!(matches!(PhysicsConfig::load_from_file(&path), Err(ConfigError::Parse(_))));

        let path = dir.path().join("layers.ron");
        std::fs::write(&path, "(disabled_layer_pairs: [(1, 40)])\n").unwrap();
        assert!(matches!(PhysicsConfig::load_from_file(&path), Err(ConfigError::Parse(_))));

        std::fs::write(&path, "(disabled_layer_pairs: [(1, 31)])\n").unwrap();
        let config = PhysicsConfig::load_from_file(&path).unwrap();
        assert_eq!(config.disabled_layer_pairs, vec![(PhysicsLayer::new(1), PhysicsLayer::new(31))]);
    }

    #[test]
    fn test_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "gravity = \"down\"\n").unwrap();
        assert!(matches!(PhysicsConfig::load_from_file(&path), Err(ConfigError::Parse(_))));
    }
}
