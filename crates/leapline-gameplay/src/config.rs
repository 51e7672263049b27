//! Launch tuning configuration.
//!
//! A [`LaunchConfig`] is supplied once when a controller is built and is
//! read-only afterwards. It can be written by hand or loaded from TOML:
//!
//! ```toml
//! jump_strength = 20.0
//! max_aim_magnitude = 0.5
//! velocity_retention = 0.5
//! max_prediction_time = 2.0
//! time_step = 0.033
//! gravity = [0.0, -9.81]
//! gravity_scale = 1.0
//! collidable_mask = 1
//! ```

use std::fs;
use std::path::Path;

use leapline_common::{ConfigError, LayerMask, LeaplineError, LeaplineResult, Vec2};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::trajectory::sample_count;

/// Tuning for aiming, launching, and the trajectory telegraph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaunchConfig {
    /// Launch speed per unit of aim magnitude
    pub jump_strength: f32,
    /// Cap on the normalized pointer offset; further pointer travel adds nothing
    pub max_aim_magnitude: f32,
    /// Fraction of the pre-launch velocity kept through a launch (0-1)
    pub velocity_retention: f32,
    /// Longest stretch of flight the telegraph predicts, in seconds
    pub max_prediction_time: f32,
    /// Seconds between telegraph points; smaller is smoother but costs more queries
    pub time_step: f32,
    /// World gravity acceleration
    pub gravity: Vec2,
    /// Per-body multiplier on `gravity`
    pub gravity_scale: f32,
    /// Layers that stop the telegraph
    pub collidable_mask: LayerMask,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            jump_strength: 20.0,
            max_aim_magnitude: 0.5,
            velocity_retention: 0.5,
            max_prediction_time: 2.0,
            time_step: 1.0 / 30.0,
            gravity: Vec2::new(0.0, -9.81),
            gravity_scale: 1.0,
            collidable_mask: LayerMask::single(0),
        }
    }
}

impl LaunchConfig {
    /// Gravity acting on the controlled body.
    #[must_use]
    pub fn effective_gravity(&self) -> Vec2 {
        self.gravity * self.gravity_scale
    }

    /// Checks every field, failing on the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.jump_strength.is_finite() {
            return Err(ConfigError::NonFinite {
                field: "jump_strength",
            });
        }
        if !self.max_aim_magnitude.is_finite() {
            return Err(ConfigError::NonFinite {
                field: "max_aim_magnitude",
            });
        }
        if self.max_aim_magnitude < 0.0 {
            return Err(ConfigError::NegativeMaxAimMagnitude(self.max_aim_magnitude));
        }
        if !(0.0..=1.0).contains(&self.velocity_retention) {
            return Err(ConfigError::VelocityRetentionOutOfRange(
                self.velocity_retention,
            ));
        }
        if !self.gravity.is_finite() {
            return Err(ConfigError::NonFinite { field: "gravity" });
        }
        if !self.gravity_scale.is_finite() {
            return Err(ConfigError::NonFinite {
                field: "gravity_scale",
            });
        }
        sample_count(self.time_step, self.max_prediction_time)?;
        Ok(())
    }

    /// Parses and validates a TOML document.
    pub fn from_toml_str(text: &str) -> LeaplineResult<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| LeaplineError::Serialization(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes to pretty TOML.
    pub fn to_toml_string(&self) -> LeaplineResult<String> {
        toml::to_string_pretty(self).map_err(|e| LeaplineError::Serialization(e.to_string()))
    }

    /// Loads and validates a configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> LeaplineResult<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&contents)?;
        info!("Loaded launch config from {}", path.display());
        debug!(?config, "launch config");
        Ok(config)
    }

    /// Saves the configuration to a file, creating parent directories.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> LeaplineResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_toml_string()?)?;
        info!("Saved launch config to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert_eq!(LaunchConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_rejects_non_positive_time_step() {
        for step in [0.0, -0.016] {
            let config = LaunchConfig {
                time_step: step,
                ..LaunchConfig::default()
            };
            assert_eq!(config.validate(), Err(ConfigError::NonPositiveTimeStep(step)));
        }
    }

    #[test]
    fn test_rejects_negative_aim_cap() {
        let config = LaunchConfig {
            max_aim_magnitude: -0.1,
            ..LaunchConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::NegativeMaxAimMagnitude(-0.1))
        );
    }

    #[test]
    fn test_retention_bounds() {
        for ok in [0.0, 0.3, 1.0] {
            let config = LaunchConfig {
                velocity_retention: ok,
                ..LaunchConfig::default()
            };
            assert!(config.validate().is_ok(), "{ok} should be accepted");
        }
        for bad in [-0.01, 1.01] {
            let config = LaunchConfig {
                velocity_retention: bad,
                ..LaunchConfig::default()
            };
            assert_eq!(
                config.validate(),
                Err(ConfigError::VelocityRetentionOutOfRange(bad))
            );
        }
    }

    #[test]
    fn test_rejects_non_finite_gravity() {
        let config = LaunchConfig {
            gravity: Vec2::new(0.0, f32::INFINITY),
            ..LaunchConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::NonFinite { field: "gravity" })
        );
    }

    #[test]
    fn test_effective_gravity() {
        let config = LaunchConfig {
            gravity: Vec2::new(0.0, -9.0),
            gravity_scale: 0.5,
            ..LaunchConfig::default()
        };
        assert_eq!(config.effective_gravity(), Vec2::new(0.0, -4.5));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = LaunchConfig::from_toml_str(
            r"
            jump_strength = 35.0
            gravity = [0.0, -20.0]
            collidable_mask = 6
            ",
        )
        .expect("valid toml");

        assert_eq!(config.jump_strength, 35.0);
        assert_eq!(config.gravity, Vec2::new(0.0, -20.0));
        assert!(config.collidable_mask.includes(1));
        assert!(config.collidable_mask.includes(2));
        assert_eq!(config.velocity_retention, LaunchConfig::default().velocity_retention);
    }

    #[test]
    fn test_toml_validation_error_surfaces() {
        let err = LaunchConfig::from_toml_str("time_step = 0.0").expect_err("invalid step");
        assert!(matches!(
            err,
            LeaplineError::Config(ConfigError::NonPositiveTimeStep(_))
        ));
    }

    #[test]
    fn test_malformed_toml_is_serialization_error() {
        let err = LaunchConfig::from_toml_str("jump_strength = \"high\"").expect_err("bad type");
        assert!(matches!(err, LeaplineError::Serialization(_)));
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("tuning").join("launch.toml");

        let config = LaunchConfig {
            jump_strength: 14.0,
            velocity_retention: 0.25,
            collidable_mask: LayerMask::single(0).with(5),
            ..LaunchConfig::default()
        };
        config.save_to(&path).expect("save");

        let loaded = LaunchConfig::load(&path).expect("load");
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let err = LaunchConfig::load(dir.path().join("absent.toml")).expect_err("missing");
        assert!(matches!(err, LeaplineError::Io(_)));
    }
}
