//! Field configuration
//!
//! Fixed at startup. Loaded from an optional JSON file; any field left out
//! keeps its default.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::entity::JitterBand;
use crate::sim::quadtree::IndexError;
use crate::sim::region::BoundedRegion;

/// Configuration failures. All of them are fatal before the first tick.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(&'static str),
    #[error(transparent)]
    Index(#[from] IndexError),
}

/// Simulation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    // === Field ===
    pub field_width: f32,
    pub field_height: f32,
    /// Simulation ticks per second
    pub tick_rate: u32,

    // === Broad phase ===
    /// Points per quadtree node before it subdivides
    pub node_capacity: usize,
    /// Hit region extends this far beyond the player box on each side
    pub collision_margin: f32,

    // === Progression ===
    /// Level goes up whenever the score is a multiple of this
    pub level_up_threshold: u64,
    pub initial_level: u32,
    /// Roamers per wave are `level + wave_base`
    pub wave_base: u32,

    // === Player ===
    pub player_size: f32,
    pub player_speed: f32,

    // === Roamers ===
    pub roamer_size: f32,
    pub roamer_speed: f32,
    pub jitter_min: f32,
    pub jitter_max: f32,
    /// Spawns closer than this to the player center are redrawn
    pub spawn_clearance: f32,

    // === Power-ups ===
    pub power_up_size: f32,
    /// Chance per tick of a new power-up appearing
    pub power_up_chance: f64,
    /// Permanent player speed gain per power-up
    pub power_up_speed_bonus: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,
            tick_rate: TICK_RATE,

            node_capacity: NODE_CAPACITY,
            collision_margin: COLLISION_MARGIN,

            level_up_threshold: LEVEL_UP_THRESHOLD,
            initial_level: INITIAL_LEVEL,
            wave_base: WAVE_BASE,

            player_size: PLAYER_SIZE,
            player_speed: PLAYER_SPEED,

            roamer_size: ROAMER_SIZE,
            roamer_speed: ROAMER_SPEED,
            jitter_min: JITTER_MIN,
            jitter_max: JITTER_MAX,
            spawn_clearance: SPAWN_CLEARANCE,

            power_up_size: POWER_UP_SIZE,
            power_up_chance: POWER_UP_CHANCE,
            power_up_speed_bonus: POWER_UP_SPEED_BONUS,
        }
    }
}

impl SimConfig {
    /// Parse and validate a JSON config
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Reject settings the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = |v: f32| v.is_finite() && v > 0.0;
        let non_negative = |v: f32| v.is_finite() && v >= 0.0;

        if !positive(self.field_width) || !positive(self.field_height) {
            return Err(ConfigError::Invalid("field dimensions must be positive"));
        }
        if self.tick_rate == 0 {
            return Err(ConfigError::Invalid("tick_rate must be at least 1"));
        }
        if self.node_capacity == 0 {
            return Err(IndexError::ZeroCapacity.into());
        }
        if !non_negative(self.collision_margin) {
            return Err(ConfigError::Invalid("collision_margin must not be negative"));
        }
        if self.level_up_threshold == 0 {
            return Err(ConfigError::Invalid("level_up_threshold must be at least 1"));
        }
        let sizes = [self.player_size, self.roamer_size, self.power_up_size];
        if !sizes.into_iter().all(positive) {
            return Err(ConfigError::Invalid("entity sizes must be positive"));
        }
        let largest = sizes.into_iter().fold(0.0, f32::max);
        if largest > self.field_width.min(self.field_height) {
            return Err(ConfigError::Invalid("entities must fit on the field"));
        }
        if !non_negative(self.player_speed) || !non_negative(self.roamer_speed) {
            return Err(ConfigError::Invalid("speeds must not be negative"));
        }
        let band_ok = positive(self.jitter_min) && self.jitter_min <= self.jitter_max;
        if !band_ok || !self.jitter_max.is_finite() {
            return Err(ConfigError::Invalid("jitter band must satisfy 0 < min <= max"));
        }
        if !(0.0..=1.0).contains(&self.power_up_chance) {
            return Err(ConfigError::Invalid("power_up_chance must be within [0, 1]"));
        }
        if !non_negative(self.power_up_speed_bonus) {
            return Err(ConfigError::Invalid("power_up_speed_bonus must not be negative"));
        }
        if !non_negative(self.spawn_clearance) {
            return Err(ConfigError::Invalid("spawn_clearance must not be negative"));
        }
        if !(1..=MAX_CONFIG_LEVEL).contains(&self.initial_level) {
            return Err(ConfigError::Invalid("initial_level must be within 1..=1000"));
        }
        if self.wave_base > MAX_CONFIG_LEVEL {
            return Err(ConfigError::Invalid("wave_base must be at most 1000"));
        }
        Ok(())
    }

    /// The play field, anchored at the origin
    pub fn field(&self) -> BoundedRegion {
        BoundedRegion::new(0.0, 0.0, self.field_width, self.field_height)
    }

    pub fn jitter(&self) -> JitterBand {
        JitterBand {
            min: self.jitter_min,
            max: self.jitter_max,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = SimConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.node_capacity, 4);
        assert_eq!(config.collision_margin, 50.0);
        assert_eq!(config.level_up_threshold, 50);
        assert_eq!(config.power_up_chance, 0.10);
        assert_eq!(config.power_up_speed_bonus, 2.0);
        assert_eq!(config.field(), BoundedRegion::new(0.0, 0.0, 800.0, 600.0));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let json = r#"{ "field_width": 1024, "node_capacity": 8 }"#;
        let config = SimConfig::from_json_str(json).unwrap();
        assert_eq!(config.field_width, 1024.0);
        assert_eq!(config.node_capacity, 8);
        assert_eq!(config.field_height, FIELD_HEIGHT);
        assert_eq!(config.tick_rate, TICK_RATE);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let err = SimConfig::from_json_str(r#"{ "node_capacity": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Index(IndexError::ZeroCapacity)));
    }

    #[test]
    fn test_invalid_values_rejected() {
        for json in [
            r#"{ "field_width": 0 }"#,
            r#"{ "tick_rate": 0 }"#,
            r#"{ "level_up_threshold": 0 }"#,
            r#"{ "power_up_chance": 1.5 }"#,
            r#"{ "jitter_min": 1.2, "jitter_max": 1.1 }"#,
            r#"{ "player_size": 700 }"#,
            r#"{ "power_up_speed_bonus": -100.0 }"#,
            r#"{ "spawn_clearance": -1.0 }"#,
            r#"{ "initial_level": 0 }"#,
            r#"{ "initial_level": 4294967295 }"#,
            r#"{ "wave_base": 4294967295 }"#,
        ] {
            let err = SimConfig::from_json_str(json).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid(_)), "{json} gave {err:?}");
        }
    }

    #[test]
    fn test_oversized_wave_base_refused_before_spawning() {
        let config = SimConfig {
            wave_base: u32::MAX,
            ..SimConfig::default()
        };
        let err = crate::sim::SimulationState::new(config, 1).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = SimConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = SimConfig::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
