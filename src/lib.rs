//! Quad Dodge - a dodge-the-swarm arena simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (quadtree broad phase, motion, game state)
//! - `settings`: Field configuration loaded at startup
//! - `platform`: Input boundary (direction keys, scripted/autopilot sources)
//! - `render`: Render boundary (dirty regions, frame views, sinks)
//! - `runner`: Fixed-rate clock and the outer tick loop

pub mod platform;
pub mod render;
pub mod runner;
pub mod settings;
pub mod sim;

pub use settings::{ConfigError, SimConfig};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Default simulation cadence (ticks per second)
    pub const TICK_RATE: u32 = 60;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Play field dimensions
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 600.0;

    /// Quadtree node capacity before subdivision
    pub const NODE_CAPACITY: usize = 4;

    /// Player defaults
    pub const PLAYER_SIZE: f32 = 50.0;
    pub const PLAYER_SPEED: f32 = 5.0;

    /// Roaming entity defaults
    pub const ROAMER_SIZE: f32 = 20.0;
    pub const ROAMER_SPEED: f32 = 3.0;
    /// Jitter band for the erratic roamer variant (per-tick speed multiplier)
    pub const JITTER_MIN: f32 = 0.9;
    pub const JITTER_MAX: f32 = 1.1;

    /// Power-up defaults
    pub const POWER_UP_SIZE: f32 = 20.0;
    pub const POWER_UP_CHANCE: f64 = 0.10;
    pub const POWER_UP_SPEED_BONUS: f32 = 2.0;

    /// Hit region grows this far beyond the player box on every side
    pub const COLLISION_MARGIN: f32 = 50.0;

    /// Score steps between level-ups
    pub const LEVEL_UP_THRESHOLD: u64 = 50;
    pub const INITIAL_LEVEL: u32 = 1;
    /// Each wave spawns `level + WAVE_BASE` roamers
    pub const WAVE_BASE: u32 = 4;

    /// Minimum distance between a freshly spawned roamer and the player center
    pub const SPAWN_CLEARANCE: f32 = 100.0;
    /// Redraws allowed before a spawn position is accepted anyway
    pub const SPAWN_ATTEMPTS: u32 = 8;
    /// Upper bound for a configured starting level or wave base
    pub const MAX_CONFIG_LEVEL: u32 = 1000;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Velocity of magnitude `speed` pointing along `heading` (radians, screen space)
#[inline]
pub fn heading_to_velocity(heading: f32, speed: f32) -> Vec2 {
    Vec2::new(speed * heading.cos(), speed * heading.sin())
}
