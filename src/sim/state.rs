//! Simulation state and core types
//!
//! One owned value holds everything a tick reads or writes. The tick loop
//! passes it explicitly; nothing lives in globals.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::MotionEntity;
use super::population;
use super::quadtree::SpatialIndex;
use super::region::BoundedRegion;
use crate::settings::{ConfigError, SimConfig};

/// Current phase of play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Ticks advance the world
    Running,
    /// Terminal. No further ticks change anything.
    GameOver,
}

/// Notable things that happened during a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    LevelUp { level: u32, spawned: usize },
    PowerUpCollected { id: u32, player_speed: f32 },
    GameOver { score: u64, level: u32, tick: u64 },
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct SimulationState {
    pub config: SimConfig,
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,
    /// Ticks simulated so far
    pub time_ticks: u64,
    pub level: u32,
    pub score: u64,
    pub player: MotionEntity,
    /// Roaming entities (sorted by id)
    pub roamers: Vec<MotionEntity>,
    /// Uncollected power-ups (sorted by id)
    pub power_ups: Vec<MotionEntity>,
    /// Broad phase over roamer centers, rebuilt every tick
    pub index: SpatialIndex,
    /// Events raised since the last drain
    pub events: Vec<GameEvent>,
    /// Regions that changed since the last drain
    pub dirty: Vec<BoundedRegion>,
    next_id: u32,
}

impl SimulationState {
    /// Validate `config`, place the player at the field center and spawn the
    /// opening wave.
    pub fn new(config: SimConfig, seed: u64) -> Result<Self, ConfigError> {
        let mut state = Self::empty(config, seed)?;
        let spawned = population::spawn_wave(&mut state);
        log::info!(
            "Simulation ready: seed={}, level={}, roamers={}",
            seed,
            state.level,
            spawned
        );
        Ok(state)
    }

    /// Like `new` but without the opening wave
    pub fn empty(config: SimConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let field = config.field();
        let index = SpatialIndex::new(field, config.node_capacity)?;
        let player =
            MotionEntity::player(0, field.center(), config.player_size, config.player_speed);

        Ok(Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Running,
            time_ticks: 0,
            level: config.initial_level,
            score: 0,
            player,
            roamers: Vec::new(),
            power_ups: Vec::new(),
            index,
            events: Vec::new(),
            dirty: Vec::new(),
            next_id: 1,
            config,
        })
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn field(&self) -> BoundedRegion {
        self.config.field()
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Move the player so its box is centered on `center` (clamped to the field)
    pub fn place_player(&mut self, center: Vec2) {
        let field = self.field();
        self.player.pos = center - self.player.size / 2.0;
        self.player.clamp_to(&field);
    }

    /// Add a roamer built by the caller, assigning it a fresh ID
    pub fn add_roamer(&mut self, mut roamer: MotionEntity) -> u32 {
        let id = self.next_entity_id();
        roamer.id = id;
        self.dirty.push(roamer.rect());
        self.roamers.push(roamer);
        id
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn drain_dirty(&mut self) -> Vec<BoundedRegion> {
        std::mem::take(&mut self.dirty)
    }

    /// Ensure entities are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.roamers.sort_by_key(|r| r.id);
        self.power_ups.sort_by_key(|p| p.id);
    }
}
