//! Fixed timestep simulation tick
//!
//! Per tick: move everything, handle pickups, roll for a power-up, rebuild
//! the broad phase, then query it around the player. The index is always
//! fully rebuilt before the query runs.

use serde::{Deserialize, Serialize};

use super::collision::{CollisionOracle, collect_power_ups};
use super::population;
use super::state::{GameEvent, GamePhase, SimulationState};

/// Direction keys the player can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

/// A discrete key transition from the input collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyEvent {
    Down(Direction),
    Up(Direction),
}

/// Which direction keys are currently held
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectionKeys {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl DirectionKeys {
    pub fn set(&mut self, direction: Direction, held: bool) {
        match direction {
            Direction::Left => self.left = held,
            Direction::Right => self.right = held,
            Direction::Up => self.up = held,
            Direction::Down => self.down = held,
        }
    }

    pub fn is_held(&self, direction: Direction) -> bool {
        match direction {
            Direction::Left => self.left,
            Direction::Right => self.right,
            Direction::Up => self.up,
            Direction::Down => self.down,
        }
    }

    /// Fold a key transition into the held state
    pub fn apply(&mut self, event: KeyEvent) {
        match event {
            KeyEvent::Down(direction) => self.set(direction, true),
            KeyEvent::Up(direction) => self.set(direction, false),
        }
    }
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub keys: DirectionKeys,
}

/// Advance the simulation by one fixed timestep. Does nothing once the run
/// is over.
pub fn tick(state: &mut SimulationState, input: &TickInput) {
    if state.phase == GamePhase::GameOver {
        return;
    }

    state.time_ticks += 1;

    population::advance(state, input.keys);
    collect_power_ups(state);
    population::maybe_spawn_power_up(state);
    population::rebuild_index(state);

    let oracle = CollisionOracle::new(state.config.collision_margin);
    let hits = oracle.hits(&state.index, &state.player);
    if let Some(first) = hits.first() {
        state.phase = GamePhase::GameOver;
        state.events.push(GameEvent::GameOver {
            score: state.score,
            level: state.level,
            tick: state.time_ticks,
        });
        log::info!(
            "Game over at tick {}: roamer {} reached the player (score {}, level {})",
            state.time_ticks,
            first.id,
            state.score,
            state.level
        );
        return;
    }

    state.score += 1;
    if state.score % state.config.level_up_threshold == 0 {
        state.level += 1;
        let spawned = population::spawn_wave(state);
        state.events.push(GameEvent::LevelUp {
            level: state.level,
            spawned,
        });
        log::info!("Level {} reached at score {}", state.level, state.score);
    }

    // Ensure deterministic ordering
    state.normalize_order();
}
