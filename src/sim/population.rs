//! Population control: spawning, per-tick motion, and index rebuilds
//!
//! Waves grow with the level. The broad phase only tracks roamers; the player
//! and power-ups are never indexed.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use super::entity::{MotionEntity, RoamerKind};
use super::quadtree::TrackedPoint;
use super::state::SimulationState;
use super::tick::DirectionKeys;
use crate::consts::SPAWN_ATTEMPTS;

/// Roamers in the wave spawned for `level`
pub fn wave_size(level: u32, wave_base: u32) -> usize {
    level.saturating_add(wave_base) as usize
}

/// Spawn the wave for the current level. Returns how many roamers were added.
pub fn spawn_wave(state: &mut SimulationState) -> usize {
    let count = wave_size(state.level, state.config.wave_base);
    for _ in 0..count {
        spawn_roamer(state);
    }
    log::debug!("Level {} wave: {} roamers (total {})", state.level, count, state.roamers.len());
    count
}

/// Spawn one roamer at a random spot with a random heading and variant
pub fn spawn_roamer(state: &mut SimulationState) -> u32 {
    let size = state.config.roamer_size;
    let speed = state.config.roamer_speed;
    let center = spawn_point(state, size);
    let kind = if state.rng.random_bool(0.5) {
        RoamerKind::Straight
    } else {
        RoamerKind::Jittery
    };
    let heading = state.rng.random_range(0.0..TAU);

    let roamer = MotionEntity::roamer(0, kind, center, size, speed, heading);
    state.add_roamer(roamer)
}

/// Random center for a box of `size` that keeps it inside the field.
///
/// Draws that land within the spawn clearance of the player are redrawn a
/// bounded number of times; the last draw is kept regardless.
fn spawn_point(state: &mut SimulationState, size: f32) -> Vec2 {
    let field = state.field();
    let half = size / 2.0;
    let player_center = state.player.center();
    let clearance = state.config.spawn_clearance;

    let mut center = player_center;
    for _ in 0..SPAWN_ATTEMPTS.max(1) {
        center = Vec2::new(
            state.rng.random_range(field.left() + half..=field.right() - half),
            state.rng.random_range(field.top() + half..=field.bottom() - half),
        );
        if center.distance(player_center) >= clearance {
            break;
        }
    }
    center
}

/// Roll for a power-up this tick. Returns the new power-up's ID if one spawned.
pub fn maybe_spawn_power_up(state: &mut SimulationState) -> Option<u32> {
    if !state.rng.random_bool(state.config.power_up_chance) {
        return None;
    }

    let field = state.field();
    let size = state.config.power_up_size;
    let pos = Vec2::new(
        state.rng.random_range(field.left()..=field.right() - size),
        state.rng.random_range(field.top()..=field.bottom() - size),
    );
    let id = state.next_entity_id();
    let power_up = MotionEntity::power_up(id, pos, size);
    state.dirty.push(power_up.rect());
    state.power_ups.push(power_up);
    Some(id)
}

/// Advance the player and every roamer by one tick, recording the area each
/// one swept as dirty.
pub fn advance(state: &mut SimulationState, keys: DirectionKeys) {
    let field = state.field();
    let jitter = state.config.jitter();

    let before = state.player.rect();
    state.player.advance_player(keys, &field);
    state.dirty.push(before.union(&state.player.rect()));

    for roamer in &mut state.roamers {
        let before = roamer.rect();
        let bounce = roamer.advance_roamer(&field, jitter, &mut state.rng);
        if bounce.any() {
            log::trace!("Tick {}: roamer {} bounced {:?}", state.time_ticks, roamer.id, bounce);
        }
        state.dirty.push(before.union(&roamer.rect()));
    }
}

/// Snapshot roamer centers for the broad phase
pub fn tracked_points(state: &SimulationState) -> Vec<TrackedPoint> {
    state
        .roamers
        .iter()
        .map(|r| TrackedPoint::new(r.id, r.center()))
        .collect()
}

/// Rebuild the index from current roamer positions. Returns how many were
/// indexed; centers momentarily off the field are skipped for this tick.
pub fn rebuild_index(state: &mut SimulationState) -> usize {
    let points = tracked_points(state);
    let indexed = state.index.update(&points);
    if indexed < points.len() {
        log::trace!(
            "Tick {}: {} roamer(s) outside the field, not indexed",
            state.time_ticks,
            points.len() - indexed
        );
    }
    log::trace!(
        "Tick {}: indexed {} roamers in {} nodes",
        state.time_ticks,
        indexed,
        state.index.node_count()
    );
    indexed
}
