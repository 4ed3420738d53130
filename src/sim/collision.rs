//! Broad-phase collision and pickups
//!
//! Roamer hits go through the quadtree: one region query around the player,
//! enlarged by a margin on every side. Power-ups are few, so they are tested
//! directly against the player box.

use super::entity::MotionEntity;
use super::quadtree::{SpatialIndex, TrackedPoint};
use super::region::BoundedRegion;
use super::state::{GameEvent, SimulationState};

/// Answers "is anything close enough to end the run"
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionOracle {
    /// Distance the hit region extends beyond the player box on each side
    pub margin: f32,
}

impl CollisionOracle {
    pub fn new(margin: f32) -> Self {
        Self { margin }
    }

    /// Player box grown by the margin on every side
    pub fn hit_region(&self, player: &MotionEntity) -> BoundedRegion {
        player.rect().inflate(self.margin)
    }

    /// Tracked points inside the hit region
    pub fn hits(&self, index: &SpatialIndex, player: &MotionEntity) -> Vec<TrackedPoint> {
        index.query(&self.hit_region(player))
    }
}

/// Collect every power-up touching the player. Each one permanently raises
/// the player's speed and is removed. Returns how many were collected.
pub fn collect_power_ups(state: &mut SimulationState) -> usize {
    let player_rect = state.player.rect();
    let (taken, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut state.power_ups)
        .into_iter()
        .partition(|p| p.rect().intersects(&player_rect));
    state.power_ups = kept;

    for power_up in &taken {
        state.player.speed += state.config.power_up_speed_bonus;
        state.dirty.push(power_up.rect());
        state.events.push(GameEvent::PowerUpCollected {
            id: power_up.id,
            player_speed: state.player.speed,
        });
        log::debug!("Power-up {} collected, speed now {}", power_up.id, state.player.speed);
    }
    taken.len()
}
