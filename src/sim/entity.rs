//! Moving things on the field and their per-tick motion rules
//!
//! Every entity shares position/size state; what differs is how it moves.
//! The kind tag selects the rule:
//! - Player: velocity rebuilt each tick from held direction keys, clamped to the field
//! - Roamer: straight-line heading that bounces off the field walls
//! - PowerUp: stationary until collected

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::region::BoundedRegion;
use super::tick::DirectionKeys;
use crate::{heading_to_velocity, normalize_angle};

/// Roamer motion variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoamerKind {
    /// Constant speed along its heading
    Straight,
    /// Speed scaled by a fresh random factor every tick
    Jittery,
}

/// Entity kind (selects the motion rule)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    Roamer(RoamerKind),
    PowerUp,
}

/// Per-tick speed multiplier band for jittery roamers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JitterBand {
    pub min: f32,
    pub max: f32,
}

/// Which walls a roamer bounced off this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bounce {
    pub horizontal: bool,
    pub vertical: bool,
}

impl Bounce {
    pub fn any(&self) -> bool {
        self.horizontal || self.vertical
    }
}

/// A moving (or resting) rectangle on the field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MotionEntity {
    pub id: u32,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Base speed in units per tick
    pub speed: f32,
    /// Heading in radians (roamers only)
    pub heading: f32,
    /// Displacement applied on the last tick
    pub vel: Vec2,
    pub kind: EntityKind,
}

impl MotionEntity {
    /// Player with its box centered on `center`
    pub fn player(id: u32, center: Vec2, size: f32, speed: f32) -> Self {
        Self {
            id,
            pos: center - Vec2::splat(size / 2.0),
            size: Vec2::splat(size),
            speed,
            heading: 0.0,
            vel: Vec2::ZERO,
            kind: EntityKind::Player,
        }
    }

    /// Roamer with its box centered on `center`
    pub fn roamer(
        id: u32,
        kind: RoamerKind,
        center: Vec2,
        size: f32,
        speed: f32,
        heading: f32,
    ) -> Self {
        Self {
            id,
            pos: center - Vec2::splat(size / 2.0),
            size: Vec2::splat(size),
            speed,
            heading: normalize_angle(heading),
            vel: Vec2::ZERO,
            kind: EntityKind::Roamer(kind),
        }
    }

    /// Power-up with its top-left corner at `pos`
    pub fn power_up(id: u32, pos: Vec2, size: f32) -> Self {
        Self {
            id,
            pos,
            size: Vec2::splat(size),
            speed: 0.0,
            heading: 0.0,
            vel: Vec2::ZERO,
            kind: EntityKind::PowerUp,
        }
    }

    pub fn rect(&self) -> BoundedRegion {
        BoundedRegion::new(self.pos.x, self.pos.y, self.size.x, self.size.y)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    pub fn is_roamer(&self) -> bool {
        matches!(self.kind, EntityKind::Roamer(_))
    }

    /// Move the player from held direction keys, then clamp into `field`.
    ///
    /// Opposite keys cancel. Diagonals are not renormalized, so diagonal
    /// movement is √2 faster than axis-aligned movement.
    pub fn advance_player(&mut self, keys: DirectionKeys, field: &BoundedRegion) {
        let speed = self.speed;
        let axis = |neg: bool, pos: bool| {
            (if pos { speed } else { 0.0 }) - (if neg { speed } else { 0.0 })
        };
        self.vel = Vec2::new(axis(keys.left, keys.right), axis(keys.up, keys.down));
        self.pos += self.vel;
        self.clamp_to(field);
    }

    /// Keep the whole box inside `field`
    pub fn clamp_to(&mut self, field: &BoundedRegion) {
        let max_x = (field.right() - self.size.x).max(field.left());
        let max_y = (field.bottom() - self.size.y).max(field.top());
        self.pos.x = self.pos.x.clamp(field.left(), max_x);
        self.pos.y = self.pos.y.clamp(field.top(), max_y);
    }

    /// Step a roamer along its heading and bounce it off the field walls.
    ///
    /// Jittery roamers draw a new speed factor from `jitter` every tick with
    /// no memory of the previous one.
    pub fn advance_roamer<R: Rng>(
        &mut self,
        field: &BoundedRegion,
        jitter: JitterBand,
        rng: &mut R,
    ) -> Bounce {
        let factor = match self.kind {
            EntityKind::Roamer(RoamerKind::Jittery) => rng.random_range(jitter.min..=jitter.max),
            _ => 1.0,
        };
        self.vel = heading_to_velocity(self.heading, self.speed) * factor;
        self.pos += self.vel;
        self.reflect_off(field)
    }

    /// Reflect the heading off any wall the box has crossed.
    ///
    /// A wall only reflects a roamer still heading into it, so a box that
    /// needs more than one tick to get back inside does not flip back and
    /// forth. Position is left untouched.
    pub fn reflect_off(&mut self, field: &BoundedRegion) -> Bounce {
        use std::f32::consts::PI;

        let rect = self.rect();
        let dir = heading_to_velocity(self.heading, 1.0);
        let mut bounce = Bounce::default();

        let past_left = rect.left() < field.left() && dir.x < 0.0;
        let past_right = rect.right() > field.right() && dir.x > 0.0;
        if past_left || past_right {
            self.heading = PI - self.heading;
            bounce.horizontal = true;
        }

        let past_top = rect.top() < field.top() && dir.y < 0.0;
        let past_bottom = rect.bottom() > field.bottom() && dir.y > 0.0;
        if past_top || past_bottom {
            self.heading = -self.heading;
            bounce.vertical = true;
        }

        self.heading = normalize_angle(self.heading);
        bounce
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use std::f32::consts::PI;

    const NO_JITTER: JitterBand = JitterBand { min: 1.0, max: 1.0 };

    fn field() -> BoundedRegion {
        BoundedRegion::new(0.0, 0.0, 800.0, 600.0)
    }

    fn keys(left: bool, right: bool, up: bool, down: bool) -> DirectionKeys {
        DirectionKeys { left, right, up, down }
    }

    #[test]
    fn test_player_moves_from_keys() {
        let mut player = MotionEntity::player(1, Vec2::new(400.0, 300.0), 50.0, 5.0);
        player.advance_player(keys(false, true, false, false), &field());
        assert_eq!(player.center(), Vec2::new(405.0, 300.0));

        player.advance_player(keys(false, false, true, false), &field());
        assert_eq!(player.center(), Vec2::new(405.0, 295.0));
    }

    #[test]
    fn test_player_opposite_keys_cancel() {
        let mut player = MotionEntity::player(1, Vec2::new(400.0, 300.0), 50.0, 5.0);
        player.advance_player(keys(true, true, false, true), &field());
        assert_eq!(player.vel, Vec2::new(0.0, 5.0));
    }

    #[test]
    fn test_player_diagonal_not_renormalized() {
        let mut player = MotionEntity::player(1, Vec2::new(400.0, 300.0), 50.0, 5.0);
        player.advance_player(keys(false, true, false, true), &field());
        assert!((player.vel.length() - 5.0 * 2.0_f32.sqrt()).abs() < 1e-4);
    }

    #[test]
    fn test_player_clamped_not_reflected() {
        let mut player = MotionEntity::player(1, Vec2::new(27.0, 300.0), 50.0, 5.0);
        player.advance_player(keys(true, false, false, false), &field());
        assert_eq!(player.pos.x, 0.0);
        player.advance_player(keys(true, false, false, false), &field());
        assert_eq!(player.pos.x, 0.0);

        let mut player = MotionEntity::player(2, Vec2::new(790.0, 590.0), 50.0, 5.0);
        player.advance_player(keys(false, true, false, true), &field());
        assert_eq!(player.rect().right(), 800.0);
        assert_eq!(player.rect().bottom(), 600.0);
    }

    #[test]
    fn test_roamer_moves_along_heading() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut roamer =
            MotionEntity::roamer(1, RoamerKind::Straight, Vec2::new(400.0, 300.0), 20.0, 3.0, 0.0);
        let bounce = roamer.advance_roamer(&field(), NO_JITTER, &mut rng);
        assert!(!bounce.any());
        assert!((roamer.center().x - 403.0).abs() < 1e-4);
        assert!((roamer.center().y - 300.0).abs() < 1e-4);
    }

    #[test]
    fn test_reflection_symmetric_and_single() {
        let mut rng = Pcg32::seed_from_u64(1);
        // Left edge 2 units from the wall, heading straight at it
        let mut roamer =
            MotionEntity::roamer(1, RoamerKind::Straight, Vec2::new(12.0, 300.0), 20.0, 3.0, PI);
        assert!((roamer.pos.x - 2.0).abs() < 1e-4);

        let bounce = roamer.advance_roamer(&field(), NO_JITTER, &mut rng);
        assert!(bounce.horizontal);
        assert!(!bounce.vertical);
        assert!((roamer.pos.x - (-1.0)).abs() < 1e-4);

        let bounce = roamer.advance_roamer(&field(), NO_JITTER, &mut rng);
        assert!(!bounce.any());
        // Same distance from the wall as before the crossing
        assert!((roamer.pos.x - 2.0).abs() < 1e-4);
        assert!((roamer.center().y - 300.0).abs() < 1e-3);
    }

    #[test]
    fn test_reflection_not_repeated_while_leaving() {
        // Already outside but heading back in: no flip
        let mut roamer =
            MotionEntity::roamer(1, RoamerKind::Straight, Vec2::new(5.0, 300.0), 20.0, 3.0, 0.0);
        assert!(!roamer.reflect_off(&field()).any());
        assert_eq!(roamer.heading, 0.0);
    }

    #[test]
    fn test_vertical_and_corner_reflection() {
        let center = Vec2::new(400.0, 595.0);
        let mut roamer = MotionEntity::roamer(1, RoamerKind::Straight, center, 20.0, 3.0, PI / 2.0);
        let bounce = roamer.reflect_off(&field());
        assert!(bounce.vertical && !bounce.horizontal);
        assert!((roamer.heading - (-PI / 2.0)).abs() < 1e-5);

        // Heading down-right into the bottom-right corner
        let heading = PI / 4.0;
        let center = Vec2::new(795.0, 595.0);
        let mut roamer = MotionEntity::roamer(2, RoamerKind::Straight, center, 20.0, 3.0, heading);
        let bounce = roamer.reflect_off(&field());
        assert!(bounce.horizontal && bounce.vertical);
        // π - h, then negated: -(π - π/4) = -3π/4 (up-left)
        assert!((roamer.heading - (-3.0 * PI / 4.0)).abs() < 1e-5);
    }

    #[test]
    fn test_jitter_within_band() {
        let mut rng = Pcg32::seed_from_u64(42);
        let band = JitterBand { min: 0.9, max: 1.1 };
        let mut roamer =
            MotionEntity::roamer(1, RoamerKind::Jittery, Vec2::new(400.0, 300.0), 20.0, 3.0, 0.0);
        let mut seen_distinct = false;
        let mut last: Option<f32> = None;
        for _ in 0..50 {
            roamer.pos = Vec2::new(390.0, 290.0);
            roamer.advance_roamer(&field(), band, &mut rng);
            let step = roamer.vel.length();
            assert!(step >= 3.0 * 0.9 - 1e-4 && step <= 3.0 * 1.1 + 1e-4);
            if let Some(prev) = last {
                if (step - prev).abs() > 1e-6 {
                    seen_distinct = true;
                }
            }
            last = Some(step);
        }
        assert!(seen_distinct);
    }

    #[test]
    fn test_straight_roamer_ignores_jitter() {
        let mut rng = Pcg32::seed_from_u64(42);
        let band = JitterBand { min: 0.5, max: 1.5 };
        let mut roamer =
            MotionEntity::roamer(1, RoamerKind::Straight, Vec2::new(400.0, 300.0), 20.0, 3.0, 1.0);
        roamer.advance_roamer(&field(), band, &mut rng);
        assert!((roamer.vel.length() - 3.0).abs() < 1e-5);
    }
}
