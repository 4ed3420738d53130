//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod entity;
pub mod population;
pub mod quadtree;
pub mod region;
pub mod state;
pub mod tick;

pub use collision::{CollisionOracle, collect_power_ups};
pub use entity::{Bounce, EntityKind, JitterBand, MotionEntity, RoamerKind};
pub use quadtree::{IndexError, MAX_DEPTH, SpatialIndex, TrackedPoint};
pub use region::BoundedRegion;
pub use state::{GameEvent, GamePhase, SimulationState};
pub use tick::{Direction, DirectionKeys, KeyEvent, TickInput, tick};
