//! Render boundary
//!
//! Drawing itself lives outside this crate. A renderer only ever sees:
//! - "this rectangle needs redrawing" (`invalidate`)
//! - a read-only view of the frame after each tick
//! - the terminal signal when the run ends

use serde::Serialize;

use crate::sim::{BoundedRegion, GamePhase, MotionEntity, SimulationState};

/// Read-only snapshot of what a renderer draws each tick
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FrameView<'a> {
    pub tick: u64,
    pub phase: GamePhase,
    pub score: u64,
    pub level: u32,
    pub player: &'a MotionEntity,
    pub roamers: &'a [MotionEntity],
    pub power_ups: &'a [MotionEntity],
}

impl<'a> FrameView<'a> {
    pub fn of(state: &'a SimulationState) -> Self {
        Self {
            tick: state.time_ticks,
            phase: state.phase,
            score: state.score,
            level: state.level,
            player: &state.player,
            roamers: &state.roamers,
            power_ups: &state.power_ups,
        }
    }
}

/// Consumer of simulation output
pub trait RenderSink {
    /// Mark a rectangle of the field for redraw
    fn invalidate(&mut self, region: BoundedRegion);

    /// Called once per tick after all invalidations for that tick
    fn frame(&mut self, frame: &FrameView<'_>);

    /// The run is over; show the end screen
    fn game_over(&mut self, score: u64, level: u32);
}

/// Dirty rectangles for one tick, clipped to the field
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DirtyRegions {
    regions: Vec<BoundedRegion>,
}

impl DirtyRegions {
    /// Clip `regions` to `field`, dropping anything left without area
    pub fn clipped(regions: impl IntoIterator<Item = BoundedRegion>, field: &BoundedRegion) -> Self {
        Self {
            regions: regions
                .into_iter()
                .filter_map(|r| field.intersection(&r))
                .collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &BoundedRegion> {
        self.regions.iter()
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// One rectangle covering every dirty region
    pub fn bounds(&self) -> Option<BoundedRegion> {
        self.regions.iter().copied().reduce(|a, b| a.union(&b))
    }

    /// Total dirty area (overlaps counted twice)
    pub fn area(&self) -> f32 {
        self.regions.iter().map(BoundedRegion::area).sum()
    }
}

/// Discards everything
#[derive(Debug, Default)]
pub struct NullSink;

impl RenderSink for NullSink {
    fn invalidate(&mut self, _region: BoundedRegion) {}
    fn frame(&mut self, _frame: &FrameView<'_>) {}
    fn game_over(&mut self, _score: u64, _level: u32) {}
}

/// Headless sink that logs a summary line every `interval` frames
#[derive(Debug)]
pub struct LogSink {
    interval: u64,
    frames: u64,
    invalidated: u64,
    dirty_area: f64,
}

impl LogSink {
    pub fn new(interval: u64) -> Self {
        Self {
            interval: interval.max(1),
            frames: 0,
            invalidated: 0,
            dirty_area: 0.0,
        }
    }
}

impl RenderSink for LogSink {
    fn invalidate(&mut self, region: BoundedRegion) {
        self.invalidated += 1;
        self.dirty_area += region.area() as f64;
    }

    fn frame(&mut self, frame: &FrameView<'_>) {
        self.frames += 1;
        if self.frames % self.interval == 0 {
            log::info!(
                "tick={} score={} level={} roamers={} power_ups={} redraws={} dirty_area={:.0}",
                frame.tick,
                frame.score,
                frame.level,
                frame.roamers.len(),
                frame.power_ups.len(),
                self.invalidated,
                self.dirty_area
            );
            self.invalidated = 0;
            self.dirty_area = 0.0;
        }
    }

    fn game_over(&mut self, score: u64, level: u32) {
        log::info!("GAME OVER - score {} level {}", score, level);
    }
}
