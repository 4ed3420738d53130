//! Outer loop
//!
//! Drives `tick` at a fixed cadence, feeds input in and hands output to a
//! render sink. Stopping only ever happens between ticks.

use std::time::{Duration, Instant};

use serde::Serialize;

use crate::consts::MAX_SUBSTEPS;
use crate::platform::InputSource;
use crate::render::{DirtyRegions, FrameView, RenderSink};
use crate::sim::{DirectionKeys, GameEvent, GamePhase, SimulationState, TickInput, tick};

/// Longest frame gap the clock will try to catch up on (seconds)
const MAX_FRAME_DELTA: f32 = 0.1;

/// Accumulator that turns variable frame times into whole fixed ticks
#[derive(Debug, Clone)]
pub struct FixedStepClock {
    dt: f32,
    accumulator: f32,
    max_substeps: u32,
}

impl FixedStepClock {
    pub fn new(tick_rate: u32) -> Self {
        Self {
            dt: 1.0 / tick_rate.max(1) as f32,
            accumulator: 0.0,
            max_substeps: MAX_SUBSTEPS,
        }
    }

    pub fn dt(&self) -> f32 {
        self.dt
    }

    /// Add `frame_dt` seconds and return how many ticks are due.
    ///
    /// Long stalls are clamped and at most `max_substeps` ticks run per
    /// frame, so a slow frame cannot snowball.
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DELTA);
        let mut due = 0;
        while self.accumulator >= self.dt && due < self.max_substeps {
            self.accumulator -= self.dt;
            due += 1;
        }
        if due == self.max_substeps {
            // Drop whatever is left rather than carry it forward
            self.accumulator = self.accumulator.min(self.dt);
        }
        due
    }
}

/// Why the loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StopReason {
    GameOver,
    Quit,
    TickLimit,
}

/// End-of-run report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub seed: u64,
    pub ticks: u64,
    pub score: u64,
    pub level: u32,
    pub roamers: usize,
    pub power_ups: usize,
    pub player_speed: f32,
    pub stop: StopReason,
}

impl RunSummary {
    fn of(state: &SimulationState, stop: StopReason) -> Self {
        Self {
            seed: state.seed,
            ticks: state.time_ticks,
            score: state.score,
            level: state.level,
            roamers: state.roamers.len(),
            power_ups: state.power_ups.len(),
            player_speed: state.player.speed,
            stop,
        }
    }
}

/// Holds the input mapping across ticks and forwards output to the sink
#[derive(Debug, Default)]
pub struct Runner {
    keys: DirectionKeys,
}

impl Runner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Poll input, run one tick, then flush dirty regions, the frame and any
    /// terminal signal to `sink`. Returns the phase after the tick.
    ///
    /// A quit raised by this poll skips the tick, so the loop stops before
    /// the simulation advances again.
    pub fn step(
        &mut self,
        state: &mut SimulationState,
        input: &mut dyn InputSource,
        sink: &mut dyn RenderSink,
    ) -> GamePhase {
        for event in input.poll(state) {
            self.keys.apply(event);
        }
        if input.quit_requested() {
            return state.phase;
        }

        tick(state, &TickInput { keys: self.keys });

        let dirty = DirtyRegions::clipped(state.drain_dirty(), &state.field());
        for region in dirty.iter() {
            sink.invalidate(*region);
        }
        sink.frame(&FrameView::of(state));

        for event in state.drain_events() {
            match event {
                GameEvent::GameOver { score, level, .. } => sink.game_over(score, level),
                GameEvent::LevelUp { level, spawned } => {
                    log::debug!("Wave for level {} spawned {} roamers", level, spawned)
                }
                GameEvent::PowerUpCollected { .. } => {}
            }
        }
        state.phase
    }

    /// Why the loop should stop before the next tick, if it should
    fn stop_reason(
        state: &SimulationState,
        input: &dyn InputSource,
        max_ticks: Option<u64>,
    ) -> Option<StopReason> {
        if state.is_over() {
            Some(StopReason::GameOver)
        } else if input.quit_requested() {
            Some(StopReason::Quit)
        } else if max_ticks.is_some_and(|limit| state.time_ticks >= limit) {
            Some(StopReason::TickLimit)
        } else {
            None
        }
    }

    /// Run ticks back to back until the game ends, input quits, or
    /// `max_ticks` is reached.
    pub fn run(
        &mut self,
        state: &mut SimulationState,
        input: &mut dyn InputSource,
        sink: &mut dyn RenderSink,
        max_ticks: Option<u64>,
    ) -> RunSummary {
        loop {
            if let Some(stop) = Self::stop_reason(state, input, max_ticks) {
                return RunSummary::of(state, stop);
            }
            self.step(state, input, sink);
        }
    }

    /// Like `run`, but paced to wall-clock time at the configured tick rate
    pub fn run_realtime(
        &mut self,
        state: &mut SimulationState,
        input: &mut dyn InputSource,
        sink: &mut dyn RenderSink,
        max_ticks: Option<u64>,
    ) -> RunSummary {
        let mut clock = FixedStepClock::new(state.config.tick_rate);
        let frame = Duration::from_secs_f32(clock.dt());
        let mut last = Instant::now();

        loop {
            let now = Instant::now();
            let due = clock.advance(now.duration_since(last).as_secs_f32());
            last = now;

            for _ in 0..due {
                if let Some(stop) = Self::stop_reason(state, input, max_ticks) {
                    return RunSummary::of(state, stop);
                }
                self.step(state, input, sink);
            }
            if let Some(stop) = Self::stop_reason(state, input, max_ticks) {
                return RunSummary::of(state, stop);
            }

            let spent = now.elapsed();
            if spent < frame {
                std::thread::sleep(frame - spent);
            }
        }
    }
}
