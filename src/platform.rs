//! Input boundary
//!
//! Input arrives as discrete key transitions. Sources here are headless:
//! a scripted timeline for tests/replays and an autopilot for demo runs.

use glam::Vec2;

use crate::sim::{Direction, DirectionKeys, KeyEvent, SimulationState};

/// Something that delivers key transitions between ticks
pub trait InputSource {
    /// Key transitions to apply before the next tick
    fn poll(&mut self, state: &SimulationState) -> Vec<KeyEvent>;

    /// Ask the outer loop to stop before the next tick
    fn quit_requested(&self) -> bool {
        false
    }
}

/// No input at all
#[derive(Debug, Default)]
pub struct Idle;

impl InputSource for Idle {
    fn poll(&mut self, _state: &SimulationState) -> Vec<KeyEvent> {
        Vec::new()
    }
}

/// Key transitions replayed at fixed ticks.
///
/// An event scheduled for tick `n` is delivered before tick `n + 1` runs,
/// i.e. when `state.time_ticks == n`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    timeline: Vec<(u64, KeyEvent)>,
    cursor: usize,
    /// Stop once the timeline is exhausted and this tick is reached
    quit_at: Option<u64>,
    finished: bool,
}

impl ScriptedInput {
    pub fn new(mut timeline: Vec<(u64, KeyEvent)>) -> Self {
        timeline.sort_by_key(|(at, _)| *at);
        Self {
            timeline,
            ..Self::default()
        }
    }

    /// Request a quit when the simulation reaches `tick`
    pub fn quit_at(mut self, tick: u64) -> Self {
        self.quit_at = Some(tick);
        self
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self, state: &SimulationState) -> Vec<KeyEvent> {
        let now = state.time_ticks;
        let mut due = Vec::new();
        while let Some(&(at, event)) = self.timeline.get(self.cursor) {
            if at > now {
                break;
            }
            due.push(event);
            self.cursor += 1;
        }
        if self.quit_at.is_some_and(|at| now >= at) {
            self.finished = true;
        }
        due
    }

    fn quit_requested(&self) -> bool {
        self.finished
    }
}

/// Demo pilot: steers away from the closest roamer and off the walls
#[derive(Debug, Clone, Default)]
pub struct Autopilot {
    held: DirectionKeys,
}

impl Autopilot {
    /// Below this component size the pilot releases the axis
    const DEADZONE: f32 = 0.2;
    /// Walls start pushing back within this distance
    const WALL_BUFFER: f32 = 80.0;

    pub fn new() -> Self {
        Self::default()
    }

    /// Keys the pilot wants held for the given state
    pub fn desired_keys(state: &SimulationState) -> DirectionKeys {
        let field = state.field();
        let me = state.player.center();

        let mut push = Vec2::ZERO;
        if let Some(threat) = state
            .roamers
            .iter()
            .map(|r| r.center())
            .min_by(|a, b| a.distance_squared(me).total_cmp(&b.distance_squared(me)))
        {
            push += (me - threat).normalize_or_zero();
        }

        // Walls repel linearly inside the buffer
        let wall = |gap: f32| ((Self::WALL_BUFFER - gap) / Self::WALL_BUFFER).max(0.0);
        push.x += wall(me.x - field.left()) - wall(field.right() - me.x);
        push.y += wall(me.y - field.top()) - wall(field.bottom() - me.y);

        DirectionKeys {
            left: push.x < -Self::DEADZONE,
            right: push.x > Self::DEADZONE,
            up: push.y < -Self::DEADZONE,
            down: push.y > Self::DEADZONE,
        }
    }
}

impl InputSource for Autopilot {
    fn poll(&mut self, state: &SimulationState) -> Vec<KeyEvent> {
        let want = Self::desired_keys(state);
        let mut events = Vec::new();
        for direction in [Direction::Left, Direction::Right, Direction::Up, Direction::Down] {
            let (had, wants) = (self.held.is_held(direction), want.is_held(direction));
            if had != wants {
                events.push(if wants {
                    KeyEvent::Down(direction)
                } else {
                    KeyEvent::Up(direction)
                });
            }
        }
        self.held = want;
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::SimConfig;
    use crate::sim::{MotionEntity, RoamerKind};

    fn state() -> SimulationState {
        SimulationState::empty(SimConfig::default(), 1).unwrap()
    }

    #[test]
    fn test_scripted_input_delivers_on_time() {
        let mut source = ScriptedInput::new(vec![
            (2, KeyEvent::Up(Direction::Left)),
            (0, KeyEvent::Down(Direction::Left)),
        ])
        .quit_at(3);
        let mut state = state();

        assert_eq!(source.poll(&state), vec![KeyEvent::Down(Direction::Left)]);
        state.time_ticks = 1;
        assert!(source.poll(&state).is_empty());
        state.time_ticks = 2;
        assert_eq!(source.poll(&state), vec![KeyEvent::Up(Direction::Left)]);
        assert!(!source.quit_requested());
        state.time_ticks = 3;
        assert!(source.poll(&state).is_empty());
        assert!(source.quit_requested());
    }

    #[test]
    fn test_autopilot_flees_nearest_roamer() {
        let mut state = state();
        // Threat just left of the player
        state.add_roamer(MotionEntity::roamer(
            0,
            RoamerKind::Straight,
            Vec2::new(300.0, 300.0),
            20.0,
            3.0,
            0.0,
        ));
        let keys = Autopilot::desired_keys(&state);
        assert!(keys.right);
        assert!(!keys.left);
        assert!(!keys.up && !keys.down);
    }

    #[test]
    fn test_autopilot_avoids_walls() {
        let mut state = state();
        state.place_player(Vec2::new(10.0, 300.0));
        let keys = Autopilot::desired_keys(&state);
        assert!(keys.right);
    }

    #[test]
    fn test_autopilot_emits_transitions_only() {
        let mut state = state();
        state.add_roamer(MotionEntity::roamer(
            0,
            RoamerKind::Straight,
            Vec2::new(300.0, 300.0),
            20.0,
            3.0,
            0.0,
        ));
        let mut pilot = Autopilot::new();
        assert_eq!(pilot.poll(&state), vec![KeyEvent::Down(Direction::Right)]);
        // Same situation: key already held, nothing new
        assert!(pilot.poll(&state).is_empty());
    }
}
