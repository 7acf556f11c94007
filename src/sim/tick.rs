//! Per-frame simulation tick
//!
//! Fixed pipeline: timers count down, intents apply, the world scrolls and
//! recycles, then collisions and pickups resolve.

use serde::{Deserialize, Serialize};

use super::collision;
use super::state::{GamePhase, GameState};
use super::world;
use crate::consts::MAX_TICK_DT;

/// A discrete player command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    MoveLeft,
    MoveRight,
    Jump,
    Slide,
}

/// Input commands for a single tick, applied in order
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub intents: Vec<Intent>,
}

impl TickInput {
    pub fn with(intent: Intent) -> Self {
        Self {
            intents: vec![intent],
        }
    }

    pub fn push(&mut self, intent: Intent) {
        self.intents.push(intent);
    }

    pub fn clear(&mut self) {
        self.intents.clear();
    }
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if state.phase != GamePhase::Playing {
        return;
    }
    let dt = dt.clamp(0.0, MAX_TICK_DT);
    state.time_ticks += 1;

    state.player.tick_timers(dt);

    for &intent in &input.intents {
        apply_intent(state, intent);
    }
    state.player.update_position(dt, state.tuning.jump_duration);

    world::advance(state, dt);
    collision::resolve(state);
}

/// Apply one intent; invalid intents are dropped
///
/// Returns whether the intent changed the player.
pub fn apply_intent(state: &mut GameState, intent: Intent) -> bool {
    let player = &mut state.player;
    if state.phase != GamePhase::Playing || player.is_dead() {
        log::trace!("{intent:?} rejected: not controllable");
        return false;
    }

    let airborne_or_low = player.is_jumping() || player.is_sliding();
    let accepted = match intent {
        Intent::MoveLeft | Intent::MoveRight if airborne_or_low => None,
        Intent::MoveLeft => player.lane.left().map(|lane| player.lane = lane),
        Intent::MoveRight => player.lane.right().map(|lane| player.lane = lane),
        Intent::Jump | Intent::Slide if airborne_or_low => None,
        Intent::Jump => {
            player.jump_remaining = state.tuning.jump_duration;
            Some(())
        }
        Intent::Slide => {
            player.slide_remaining = state.tuning.slide_duration;
            Some(())
        }
    };

    if accepted.is_none() {
        log::trace!("{intent:?} rejected");
    }
    accepted.is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Lane;
    use crate::tuning::Tuning;

    const DT: f32 = 1.0 / 60.0;

    fn playing_state() -> GameState {
        // Ground-only coins and no run-in obstacles keep early ticks predictable
        let tuning = Tuning {
            air_coin_chance: 0.0,
            ..Tuning::default()
        };
        let mut state = GameState::new(tuning, 12345);
        state.start_game();
        state
    }

    #[test]
    fn test_tick_ignored_outside_playing() {
        let mut state = GameState::new(Tuning::default(), 1);
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.time_ticks, 0);
        assert_eq!(state.world_offset, 0.0);
    }

    #[test]
    fn test_tick_scrolls_world() {
        let mut state = playing_state();
        tick(&mut state, &TickInput::default(), 0.05);
        assert_eq!(state.time_ticks, 1);
        assert!((state.progress() - 1.0).abs() < 1e-5);
        assert_eq!(state.segments.len(), 3);
    }

    #[test]
    fn test_dt_is_clamped() {
        let mut state = playing_state();
        tick(&mut state, &TickInput::default(), 5.0);
        assert!((state.progress() - state.tuning.base_speed * MAX_TICK_DT).abs() < 1e-4);
    }

    #[test]
    fn test_lane_changes_are_bounded() {
        let mut state = playing_state();
        assert!(apply_intent(&mut state, Intent::MoveLeft));
        assert_eq!(state.player.lane, Lane::Left);
        assert!(!apply_intent(&mut state, Intent::MoveLeft));
        assert_eq!(state.player.lane, Lane::Left);

        assert!(apply_intent(&mut state, Intent::MoveRight));
        assert!(apply_intent(&mut state, Intent::MoveRight));
        assert!(!apply_intent(&mut state, Intent::MoveRight));
        assert_eq!(state.player.lane, Lane::Right);
    }

    #[test]
    fn test_no_lane_change_while_airborne() {
        let mut state = playing_state();
        assert!(apply_intent(&mut state, Intent::Jump));
        assert!(!apply_intent(&mut state, Intent::MoveLeft));
        assert_eq!(state.player.lane, Lane::Center);
    }

    #[test]
    fn test_jump_and_slide_exclusive() {
        let mut state = playing_state();
        assert!(apply_intent(&mut state, Intent::Slide));
        assert!(!apply_intent(&mut state, Intent::Jump));
        assert!(state.player.is_sliding());
        assert!(!state.player.is_jumping());
    }

    #[test]
    fn test_no_input_while_invulnerable() {
        let mut state = playing_state();
        state.player.invulnerable_remaining = 0.5;
        assert!(!apply_intent(&mut state, Intent::Jump));
        assert!(!apply_intent(&mut state, Intent::MoveRight));
    }

    #[test]
    fn test_jump_expires() {
        let mut state = playing_state();
        tick(&mut state, &TickInput::with(Intent::Jump), DT);
        assert!(state.player.is_jumping());
        tick(&mut state, &TickInput::default(), DT);
        assert!(state.player.position.y > 0.0);

        // 0.8 s at 60 Hz, plus a couple of frames of slack
        for _ in 0..50 {
            if state.phase != GamePhase::Playing {
                break;
            }
            tick(&mut state, &TickInput::default(), DT);
        }
        assert!(!state.player.is_jumping());
        assert_eq!(state.player.position.y, 0.0);
    }

    #[test]
    fn test_intents_apply_in_order() {
        let mut state = playing_state();
        let mut input = TickInput::default();
        input.push(Intent::MoveLeft);
        input.push(Intent::Jump);
        input.push(Intent::MoveRight);
        tick(&mut state, &input, DT);

        assert_eq!(state.player.lane, Lane::Left);
        assert!(state.player.is_jumping());
    }

    #[test]
    fn test_invulnerability_wears_off() {
        let mut state = playing_state();
        state.player.invulnerable_remaining = state.tuning.invulnerability_duration;
        for _ in 0..61 {
            tick(&mut state, &TickInput::default(), DT);
        }
        assert!(!state.player.is_dead());
    }
}
