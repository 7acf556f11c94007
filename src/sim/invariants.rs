//! Randomized whole-run checks

use proptest::prelude::*;

use super::state::{GameEvent, GamePhase, GameState};
use super::tick::{Intent, TickInput, tick};
use crate::tuning::Tuning;

fn intent() -> impl Strategy<Value = Option<Intent>> {
    prop_oneof![
        4 => Just(None),
        1 => Just(Some(Intent::MoveLeft)),
        1 => Just(Some(Intent::MoveRight)),
        1 => Just(Some(Intent::Jump)),
        1 => Just(Some(Intent::Slide)),
    ]
}

fn frame_inputs() -> impl Strategy<Value = Vec<(Option<Intent>, f32)>> {
    prop::collection::vec((intent(), 0.0f32..0.2), 1..600)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn run_invariants_hold(seed in any::<u64>(), frames in frame_inputs()) {
        let tuning = Tuning::default();
        let mut state = GameState::new(tuning.clone(), seed);
        state.total_coins = 7;
        state.start_game();

        let mut picked_up = 0u32;
        let mut last_score = 0;

        for (intent, dt) in frames {
            let input = intent.map(TickInput::with).unwrap_or_default();
            tick(&mut state, &input, dt);

            for event in state.events.drain(..) {
                if matches!(event, GameEvent::CoinCollected { .. }) {
                    picked_up += 1;
                }
            }

            prop_assert!(state.lives <= tuning.starting_lives);
            prop_assert_eq!(state.lives == 0, state.phase == GamePhase::GameOver);
            prop_assert_eq!(state.coins, picked_up);
            prop_assert_eq!(state.total_coins, 7 + u64::from(picked_up));
            prop_assert!(state.score >= last_score);
            prop_assert!(state.speed >= tuning.base_speed && state.speed <= tuning.max_speed);
            last_score = state.score;

            if state.phase != GamePhase::Playing {
                prop_assert!(state.high_score >= state.score);
                break;
            }

            prop_assert_eq!(state.segments.len(), tuning.visible_segments);
            let segments: Vec<_> = state.segments.iter().collect();
            for pair in segments.windows(2) {
                prop_assert_eq!(pair[0].end_z(), pair[1].position.z);
                prop_assert!(pair[0].id != pair[1].id);
            }
            let oldest = segments[0];
            prop_assert!(state.progress() < oldest.end_z() + tuning.recycle_lag);
        }
    }

    #[test]
    fn same_seed_same_track(seed in any::<u64>()) {
        let mut a = GameState::new(Tuning::default(), seed);
        let mut b = GameState::new(Tuning::default(), seed);
        a.start_game();
        b.start_game();
        for _ in 0..120 {
            tick(&mut a, &TickInput::default(), 1.0 / 30.0);
            tick(&mut b, &TickInput::default(), 1.0 / 30.0);
        }
        prop_assert_eq!(a.phase, b.phase);
        prop_assert_eq!(a.lives, b.lives);
        prop_assert_eq!(a.coins, b.coins);
        let ids = |s: &GameState| s.segments.iter().map(|seg| seg.id).collect::<Vec<_>>();
        prop_assert_eq!(ids(&a), ids(&b));
    }
}
