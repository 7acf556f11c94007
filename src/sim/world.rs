//! World scrolling and segment recycling
//!
//! The player never moves along Z; the world offset decreases instead and
//! segments the player has left behind are swapped for fresh ones ahead.

use super::state::{GameEvent, GameState};

/// Scroll the world by `speed * dt` and keep the segment window full
pub fn advance(state: &mut GameState, dt: f32) {
    let step = state.speed * dt;
    state.world_offset -= step;
    state.last_step = step;

    let progress = state.progress();
    state.distance = progress * state.tuning.distance_scale;
    state.score = state.distance.floor() as u64;

    recycle(state);
}

/// Drop segments the player has fully passed and append new ones
pub fn recycle(state: &mut GameState) {
    let length = state.tuning.segment_length;
    let progress = state.progress();

    if state.segments.is_empty() {
        let anchor_z = (progress / length).floor() * length;
        log::warn!("Segment window empty, regenerating anchor at z={anchor_z}");
        let segment = state.generator.generate(anchor_z);
        state.segments.push_back(segment);
        state.events.push(GameEvent::TrackRecovered { anchor_z });
        return;
    }

    while state.segments.len() < state.tuning.visible_segments {
        let Some(next_z) = state.segments.back().map(|s| s.end_z()) else {
            break;
        };
        let segment = state.generator.generate(next_z);
        state.segments.push_back(segment);
    }

    let lag = state.tuning.recycle_lag;
    loop {
        let passed = state
            .segments
            .front()
            .is_some_and(|oldest| progress >= oldest.end_z() + lag);
        if !passed {
            break;
        }

        let Some(dropped) = state.segments.pop_front() else {
            break;
        };
        let next_z = state
            .segments
            .back()
            .map(|s| s.end_z())
            .unwrap_or_else(|| dropped.end_z());
        let segment = state.generator.generate(next_z);

        log::debug!(
            "Recycled segment {} -> {} at z={next_z} ({:?})",
            dropped.id,
            segment.id,
            segment.difficulty
        );
        state.events.push(GameEvent::SegmentRecycled {
            dropped: dropped.id,
            spawned: segment.id,
        });
        state.segments.push_back(segment);
        state.increase_speed();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Difficulty, GamePhase};
    use crate::tuning::Tuning;

    fn playing_state(tuning: Tuning) -> GameState {
        let mut state = GameState::new(tuning, 11);
        state.start_game();
        state
    }

    fn assert_contiguous(state: &GameState) {
        let segments: Vec<_> = state.segments.iter().collect();
        for pair in segments.windows(2) {
            assert_eq!(pair[0].end_z(), pair[1].position.z);
        }
    }

    #[test]
    fn test_advance_scrolls_and_scores() {
        let mut state = playing_state(Tuning::default());
        advance(&mut state, 0.5);

        assert_eq!(state.last_step, 10.0);
        assert_eq!(state.world_offset, -10.0);
        assert_eq!(state.progress(), 10.0);
        assert_eq!(state.distance, 50.0);
        assert_eq!(state.score, 50);
    }

    #[test]
    fn test_no_recycle_before_segment_passed() {
        let mut state = playing_state(Tuning::default());
        let first = state.segments[0].id;
        state.world_offset = -105.0;
        recycle(&mut state);
        assert_eq!(state.segments[0].id, first);
    }

    #[test]
    fn test_recycle_keeps_window() {
        let mut state = playing_state(Tuning::default());
        let first = state.segments[0].id;
        state.world_offset = -110.0;
        recycle(&mut state);

        assert_eq!(state.segments.len(), 3);
        assert_ne!(state.segments[0].id, first);
        assert_eq!(state.segments[0].position.z, 100.0);
        assert_eq!(state.segments[2].position.z, 300.0);
        assert_eq!(state.segments[2].difficulty, Difficulty::Medium);
        assert_contiguous(&state);
        assert_eq!(state.speed, 21.0);
    }

    #[test]
    fn test_literal_rule_without_lag() {
        let tuning = Tuning {
            recycle_lag: 0.0,
            ..Tuning::default()
        };
        let mut state = playing_state(tuning);
        state.world_offset = -100.0;
        recycle(&mut state);
        assert_eq!(state.segments[0].position.z, 100.0);
    }

    #[test]
    fn test_large_jump_recycles_repeatedly() {
        let mut state = playing_state(Tuning::default());
        state.world_offset = -1000.0;
        recycle(&mut state);

        assert_eq!(state.segments.len(), 3);
        assert!(state.segments[0].end_z() + state.tuning.recycle_lag > 1000.0);
        assert_contiguous(&state);
    }

    #[test]
    fn test_empty_window_recovers_with_anchor() {
        let mut state = playing_state(Tuning::default());
        state.segments.clear();
        state.world_offset = -257.0;
        recycle(&mut state);

        assert_eq!(state.segments.len(), 1);
        assert_eq!(state.segments[0].position.z, 200.0);
        assert!(state.events.contains(&GameEvent::TrackRecovered { anchor_z: 200.0 }));

        // Next pass tops the window back up
        recycle(&mut state);
        assert_eq!(state.segments.len(), 3);
        assert_contiguous(&state);
        assert_eq!(state.phase, GamePhase::Playing);
    }
}
