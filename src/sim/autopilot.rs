//! Demo-mode AI
//!
//! Reads the state like the player would and produces intents: dodge into a
//! clear lane when there is room, otherwise jump or slide at the last moment,
//! and drift toward coins when nothing is threatening.

use super::state::{GameState, Lane, ObstacleKind};
use super::tick::{Intent, TickInput};
use crate::consts::PLAYER_Z;

/// How far ahead (world units) the autopilot looks
const LOOKAHEAD: f32 = 30.0;

/// Distance ahead of the player for every obstacle in a lane, nearest first
fn threats_in(state: &GameState, lane: Lane) -> Vec<(f32, ObstacleKind)> {
    let mut threats: Vec<_> = state
        .segments
        .iter()
        .flat_map(|segment| {
            segment.obstacles.iter().filter(move |o| o.lane == lane).map(move |o| {
                let ahead = segment.world_z(o.position.z) + state.world_offset - PLAYER_Z;
                (ahead, o.kind)
            })
        })
        .filter(|&(ahead, _)| ahead > -1.0 && ahead < LOOKAHEAD)
        .collect();
    threats.sort_by(|a, b| a.0.total_cmp(&b.0));
    threats
}

/// Distance to the nearest uncollected coin in a lane
fn nearest_coin(state: &GameState, lane: Lane) -> Option<f32> {
    state
        .segments
        .iter()
        .flat_map(|segment| {
            segment
                .collectibles
                .iter()
                .filter(move |c| c.lane == lane && !c.collected)
                .map(move |c| segment.world_z(c.position.z) + state.world_offset - PLAYER_Z)
        })
        .filter(|&ahead| ahead > 0.0 && ahead < LOOKAHEAD)
        .min_by(|a, b| a.total_cmp(b))
}

fn step_toward(from: Lane, to: Lane) -> Option<Intent> {
    match to.offset().cmp(&from.offset()) {
        std::cmp::Ordering::Less => Some(Intent::MoveLeft),
        std::cmp::Ordering::Greater => Some(Intent::MoveRight),
        std::cmp::Ordering::Equal => None,
    }
}

/// Choose this tick's input
pub fn drive(state: &GameState) -> TickInput {
    let player = &state.player;
    if player.is_dead() {
        return TickInput::default();
    }
    let lane = player.lane;
    let busy = player.is_jumping() || player.is_sliding();

    let threats = threats_in(state, lane);
    if let Some(&(ahead, kind)) = threats.first() {
        // React distance: about half the jump covered before the obstacle
        let react = state.speed * state.tuning.jump_duration * 0.4;

        if !busy {
            let clear_neighbor = [lane.left(), lane.right()]
                .into_iter()
                .flatten()
                .find(|&l| threats_in(state, l).first().is_none_or(|&(a, _)| a > react * 2.0));
            if ahead > react * 0.5 {
                if let Some(target) = clear_neighbor {
                    return step_toward(lane, target).map(TickInput::with).unwrap_or_default();
                }
            }
        }

        if ahead <= react && !busy {
            return TickInput::with(match kind {
                ObstacleKind::Barrier | ObstacleKind::Gap => Intent::Jump,
                ObstacleKind::Overhead => Intent::Slide,
            });
        }
        return TickInput::default();
    }

    if busy {
        return TickInput::default();
    }

    // Nothing in the way: go after the closest coin in a safe lane
    let target = Lane::ALL
        .into_iter()
        .filter(|&l| threats_in(state, l).is_empty())
        .filter_map(|l| nearest_coin(state, l).map(|d| (l, d)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(l, _)| l);

    target
        .and_then(|t| step_toward(lane, t))
        .map(TickInput::with)
        .unwrap_or_default()
}
