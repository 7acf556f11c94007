//! Collision and pickup resolution
//!
//! Entities are tested against an axis-aligned player box at a fixed Z. The Z
//! test is swept over the distance scrolled this tick, so a large step cannot
//! carry an obstacle through the player between two frames.

use glam::Vec3;

use super::state::{
    Collectible, GameEvent, GamePhase, GameState, Lane, Obstacle, ObstacleKind, Stance,
};
use crate::consts::*;
use crate::tuning::Tuning;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Inclusive overlap on all three axes
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.cmple(other.max).all() && other.min.cmple(self.max).all()
    }
}

/// Player box for a lane and stance
pub fn player_bounds(lane: Lane, stance: Stance) -> Aabb {
    let (bottom, top) = stance.vertical_extent();
    let half_w = PLAYER_SIZE.x / 2.0;
    let half_d = PLAYER_SIZE.z / 2.0;
    let x = lane.x();
    Aabb::new(
        Vec3::new(x - half_w, bottom, PLAYER_Z - half_d),
        Vec3::new(x + half_w, top, PLAYER_Z + half_d),
    )
}

/// Obstacle volume swept over the last step
///
/// `view_z` is where the obstacle is now relative to the camera; one tick ago
/// it was `step` further ahead.
pub fn obstacle_bounds(obstacle: &Obstacle, view_z: f32, step: f32) -> Aabb {
    let (bottom, top) = obstacle.vertical_extent();
    let half_w = obstacle.scale.x / 2.0;
    let half_d = obstacle.half_depth();
    let x = obstacle.lane.x();
    Aabb::new(
        Vec3::new(x - half_w, bottom, view_z - half_d),
        Vec3::new(x + half_w, top, view_z + step.max(0.0) + half_d),
    )
}

/// Whether the stance gets past an obstacle kind
pub fn evades(kind: ObstacleKind, stance: Stance) -> bool {
    match kind {
        ObstacleKind::Barrier | ObstacleKind::Gap => stance == Stance::Jumping,
        ObstacleKind::Overhead => stance == Stance::Sliding,
    }
}

/// Lives lost when an obstacle blocks the player
pub fn damage_for(kind: ObstacleKind, tuning: &Tuning) -> u8 {
    match kind {
        ObstacleKind::Barrier => tuning.barrier_damage,
        ObstacleKind::Gap => tuning.gap_damage,
        ObstacleKind::Overhead => tuning.overhead_damage,
    }
}

/// Check whether an obstacle blocks the player this tick
pub fn obstacle_blocks(
    player_lane: Lane,
    stance: Stance,
    obstacle: &Obstacle,
    view_z: f32,
    step: f32,
) -> bool {
    if obstacle.lane != player_lane || evades(obstacle.kind, stance) {
        return false;
    }
    player_bounds(player_lane, stance).overlaps(&obstacle_bounds(obstacle, view_z, step))
}

/// Check whether the player picks up a collectible this tick
pub fn collectible_reached(
    player_lane: Lane,
    stance: Stance,
    collectible: &Collectible,
    view_z: f32,
    step: f32,
    tolerance: f32,
) -> bool {
    if collectible.collected || collectible.lane != player_lane {
        return false;
    }
    // Air coins need a jump, ground coins are missed while airborne
    if collectible.is_airborne() != (stance == Stance::Jumping) {
        return false;
    }
    PLAYER_Z >= view_z - tolerance && PLAYER_Z <= view_z + step.max(0.0) + tolerance
}

/// Resolve obstacle hits and pickups for the current tick
pub fn resolve(state: &mut GameState) {
    if state.phase != GamePhase::Playing || state.player.is_dead() {
        return;
    }

    let lane = state.player.lane;
    let stance = state.player.stance();
    let offset = state.world_offset;
    let step = state.last_step;

    // First blocking obstacle wins; at most one hit per tick
    let hit = state.segments.iter().find_map(|segment| {
        segment
            .obstacles
            .iter()
            .find(|o| obstacle_blocks(lane, stance, o, segment.world_z(o.position.z) + offset, step))
            .map(|o| (o.id, o.kind))
    });

    if let Some((obstacle_id, kind)) = hit {
        let damage = damage_for(kind, &state.tuning);
        log::debug!("Hit {kind:?} {obstacle_id} for {damage}");
        state.events.push(GameEvent::Hit {
            obstacle_id,
            kind,
            damage,
        });
        state.decrement_lives(damage);
        if state.phase != GamePhase::Playing {
            return;
        }
    }

    let tolerance = state.tuning.coin_pickup_tolerance;
    let mut picked = 0;
    for segment in state.segments.iter_mut() {
        let segment_z = segment.position.z;
        for coin in segment.collectibles.iter_mut() {
            let view_z = segment_z + coin.position.z + offset;
            if collectible_reached(lane, stance, coin, view_z, step, tolerance) {
                coin.collected = true;
                picked += 1;
                state.events.push(GameEvent::CoinCollected {
                    segment_id: segment.id,
                    collectible_id: coin.id,
                });
            }
        }
    }
    if picked > 0 {
        state.increment_coins(picked);
    }
}
