//! Procedural track segment generation
//!
//! A segment of length L with n obstacles is split into n + 1 equal zones.
//! Zone 0 is a clear run-in; obstacle i sits somewhere in the central part of
//! zone i + 1, so obstacles never share a zone and keep a minimum spacing.
//! Coins are spread evenly along the segment, skipping any spot too close to an
//! obstacle.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::state::{
    Collectible, CollectibleKind, Difficulty, Lane, Obstacle, ObstacleKind, TrackSegment,
};
use crate::consts::*;
use crate::tuning::Tuning;

const BASIC_KINDS: [ObstacleKind; 2] = [ObstacleKind::Barrier, ObstacleKind::Gap];
const EXTENDED_KINDS: [ObstacleKind; 3] = [
    ObstacleKind::Barrier,
    ObstacleKind::Gap,
    ObstacleKind::Overhead,
];

/// Builds track segments from a private RNG stream
#[derive(Debug, Clone)]
pub struct TrackGenerator {
    tuning: Tuning,
    rng: Pcg32,
    next_id: u32,
}

impl TrackGenerator {
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        Self {
            tuning,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    /// Generate a populated segment starting at `start_z`
    pub fn generate(&mut self, start_z: f32) -> TrackSegment {
        let difficulty = self.tuning.difficulty_for(start_z);
        let length = self.tuning.segment_length;
        let id = self.next_entity_id();

        let obstacles = self.place_obstacles(difficulty, length);
        let collectibles = self.place_collectibles(length, &obstacles);

        log::trace!(
            "Segment {id} at z={start_z}: {difficulty:?}, {} obstacles, {} coins",
            obstacles.len(),
            collectibles.len()
        );

        TrackSegment {
            id,
            difficulty,
            position: Vec3::new(0.0, 0.0, start_z),
            obstacles,
            collectibles,
            length,
        }
    }

    fn random_lane(&mut self) -> Lane {
        Lane::ALL[self.rng.random_range(0..Lane::ALL.len())]
    }

    fn place_obstacles(&mut self, difficulty: Difficulty, length: f32) -> Vec<Obstacle> {
        let count = self.tuning.obstacle_count(difficulty);
        let zone_length = length / (count + 1) as f32;
        let margin = zone_length * (1.0 - self.tuning.obstacle_zone_fraction) / 2.0;
        let scale = Vec3::splat(difficulty.obstacle_scale());

        let kinds: &[ObstacleKind] = if self.tuning.overhead_obstacles {
            &EXTENDED_KINDS
        } else {
            &BASIC_KINDS
        };

        let mut obstacles = Vec::with_capacity(count as usize);
        for zone in 1..=count {
            let zone_start = zone as f32 * zone_length;
            let z = self
                .rng
                .random_range(zone_start + margin..=zone_start + zone_length - margin);
            let kind = kinds[self.rng.random_range(0..kinds.len())];
            let lane = self.random_lane();
            let y = match kind {
                ObstacleKind::Overhead => OVERHEAD_BOTTOM,
                ObstacleKind::Barrier | ObstacleKind::Gap => 0.0,
            };

            obstacles.push(Obstacle {
                id: self.next_entity_id(),
                kind,
                position: Vec3::new(lane.x(), y, z),
                lane,
                scale,
            });
        }
        obstacles
    }

    fn place_collectibles(&mut self, length: f32, obstacles: &[Obstacle]) -> Vec<Collectible> {
        let count = self
            .rng
            .random_range(self.tuning.coins_min..=self.tuning.coins_max);
        if count == 0 {
            return Vec::new();
        }
        let spacing = length / count as f32;
        let clearance = self.tuning.coin_clearance;

        let mut collectibles = Vec::with_capacity(count as usize);
        for i in 0..count {
            let z = i as f32 * spacing;
            let blocked = obstacles
                .iter()
                .any(|o| (o.position.z - z).abs() <= o.half_depth() + clearance);
            if blocked {
                continue;
            }

            let lane = self.random_lane();
            let y = if self.rng.random_bool(self.tuning.air_coin_chance) {
                AIR_COIN_HEIGHT
            } else {
                0.0
            };

            collectibles.push(Collectible {
                id: self.next_entity_id(),
                kind: CollectibleKind::Coin,
                position: Vec3::new(lane.x(), y, z),
                lane,
                collected: false,
            });
        }
        collectibles
    }
}
