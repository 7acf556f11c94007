//! Game balance tuning
//!
//! Every gameplay constant that is a matter of taste lives here rather than in
//! `consts`. Loaded from JSON; missing fields fall back to the defaults.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::MAX_TICK_DT;
use crate::sim::Difficulty;

/// Upper bounds that keep allocations and float precision sane
const MAX_VISIBLE_SEGMENTS: usize = 16;
const MAX_SEGMENT_LENGTH: f32 = 10_000.0;
const MAX_PER_SEGMENT: u32 = 256;

/// Errors produced while loading tuning data
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("malformed tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning: {0}")]
    Invalid(String),
}

/// Gameplay tuning values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Track ===
    /// Length of one track segment
    pub segment_length: f32,
    /// Number of segments kept in the active window
    pub visible_segments: usize,
    /// How far past a segment's end the player must be before it is dropped
    pub recycle_lag: f32,
    /// Segments starting at or beyond this Z are medium
    pub medium_threshold: f32,
    /// Segments starting at or beyond this Z are hard
    pub hard_threshold: f32,

    // === Obstacles ===
    pub obstacles_easy: u32,
    pub obstacles_medium: u32,
    pub obstacles_hard: u32,
    /// Fraction of each zone (centered) an obstacle may be placed in
    pub obstacle_zone_fraction: f32,
    /// Also generate overhead obstacles (slide to pass)
    pub overhead_obstacles: bool,

    // === Coins ===
    pub coins_min: u32,
    pub coins_max: u32,
    /// Extra Z distance kept free around each obstacle
    pub coin_clearance: f32,
    /// Chance a coin is placed at jump height
    pub air_coin_chance: f64,
    /// Z distance within which a coin is picked up
    pub coin_pickup_tolerance: f32,

    // === Speed and scoring ===
    pub base_speed: f32,
    pub max_speed: f32,
    /// Added every time a segment is recycled
    pub speed_step: f32,
    /// Distance (meters) per unit of track progress
    pub distance_scale: f32,

    // === Player ===
    pub starting_lives: u8,
    pub jump_duration: f32,
    pub slide_duration: f32,
    pub invulnerability_duration: f32,

    // === Damage ===
    pub barrier_damage: u8,
    pub gap_damage: u8,
    pub overhead_damage: u8,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            segment_length: 100.0,
            visible_segments: 3,
            recycle_lag: 10.0,
            medium_threshold: 300.0,
            hard_threshold: 600.0,

            obstacles_easy: 2,
            obstacles_medium: 3,
            obstacles_hard: 4,
            obstacle_zone_fraction: 0.6,
            overhead_obstacles: false,

            coins_min: 5,
            coins_max: 10,
            coin_clearance: 1.0,
            air_coin_chance: 0.3,
            coin_pickup_tolerance: 1.2,

            base_speed: 20.0,
            max_speed: 30.0,
            speed_step: 1.0,
            distance_scale: 5.0,

            starting_lives: 3,
            jump_duration: 0.8,
            slide_duration: 0.8,
            invulnerability_duration: 1.0,

            barrier_damage: 3,
            gap_damage: 1,
            overhead_damage: 1,
        }
    }
}

impl Tuning {
    /// Parse and validate tuning from JSON
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Check the invariants the simulation relies on
    pub fn validate(&self) -> Result<(), TuningError> {
        let invalid = |msg: &str| Err(TuningError::Invalid(msg.to_string()));

        let finite = [
            ("segment_length", self.segment_length),
            ("recycle_lag", self.recycle_lag),
            ("medium_threshold", self.medium_threshold),
            ("hard_threshold", self.hard_threshold),
            ("obstacle_zone_fraction", self.obstacle_zone_fraction),
            ("coin_clearance", self.coin_clearance),
            ("coin_pickup_tolerance", self.coin_pickup_tolerance),
            ("base_speed", self.base_speed),
            ("max_speed", self.max_speed),
            ("speed_step", self.speed_step),
            ("distance_scale", self.distance_scale),
            ("jump_duration", self.jump_duration),
            ("slide_duration", self.slide_duration),
            ("invulnerability_duration", self.invulnerability_duration),
        ];
        if let Some((name, _)) = finite.iter().find(|(_, value)| !value.is_finite()) {
            return Err(TuningError::Invalid(format!("{name} must be a finite number")));
        }

        if !(2..=MAX_VISIBLE_SEGMENTS).contains(&self.visible_segments) {
            return invalid("visible_segments must be between 2 and 16");
        }
        if !(self.segment_length > 0.0 && self.segment_length <= MAX_SEGMENT_LENGTH) {
            return invalid("segment_length must be in (0, 10000]");
        }
        if self.recycle_lag < 0.0 || self.recycle_lag > self.segment_length {
            return invalid("recycle_lag must be in [0, segment_length]");
        }
        if self.medium_threshold > self.hard_threshold {
            return invalid("medium_threshold must not exceed hard_threshold");
        }
        if self.obstacles_hard == 0 || self.obstacles_hard > MAX_PER_SEGMENT {
            return invalid("hard segments need between 1 and 256 obstacles");
        }
        if self.obstacles_easy > self.obstacles_medium || self.obstacles_medium > self.obstacles_hard
        {
            return invalid("obstacle counts must not decrease with difficulty");
        }
        if !(self.obstacle_zone_fraction > 0.0 && self.obstacle_zone_fraction <= 1.0) {
            return invalid("obstacle_zone_fraction must be in (0, 1]");
        }
        if self.coins_min > self.coins_max || self.coins_max > MAX_PER_SEGMENT {
            return invalid("coins_min must not exceed coins_max, which is at most 256");
        }
        if self.coin_clearance < 0.0 || self.coin_pickup_tolerance < 0.0 {
            return invalid("coin distances must not be negative");
        }
        if !(0.0..=1.0).contains(&self.air_coin_chance) {
            return invalid("air_coin_chance must be in [0, 1]");
        }
        if !(self.base_speed > 0.0) || self.base_speed > self.max_speed {
            return invalid("base_speed must be positive and at most max_speed");
        }
        if self.max_speed * MAX_TICK_DT > self.segment_length {
            return invalid("max_speed may cover at most one segment per tick");
        }
        if self.speed_step < 0.0 || self.distance_scale < 0.0 {
            return invalid("speed_step and distance_scale must not be negative");
        }
        if !(self.jump_duration > 0.0 && self.slide_duration > 0.0)
            || self.invulnerability_duration < 0.0
        {
            return invalid("jump and slide durations must be positive");
        }
        if self.starting_lives == 0 {
            return invalid("starting_lives must be at least 1");
        }
        Ok(())
    }

    /// Difficulty tier for a segment starting at `start_z`
    pub fn difficulty_for(&self, start_z: f32) -> Difficulty {
        if start_z < self.medium_threshold {
            Difficulty::Easy
        } else if start_z < self.hard_threshold {
            Difficulty::Medium
        } else {
            Difficulty::Hard
        }
    }

    /// Obstacles generated per segment at a difficulty
    pub fn obstacle_count(&self, difficulty: Difficulty) -> u32 {
        match difficulty {
            Difficulty::Easy => self.obstacles_easy,
            Difficulty::Medium => self.obstacles_medium,
            Difficulty::Hard => self.obstacles_hard,
        }
    }
}
