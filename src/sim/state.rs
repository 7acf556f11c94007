//! Game state and core simulation types
//!
//! `GameState` is the authoritative record every other sim module reads and
//! writes. It also owns the lives and phase transitions.

use std::collections::VecDeque;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::track::TrackGenerator;
use crate::consts::*;
use crate::tuning::Tuning;
use crate::{approach, lane_to_x};

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Main menu, nothing simulated
    Menu,
    /// Active run
    Playing,
    /// Run ended
    GameOver,
    /// Shop screen
    Shop,
}

/// One of the three lanes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
pub enum Lane {
    Left,
    #[default]
    Center,
    Right,
}

impl Lane {
    pub const ALL: [Lane; 3] = [Lane::Left, Lane::Center, Lane::Right];

    /// Lane offset: -1, 0 or 1
    pub fn offset(self) -> i8 {
        match self {
            Lane::Left => -1,
            Lane::Center => 0,
            Lane::Right => 1,
        }
    }

    /// World X of the lane center
    pub fn x(self) -> f32 {
        lane_to_x(self.offset())
    }

    /// Lane to the left, if any
    pub fn left(self) -> Option<Lane> {
        match self {
            Lane::Left => None,
            Lane::Center => Some(Lane::Left),
            Lane::Right => Some(Lane::Center),
        }
    }

    /// Lane to the right, if any
    pub fn right(self) -> Option<Lane> {
        match self {
            Lane::Left => Some(Lane::Center),
            Lane::Center => Some(Lane::Right),
            Lane::Right => None,
        }
    }
}

impl From<Lane> for i8 {
    fn from(lane: Lane) -> Self {
        lane.offset()
    }
}

impl TryFrom<i8> for Lane {
    type Error = String;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Lane::Left),
            0 => Ok(Lane::Center),
            1 => Ok(Lane::Right),
            other => Err(format!("lane out of range: {other}")),
        }
    }
}

/// Segment difficulty tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Uniform obstacle scale for the tier
    pub fn obstacle_scale(self) -> f32 {
        match self {
            Difficulty::Easy => 0.8,
            Difficulty::Medium => 1.0,
            Difficulty::Hard => 1.2,
        }
    }
}

/// Obstacle types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Wall on the track, jump over it
    Barrier,
    /// Hole in the track, jump across it
    Gap,
    /// Bar above the track, slide under it
    Overhead,
}

/// An obstacle, positioned relative to its segment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    pub position: Vec3,
    pub lane: Lane,
    pub scale: Vec3,
}

impl Obstacle {
    /// Half of the obstacle's extent along Z
    pub fn half_depth(&self) -> f32 {
        OBSTACLE_DEPTH * self.scale.z / 2.0
    }

    /// Vertical extent (bottom, top) in track space
    pub fn vertical_extent(&self) -> (f32, f32) {
        match self.kind {
            ObstacleKind::Barrier => (0.0, BARRIER_HEIGHT * self.scale.y),
            ObstacleKind::Gap => (GAP_BOTTOM, GAP_TOP),
            ObstacleKind::Overhead => (OVERHEAD_BOTTOM, OVERHEAD_BOTTOM + self.scale.y),
        }
    }
}

/// Collectible types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectibleKind {
    Coin,
}

/// A collectible, positioned relative to its segment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collectible {
    pub id: u32,
    pub kind: CollectibleKind,
    pub position: Vec3,
    pub lane: Lane,
    pub collected: bool,
}

impl Collectible {
    /// Placed at jump height
    pub fn is_airborne(&self) -> bool {
        self.position.y > AIR_COIN_THRESHOLD
    }
}

/// A fixed-length slice of track
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackSegment {
    pub id: u32,
    pub difficulty: Difficulty,
    /// World-space start of the segment
    pub position: Vec3,
    pub obstacles: Vec<Obstacle>,
    pub collectibles: Vec<Collectible>,
    pub length: f32,
}

impl TrackSegment {
    /// World Z where the segment ends (and the next one starts)
    pub fn end_z(&self) -> f32 {
        self.position.z + self.length
    }

    /// World Z of a segment-relative offset
    pub fn world_z(&self, local_z: f32) -> f32 {
        self.position.z + local_z
    }
}

/// Vertical stance, derived from the jump/slide timers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stance {
    Running,
    Jumping,
    Sliding,
}

impl Stance {
    /// Vertical extent (bottom, top) of the player's box in this stance
    pub fn vertical_extent(self) -> (f32, f32) {
        match self {
            Stance::Running => (0.0, PLAYER_SIZE.y),
            Stance::Jumping => (JUMP_CLEARANCE, JUMP_CLEARANCE + PLAYER_SIZE.y),
            Stance::Sliding => (0.0, PLAYER_SIZE.y / 2.0),
        }
    }
}

/// The player character
///
/// Jump, slide and invulnerability are countdowns in seconds; a positive
/// value means the state is active.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub position: Vec3,
    pub lane: Lane,
    pub jump_remaining: f32,
    pub slide_remaining: f32,
    pub invulnerable_remaining: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, PLAYER_Z),
            lane: Lane::Center,
            jump_remaining: 0.0,
            slide_remaining: 0.0,
            invulnerable_remaining: 0.0,
        }
    }
}

impl Player {
    pub fn is_jumping(&self) -> bool {
        self.jump_remaining > 0.0
    }

    pub fn is_sliding(&self) -> bool {
        self.slide_remaining > 0.0
    }

    /// Recently hit; damage and pickups are ignored
    pub fn is_dead(&self) -> bool {
        self.invulnerable_remaining > 0.0
    }

    pub fn stance(&self) -> Stance {
        if self.is_jumping() {
            Stance::Jumping
        } else if self.is_sliding() {
            Stance::Sliding
        } else {
            Stance::Running
        }
    }

    /// Count down all timers
    pub fn tick_timers(&mut self, dt: f32) {
        self.jump_remaining = (self.jump_remaining - dt).max(0.0);
        self.slide_remaining = (self.slide_remaining - dt).max(0.0);
        self.invulnerable_remaining = (self.invulnerable_remaining - dt).max(0.0);
    }

    /// Cancel every pending timer
    pub fn clear_timers(&mut self) {
        self.jump_remaining = 0.0;
        self.slide_remaining = 0.0;
        self.invulnerable_remaining = 0.0;
    }

    /// Update the rendered position (lane smoothing and jump arc)
    pub fn update_position(&mut self, dt: f32, jump_duration: f32) {
        self.position.x = approach(self.position.x, self.lane.x(), LANE_SWITCH_RATE, dt);
        self.position.y = if self.is_jumping() && jump_duration > 0.0 {
            let progress = 1.0 - self.jump_remaining / jump_duration;
            (progress * std::f32::consts::PI).sin() * JUMP_HEIGHT
        } else {
            0.0
        };
        self.position.z = PLAYER_Z;
    }
}

/// Things that happened during a tick, drained by the session
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    CoinCollected { segment_id: u32, collectible_id: u32 },
    Hit { obstacle_id: u32, kind: ObstacleKind, damage: u8 },
    GameOver { score: u64, new_high_score: bool },
    SegmentRecycled { dropped: u32, spawned: u32 },
    TrackRecovered { anchor_z: f32 },
    SpeedUp { speed: f32 },
}

/// Complete simulation state
#[derive(Debug, Clone, Serialize)]
pub struct GameState {
    pub phase: GamePhase,
    pub score: u64,
    pub high_score: u64,
    pub lives: u8,
    /// Coins collected this run
    pub coins: u32,
    /// Coins across all runs (spendable in the shop)
    pub total_coins: u64,
    /// Meters run this game
    pub distance: f32,
    pub speed: f32,
    /// Decreases as the world scrolls toward the player
    pub world_offset: f32,
    /// Distance scrolled during the last tick
    pub last_step: f32,
    /// Active window, oldest first
    pub segments: VecDeque<TrackSegment>,
    pub player: Player,
    pub time_ticks: u64,
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    #[serde(skip)]
    pub tuning: Tuning,
    #[serde(skip)]
    pub generator: TrackGenerator,
}

impl GameState {
    /// Create a state sitting in the menu
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        let generator = TrackGenerator::new(tuning.clone(), seed);
        Self {
            phase: GamePhase::Menu,
            score: 0,
            high_score: 0,
            lives: tuning.starting_lives,
            coins: 0,
            total_coins: 0,
            distance: 0.0,
            speed: tuning.base_speed,
            world_offset: 0.0,
            last_step: 0.0,
            segments: VecDeque::with_capacity(tuning.visible_segments),
            player: Player::default(),
            time_ticks: 0,
            events: Vec::new(),
            tuning,
            generator,
        }
    }

    /// Player's cumulative forward progress along the track
    pub fn progress(&self) -> f32 {
        -self.world_offset
    }

    /// Begin a run from the menu or the game-over screen
    pub fn start_game(&mut self) {
        match self.phase {
            GamePhase::Menu | GamePhase::GameOver => self.begin_run(),
            phase => log::debug!("start_game ignored in {phase:?}"),
        }
    }

    /// Start over after a game over
    pub fn restart_game(&mut self) {
        match self.phase {
            GamePhase::GameOver => self.begin_run(),
            phase => log::debug!("restart_game ignored in {phase:?}"),
        }
    }

    pub fn open_shop(&mut self) {
        match self.phase {
            GamePhase::Menu => self.phase = GamePhase::Shop,
            phase => log::debug!("open_shop ignored in {phase:?}"),
        }
    }

    pub fn return_to_menu(&mut self) {
        match self.phase {
            GamePhase::Shop | GamePhase::GameOver => {
                self.reset_run();
                self.phase = GamePhase::Menu;
            }
            phase => log::debug!("return_to_menu ignored in {phase:?}"),
        }
    }

    /// Reset every run-scoped field; persistent stats are kept
    pub fn reset_run(&mut self) {
        self.score = 0;
        self.lives = self.tuning.starting_lives;
        self.coins = 0;
        self.distance = 0.0;
        self.speed = self.tuning.base_speed;
        self.world_offset = 0.0;
        self.last_step = 0.0;
        self.time_ticks = 0;
        self.segments.clear();
        self.player = Player::default();
        self.events.clear();
    }

    fn begin_run(&mut self) {
        self.reset_run();
        let length = self.tuning.segment_length;
        for i in 0..self.tuning.visible_segments {
            let segment = self.generator.generate(i as f32 * length);
            self.segments.push_back(segment);
        }
        self.phase = GamePhase::Playing;
        log::info!("Run started with {} segments", self.segments.len());
    }

    /// Apply damage during a run unless the player is invulnerable
    pub fn decrement_lives(&mut self, amount: u8) {
        if self.phase != GamePhase::Playing || self.player.is_dead() {
            return;
        }

        self.lives = self.lives.saturating_sub(amount);
        self.player.invulnerable_remaining = self.tuning.invulnerability_duration;

        if self.lives == 0 {
            self.end_game();
        }
    }

    /// Add coins to the run and to the persistent total
    pub fn increment_coins(&mut self, amount: u32) {
        self.coins += amount;
        self.total_coins += u64::from(amount);
    }

    /// Ramp speed up by one step, capped at the maximum
    pub fn increase_speed(&mut self) {
        let speed = (self.speed + self.tuning.speed_step).min(self.tuning.max_speed);
        if speed > self.speed {
            self.speed = speed;
            self.events.push(GameEvent::SpeedUp { speed });
        }
    }

    /// Pending timers are cancelled, so `is_dead` reads false once the run is over
    fn end_game(&mut self) {
        let new_high_score = self.score > self.high_score;
        self.high_score = self.high_score.max(self.score);
        self.phase = GamePhase::GameOver;
        self.player.clear_timers();
        self.events.push(GameEvent::GameOver {
            score: self.score,
            new_high_score,
        });
        log::info!(
            "Game over: score={} coins={} high_score={}",
            self.score,
            self.coins,
            self.high_score
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playing_state() -> GameState {
        let mut state = GameState::new(Tuning::default(), 7);
        state.start_game();
        state
    }

    #[test]
    fn test_phase_machine() {
        let mut state = GameState::new(Tuning::default(), 1);
        assert_eq!(state.phase, GamePhase::Menu);

        state.open_shop();
        assert_eq!(state.phase, GamePhase::Shop);
        state.start_game();
        assert_eq!(state.phase, GamePhase::Shop, "cannot start from the shop");
        state.return_to_menu();
        assert_eq!(state.phase, GamePhase::Menu);

        state.start_game();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.segments.len(), 3);

        state.restart_game();
        assert_eq!(state.phase, GamePhase::Playing, "restart only from game over");
    }

    #[test]
    fn test_initial_window_is_contiguous() {
        let state = playing_state();
        for pair in state.segments.iter().collect::<Vec<_>>().windows(2) {
            assert_eq!(pair[0].end_z(), pair[1].position.z);
        }
        assert_eq!(state.segments[0].position.z, 0.0);
    }

    #[test]
    fn test_damage_starts_invulnerability() {
        let mut state = playing_state();
        state.decrement_lives(1);
        assert_eq!(state.lives, 2);
        assert!(state.player.is_dead());
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_damage_ignored_while_invulnerable() {
        let mut state = playing_state();
        state.decrement_lives(1);
        let lives = state.lives;
        let remaining = state.player.invulnerable_remaining;

        state.decrement_lives(3);
        assert_eq!(state.lives, lives);
        assert_eq!(state.player.invulnerable_remaining, remaining);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_lethal_damage_ends_game() {
        let mut state = playing_state();
        state.high_score = 10;
        state.score = 42;
        state.decrement_lives(5);

        assert_eq!(state.lives, 0);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.high_score, 42);
        assert!(state.events.contains(&GameEvent::GameOver {
            score: 42,
            new_high_score: true
        }));
    }

    #[test]
    fn test_damage_outside_a_run_is_ignored() {
        let mut state = GameState::new(Tuning::default(), 2);
        state.decrement_lives(3);
        assert_eq!(state.phase, GamePhase::Menu);
        assert_eq!(state.lives, 3);
        assert!(state.events.is_empty());

        state.open_shop();
        state.decrement_lives(3);
        assert_eq!(state.phase, GamePhase::Shop);
        assert_eq!(state.lives, 3);

        state.return_to_menu();
        state.start_game();
        state.decrement_lives(3);
        assert_eq!(state.phase, GamePhase::GameOver);
        state.decrement_lives(1);
        assert_eq!(state.lives, 0);
        assert_eq!(state.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_restart_resets_tick_counter() {
        let mut state = playing_state();
        state.time_ticks = 500;
        state.decrement_lives(3);
        state.restart_game();
        assert_eq!(state.time_ticks, 0);
    }

    #[test]
    fn test_game_over_clears_timers() {
        let mut state = playing_state();
        state.player.jump_remaining = 0.3;
        state.decrement_lives(3);
        assert_eq!(state.player.stance(), Stance::Running);
        assert!(!state.player.is_dead());
    }

    #[test]
    fn test_high_score_kept_when_not_beaten() {
        let mut state = playing_state();
        state.high_score = 500;
        state.score = 42;
        state.decrement_lives(3);
        assert_eq!(state.high_score, 500);
    }

    #[test]
    fn test_restart_resets_run_but_keeps_totals() {
        let mut state = playing_state();
        state.increment_coins(4);
        state.score = 99;
        state.decrement_lives(3);
        assert_eq!(state.phase, GamePhase::GameOver);

        state.restart_game();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.coins, 0);
        assert_eq!(state.score, 0);
        assert_eq!(state.lives, 3);
        assert_eq!(state.total_coins, 4);
        assert_eq!(state.high_score, 99);
        assert!(!state.player.is_dead(), "pending invulnerability is cancelled");
    }

    #[test]
    fn test_speed_is_capped() {
        let mut state = playing_state();
        for _ in 0..100 {
            state.increase_speed();
        }
        assert_eq!(state.speed, state.tuning.max_speed);
    }

    #[test]
    fn test_lane_bounds() {
        assert_eq!(Lane::Left.left(), None);
        assert_eq!(Lane::Right.right(), None);
        assert_eq!(Lane::Center.left(), Some(Lane::Left));
        assert_eq!(Lane::try_from(2), Err("lane out of range: 2".to_string()));
        assert_eq!(serde_json::to_string(&Lane::Left).unwrap(), "-1");
    }

    #[test]
    fn test_stance_priority() {
        let mut player = Player::default();
        assert_eq!(player.stance(), Stance::Running);
        player.slide_remaining = 0.5;
        assert_eq!(player.stance(), Stance::Sliding);
        player.tick_timers(1.0);
        assert_eq!(player.stance(), Stance::Running);
        assert_eq!(player.slide_remaining, 0.0);
    }
}
