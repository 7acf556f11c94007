//! Lane Runner - a three-lane endless runner
//!
//! Core modules:
//! - `sim`: Simulation (track generation, scrolling, collisions, game state)
//! - `tuning`: Data-driven game balance
//! - `persistence`: Key-value storage backends
//! - `profile`: Durable player record (high score, coins, purchases)
//! - `shop`: Item catalog and purchases
//! - `session`: Owned game session driven by the host loop
//! - `platform`: Browser/native platform glue

pub mod persistence;
pub mod platform;
pub mod profile;
pub mod session;
pub mod shop;
pub mod sim;
pub mod tuning;

pub use profile::Profile;
pub use session::Session;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    use glam::Vec3;

    /// Largest time step a single tick will integrate (seconds)
    pub const MAX_TICK_DT: f32 = 0.1;

    /// Horizontal distance between lane centers
    pub const LANE_WIDTH: f32 = 2.5;

    /// Player's fixed Z relative to the camera; the world scrolls past it
    pub const PLAYER_Z: f32 = -5.0;
    /// Player bounding box (width, height, depth)
    pub const PLAYER_SIZE: Vec3 = Vec3::new(0.8, 1.8, 0.8);
    /// Height the feet clear while jumping (collision stance)
    pub const JUMP_CLEARANCE: f32 = 1.25;
    /// Peak of the rendered jump arc
    pub const JUMP_HEIGHT: f32 = 2.5;
    /// Lateral smoothing rate toward the lane center (per second)
    pub const LANE_SWITCH_RATE: f32 = 10.0;

    /// Obstacle depth along Z at scale 1.0
    pub const OBSTACLE_DEPTH: f32 = 1.0;
    /// Barrier height at scale 1.0
    pub const BARRIER_HEIGHT: f32 = 1.0;
    /// Gap extends below the track surface
    pub const GAP_BOTTOM: f32 = -1.0;
    pub const GAP_TOP: f32 = 0.1;
    /// Underside of an overhead obstacle
    pub const OVERHEAD_BOTTOM: f32 = 1.2;

    /// Height of an air coin (ground coins sit at 0)
    pub const AIR_COIN_HEIGHT: f32 = 1.0;
    /// Coins above this height are air coins
    pub const AIR_COIN_THRESHOLD: f32 = 0.5;
}

/// World X coordinate of a lane offset (-1, 0, 1)
#[inline]
pub fn lane_to_x(lane: i8) -> f32 {
    lane as f32 * consts::LANE_WIDTH
}

/// Move `current` toward `target` by an exponential smoothing factor
#[inline]
pub fn approach(current: f32, target: f32, rate: f32, dt: f32) -> f32 {
    let t = (rate * dt).clamp(0.0, 1.0);
    current + (target - current) * t
}
