//! Simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Time only advances through `tick`
//! - Randomness only from the track generator's RNG
//! - No rendering, storage or platform dependencies

pub mod autopilot;
pub mod collision;
#[cfg(test)]
mod invariants;
pub mod state;
pub mod tick;
pub mod track;
pub mod world;

pub use collision::{Aabb, resolve};
pub use state::{
    Collectible, CollectibleKind, Difficulty, GameEvent, GamePhase, GameState, Lane, Obstacle,
    ObstacleKind, Player, Stance, TrackSegment,
};
pub use tick::{Intent, TickInput, apply_intent, tick};
pub use track::TrackGenerator;
pub use world::advance;
