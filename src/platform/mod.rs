//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input (key names to intents)
//! - Seeding the track generator
//! - The wasm32 bindings a browser renderer drives

#[cfg(target_arch = "wasm32")]
pub mod web;

use crate::sim::Intent;

/// Map a DOM `KeyboardEvent.key` value to an intent
pub fn intent_for_key(key: &str) -> Option<Intent> {
    match key {
        "ArrowLeft" => Some(Intent::MoveLeft),
        "ArrowRight" => Some(Intent::MoveRight),
        "ArrowUp" | " " => Some(Intent::Jump),
        "ArrowDown" => Some(Intent::Slide),
        _ => match key.to_ascii_lowercase().as_str() {
            "a" => Some(Intent::MoveLeft),
            "d" => Some(Intent::MoveRight),
            "w" => Some(Intent::Jump),
            "s" => Some(Intent::Slide),
            _ => None,
        },
    }
}

/// Seed for a fresh run
#[cfg(not(target_arch = "wasm32"))]
pub fn entropy_seed() -> u64 {
    rand::random()
}

/// Seed for a fresh run
#[cfg(target_arch = "wasm32")]
pub fn entropy_seed() -> u64 {
    let now = js_sys::Date::now() as u64;
    let noise = (js_sys::Math::random() * u32::MAX as f64) as u64;
    now.rotate_left(32) ^ noise
}
