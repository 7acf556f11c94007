//! Browser bindings
//!
//! The JS side owns the canvas, the render loop and keyboard capture. Each
//! frame it calls `tick(dt)` and reads `snapshot()` to draw.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use super::{entropy_seed, intent_for_key};
use crate::persistence::{KeyValueStore, LocalStore, MemoryStore};
use crate::session::Session;
use crate::shop::ShopItem;
use crate::sim::{GameState, TickInput};
use crate::tuning::Tuning;

const STORAGE_PREFIX: &str = "lane_runner_";

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
    log::info!("Lane Runner starting...");
}

#[derive(Serialize)]
struct Snapshot<'a> {
    state: &'a GameState,
    shop: &'a [ShopItem],
}

#[derive(Serialize)]
struct PurchaseOutcome {
    success: bool,
    message: String,
}

/// Game handle exported to JS
#[wasm_bindgen]
pub struct WebRunner {
    session: Session<Box<dyn KeyValueStore>>,
    input: TickInput,
}

#[wasm_bindgen]
impl WebRunner {
    /// Create a runner; `tuning_json` may be empty for defaults
    #[wasm_bindgen(constructor)]
    pub fn new(tuning_json: &str) -> Result<WebRunner, JsValue> {
        let tuning = if tuning_json.trim().is_empty() {
            Tuning::default()
        } else {
            Tuning::from_json(tuning_json).map_err(|e| JsValue::from_str(&e.to_string()))?
        };

        let store: Box<dyn KeyValueStore> = match LocalStore::open(STORAGE_PREFIX) {
            Ok(store) => Box::new(store),
            Err(e) => {
                log::warn!("{e}; progress will not be saved");
                Box::new(MemoryStore::new())
            }
        };

        Ok(WebRunner {
            session: Session::new(store, tuning, entropy_seed()),
            input: TickInput::default(),
        })
    }

    /// Queue the intent for a key press; returns false for unmapped keys
    pub fn key_down(&mut self, key: &str) -> bool {
        match intent_for_key(key) {
            Some(intent) => {
                self.input.push(intent);
                true
            }
            None => false,
        }
    }

    pub fn tick(&mut self, dt: f32) {
        self.session.tick(&self.input, dt);
        self.input.clear();
    }

    pub fn start_game(&mut self) {
        self.input.clear();
        self.session.start_game();
    }

    pub fn restart_game(&mut self) {
        self.input.clear();
        self.session.restart_game();
    }

    pub fn open_shop(&mut self) {
        self.session.open_shop();
    }

    pub fn return_to_menu(&mut self) {
        self.session.return_to_menu();
    }

    /// Attempt a purchase; returns `{ success, message }` as JSON
    pub fn purchase(&mut self, item_id: &str) -> String {
        let outcome = match self.session.purchase(item_id) {
            Ok(item) => PurchaseOutcome {
                success: true,
                message: format!("Successfully purchased {}!", item.name),
            },
            Err(e) => PurchaseOutcome {
                success: false,
                message: e.to_string(),
            },
        };
        serde_json::to_string(&outcome).unwrap_or_default()
    }

    /// Full state for the renderer as JSON
    pub fn snapshot(&self) -> String {
        let snapshot = Snapshot {
            state: self.session.state(),
            shop: &self.session.shop().items,
        };
        match serde_json::to_string(&snapshot) {
            Ok(json) => json,
            Err(e) => {
                log::error!("Snapshot failed: {e}");
                String::new()
            }
        }
    }
}
