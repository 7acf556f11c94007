//! Game session
//!
//! Owns the simulation state, the shop and a storage backend. The host loop
//! (browser frame callback or the native binary) drives everything through
//! this type: phase changes, purchases and one `tick` per frame. Simulation
//! events are turned into persistence writes here so `sim` stays pure.

use crate::persistence::KeyValueStore;
use crate::profile::Profile;
use crate::shop::{PurchaseError, Shop, ShopItem};
use crate::sim::{GameEvent, GamePhase, GameState, TickInput, tick};
use crate::tuning::Tuning;

pub struct Session<S: KeyValueStore> {
    state: GameState,
    shop: Shop,
    profile: Profile,
    store: S,
}

impl<S: KeyValueStore> Session<S> {
    /// Load the profile from `store` and sit in the menu
    pub fn new(store: S, tuning: Tuning, seed: u64) -> Self {
        let profile = Profile::load(&store);
        let mut state = GameState::new(tuning, seed);
        state.high_score = profile.high_score;
        state.total_coins = profile.total_coins;

        let mut shop = Shop::default();
        shop.mark_owned(&profile.owned_items);

        Self {
            state,
            shop,
            profile,
            store,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn shop(&self) -> &Shop {
        &self.shop
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn start_game(&mut self) {
        self.state.start_game();
    }

    pub fn restart_game(&mut self) {
        self.state.restart_game();
    }

    pub fn open_shop(&mut self) {
        self.state.open_shop();
    }

    pub fn return_to_menu(&mut self) {
        self.state.return_to_menu();
    }

    /// Advance one frame and persist whatever changed
    pub fn tick(&mut self, input: &TickInput, dt: f32) {
        tick(&mut self.state, input, dt);
        self.flush_events();
    }

    /// Buy a shop item with the lifetime coin total
    pub fn purchase(&mut self, item_id: &str) -> Result<&ShopItem, PurchaseError> {
        let mut balance = self.state.total_coins;
        self.shop.purchase(item_id, &mut balance)?;

        self.state.total_coins = balance;
        self.profile.total_coins = balance;
        self.profile.owned_items = self.shop.owned_ids();
        self.persist(|profile, store| {
            profile.save_total_coins(store)?;
            profile.save_owned_items(store)
        });

        self.shop.item(item_id).ok_or(PurchaseError::UnknownItem)
    }

    fn flush_events(&mut self) {
        let mut coins_changed = false;
        let mut high_score_changed = false;

        for event in self.state.events.drain(..) {
            match event {
                GameEvent::CoinCollected { .. } => coins_changed = true,
                GameEvent::GameOver { new_high_score, .. } => {
                    coins_changed = true;
                    high_score_changed |= new_high_score;
                }
                GameEvent::TrackRecovered { anchor_z } => {
                    log::warn!("Track recovered at z={anchor_z}");
                }
                GameEvent::SpeedUp { speed } => log::debug!("Speed now {speed}"),
                GameEvent::Hit { .. } | GameEvent::SegmentRecycled { .. } => {}
            }
        }

        if coins_changed && self.profile.total_coins != self.state.total_coins {
            self.profile.total_coins = self.state.total_coins;
            self.persist(|profile, store| profile.save_total_coins(store));
        }
        if high_score_changed && self.profile.high_score != self.state.high_score {
            self.profile.high_score = self.state.high_score;
            self.persist(|profile, store| profile.save_high_score(store));
        }
    }

    /// Run a profile write; failures are logged, never fatal
    fn persist<F>(&mut self, write: F)
    where
        F: FnOnce(&Profile, &mut S) -> Result<(), crate::persistence::StoreError>,
    {
        if let Err(e) = write(&self.profile, &mut self.store) {
            log::warn!("Failed to save profile: {e}");
        }
    }
}
