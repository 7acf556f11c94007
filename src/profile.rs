//! Durable player record
//!
//! High score, lifetime coin total and shop purchases, one store key each.
//! Missing or unreadable entries fall back to their defaults.

use serde::{Serialize, de::DeserializeOwned};

use crate::persistence::{KeyValueStore, StoreError};

/// Store keys
pub const HIGH_SCORE_KEY: &str = "highScore";
pub const TOTAL_COINS_KEY: &str = "totalCoins";
pub const OWNED_ITEMS_KEY: &str = "ownedItems";

/// Persistent stats carried across runs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Profile {
    pub high_score: u64,
    pub total_coins: u64,
    /// IDs of shop items the player owns
    pub owned_items: Vec<String>,
}

fn read_or_default<T, S>(store: &S, key: &str) -> T
where
    T: DeserializeOwned + Default,
    S: KeyValueStore + ?Sized,
{
    match store.get(key) {
        Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
            log::warn!("Ignoring unreadable {key} ({e}), using default");
            T::default()
        }),
        Ok(None) => T::default(),
        Err(e) => {
            log::warn!("Could not read {key}: {e}");
            T::default()
        }
    }
}

fn write<T, S>(store: &mut S, key: &str, value: &T) -> Result<(), StoreError>
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let json = serde_json::to_string(value)?;
    store.set(key, &json)
}

impl Profile {
    /// Load the profile, tolerating absent or corrupt entries
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        let profile = Self {
            high_score: read_or_default(store, HIGH_SCORE_KEY),
            total_coins: read_or_default(store, TOTAL_COINS_KEY),
            owned_items: read_or_default(store, OWNED_ITEMS_KEY),
        };
        log::info!(
            "Loaded profile: high_score={} total_coins={} owned={}",
            profile.high_score,
            profile.total_coins,
            profile.owned_items.len()
        );
        profile
    }

    pub fn save_high_score<S: KeyValueStore + ?Sized>(&self, store: &mut S) -> Result<(), StoreError> {
        write(store, HIGH_SCORE_KEY, &self.high_score)
    }

    pub fn save_total_coins<S: KeyValueStore + ?Sized>(&self, store: &mut S) -> Result<(), StoreError> {
        write(store, TOTAL_COINS_KEY, &self.total_coins)
    }

    pub fn save_owned_items<S: KeyValueStore + ?Sized>(&self, store: &mut S) -> Result<(), StoreError> {
        write(store, OWNED_ITEMS_KEY, &self.owned_items)
    }

    /// Write every entry
    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) -> Result<(), StoreError> {
        self.save_high_score(store)?;
        self.save_total_coins(store)?;
        self.save_owned_items(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_absent_entries_default_to_zero() {
        let store = MemoryStore::new();
        assert_eq!(Profile::load(&store), Profile::default());
    }

    #[test]
    fn test_round_trip() {
        let mut store = MemoryStore::new();
        let profile = Profile {
            high_score: 1234,
            total_coins: 56,
            owned_items: vec!["magnet".to_string()],
        };
        profile.save(&mut store).unwrap();
        assert_eq!(store.get(HIGH_SCORE_KEY).unwrap().as_deref(), Some("1234"));
        assert_eq!(Profile::load(&store), profile);
    }

    #[test]
    fn test_corrupt_entry_falls_back() {
        let mut store = MemoryStore::new();
        store.set(HIGH_SCORE_KEY, "\"lots\"").unwrap();
        store.set(TOTAL_COINS_KEY, "17").unwrap();

        let profile = Profile::load(&store);
        assert_eq!(profile.high_score, 0);
        assert_eq!(profile.total_coins, 17);
    }
}
