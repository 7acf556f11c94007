//! Shop catalog and purchases

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a purchase was refused; the message is shown to the player as-is
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PurchaseError {
    #[error("Item not found")]
    UnknownItem,
    #[error("You already own this item")]
    AlreadyOwned,
    #[error("Not enough coins")]
    InsufficientFunds { price: u64, balance: u64 },
}

/// Item categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    Powerup,
    Skin,
    Ability,
}

/// A purchasable item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopItem {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: u64,
    pub kind: ItemKind,
    pub owned: bool,
    pub effect: Option<String>,
}

impl ShopItem {
    fn new(id: &str, name: &str, description: &str, price: u64, kind: ItemKind) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            price,
            kind,
            owned: false,
            effect: None,
        }
    }

    fn with_effect(mut self, effect: &str) -> Self {
        self.effect = Some(effect.to_string());
        self
    }
}

/// The shop's item list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shop {
    pub items: Vec<ShopItem>,
}

impl Default for Shop {
    fn default() -> Self {
        Self::new(vec![
            ShopItem::new("magnet", "Coin Magnet", "Pulls nearby coins toward you", 250, ItemKind::Powerup)
                .with_effect("Coin pickup range x2 for 10s"),
            ShopItem::new("shield", "Shield", "Absorbs one hit", 400, ItemKind::Powerup)
                .with_effect("Ignore the next collision"),
            ShopItem::new("double_coins", "Double Coins", "Every coin counts twice", 600, ItemKind::Powerup)
                .with_effect("Coins x2 for 15s"),
            ShopItem::new("high_jump", "High Jump", "Jump higher and longer", 800, ItemKind::Ability)
                .with_effect("Jump duration +25%"),
            ShopItem::new("quick_feet", "Quick Feet", "Switch lanes faster", 700, ItemKind::Ability),
            ShopItem::new("ninja", "Ninja", "A stealthy runner outfit", 1000, ItemKind::Skin),
            ShopItem::new("robot", "Robot", "Chrome plated and shiny", 1500, ItemKind::Skin),
        ])
    }
}

impl Shop {
    pub fn new(items: Vec<ShopItem>) -> Self {
        Self { items }
    }

    pub fn item(&self, id: &str) -> Option<&ShopItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Flag items the profile already owns
    pub fn mark_owned<'a>(&mut self, owned: impl IntoIterator<Item = &'a String>) {
        for id in owned {
            if let Some(item) = self.items.iter_mut().find(|item| &item.id == id) {
                item.owned = true;
            }
        }
    }

    /// Buy an item with `balance` coins
    ///
    /// On success the item is marked owned and its price is deducted from
    /// `balance`. On failure nothing changes.
    pub fn purchase(&mut self, id: &str, balance: &mut u64) -> Result<&ShopItem, PurchaseError> {
        let item = self
            .items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or(PurchaseError::UnknownItem)?;
        if item.owned {
            return Err(PurchaseError::AlreadyOwned);
        }
        if *balance < item.price {
            return Err(PurchaseError::InsufficientFunds {
                price: item.price,
                balance: *balance,
            });
        }

        *balance -= item.price;
        item.owned = true;
        log::info!("Purchased {} for {} coins", item.id, item.price);
        Ok(item)
    }

    pub fn owned_ids(&self) -> Vec<String> {
        self.items
            .iter()
            .filter(|item| item.owned)
            .map(|item| item.id.clone())
            .collect()
    }
}
