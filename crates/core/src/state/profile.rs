//! # User Profile
//!
//! The single active user of a session: identity, credit balance, listings
//! and reservations.

use super::catalog::Catalog;
use super::item::{Category, Item, ItemId, ItemStatus};
use crate::blob::BlobHandle;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum AccountStatus {
    #[default]
    Active,
    Suspended,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    pub status: AccountStatus,
    /// In-app currency; unsigned so it can never go negative
    pub credits: u64,
    /// Items from completed exchanges
    #[serde(default)]
    pub history_item_ids: Vec<ItemId>,
    /// The user's own listings, in submission order
    #[serde(default)]
    pub owned_items: Vec<Item>,
    /// Reserved items, in reservation order. Never contains duplicates.
    #[serde(default)]
    pub reservations: Vec<ItemId>,
}

impl UserProfile {
    pub fn new(name: impl Into<String>, email: impl Into<String>, credits: u64) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            status: AccountStatus::Active,
            credits,
            history_item_ids: Vec::new(),
            owned_items: Vec::new(),
            reservations: Vec::new(),
        }
    }

    /// The demo account. Its own items take ids from `catalog` but are
    /// not listed there.
    pub fn seeded(catalog: &mut Catalog) -> Self {
        let mut profile = Self::new("Touraj Vaziri", "touraj@sbs.barcelona", 30);
        profile.history_item_ids = vec![ItemId(1), ItemId(2)];
        profile.owned_items = SEED_OWNED_ITEMS
            .iter()
            .map(|(name, category, description, image)| Item {
                id: catalog.allocate_id(),
                name: name.to_string(),
                category: *category,
                description: description.to_string(),
                location: "Barcelona".to_string(),
                image_ref: BlobHandle::new(*image),
                rating: 0.0,
                available_from: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap_or(NaiveDate::MIN),
                status: ItemStatus::Available,
            })
            .collect();
        profile
    }

    pub fn has_reserved(&self, id: ItemId) -> bool {
        self.reservations.contains(&id)
    }

    /// Number of completed exchanges
    pub fn items_exchanged(&self) -> usize {
        self.history_item_ids.len()
    }

    pub(crate) fn record_exchange(&mut self, id: ItemId) {
        if !self.history_item_ids.contains(&id) {
            self.history_item_ids.push(id);
        }
    }
}

const SEED_OWNED_ITEMS: &[(&str, Category, &str, &str)] = &[
    (
        "Blue Shirt",
        Category::Clothing,
        "Light blue cotton shirt.",
        "images/blueshirt.png",
    ),
    (
        "Yellow Running Shoes",
        Category::Footwear,
        "Bright yellow running shoes.",
        "images/yellowrunningshoes.png",
    ),
    (
        "Biking Shorts",
        Category::Clothing,
        "Padded shorts for long rides.",
        "images/bikingshorts.png",
    ),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_profile() {
        let profile = UserProfile::seeded(&mut Catalog::seeded());
        assert_eq!(profile.credits, 30);
        assert_eq!(profile.items_exchanged(), 2);
        assert_eq!(profile.status, AccountStatus::Active);
        assert!(profile.reservations.is_empty());
    }

    #[test]
    fn test_seeded_items_stay_off_catalog() {
        let mut catalog = Catalog::seeded();
        let profile = UserProfile::seeded(&mut catalog);

        let names: Vec<&str> = profile.owned_items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Blue Shirt", "Yellow Running Shoes", "Biking Shorts"]);
        assert_eq!(profile.owned_items[1].image_ref.as_str(), "images/yellowrunningshoes.png");
        assert_eq!(catalog.len(), 8);
        for item in &profile.owned_items {
            assert!(catalog.get(item.id).is_none());
        }
    }

    #[test]
    fn test_record_exchange_is_idempotent() {
        let mut profile = UserProfile::seeded(&mut Catalog::seeded());
        profile.record_exchange(ItemId(3));
        profile.record_exchange(ItemId(3));
        assert_eq!(profile.history_item_ids, vec![ItemId(1), ItemId(2), ItemId(3)]);
    }
}
