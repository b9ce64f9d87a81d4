//! # Catalog Store
//!
//! Every listed item, seeded or user-submitted, in insertion order.
//! Items are never removed; reserving one only changes its status.

use super::item::{Category, Item, ItemDraft, ItemId, ItemStatus};
use crate::blob::BlobHandle;
use crate::error::{Result, SwapError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    items: Vec<Item>,
    next_id: u32,
}

impl Catalog {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            next_id: 1,
        }
    }

    /// Catalog with the demo listings around Barcelona and Madrid
    pub fn seeded() -> Self {
        let mut catalog = Self::new();
        for (name, category, description, location, image, rating, (y, m, d)) in SEED_ITEMS {
            let id = catalog.allocate_id();
            catalog.items.push(Item {
                id,
                name: name.to_string(),
                category: *category,
                description: description.to_string(),
                location: location.to_string(),
                image_ref: BlobHandle::new(*image),
                rating: *rating,
                available_from: NaiveDate::from_ymd_opt(*y, *m, *d).unwrap_or(NaiveDate::MIN),
                status: ItemStatus::Available,
            });
        }
        catalog
    }

    /// Items whose name contains `filter`, case-insensitively.
    /// `None` and `""` both return the full catalog.
    pub fn list_items(&self, filter: Option<&str>) -> Vec<&Item> {
        match filter {
            Some(query) if !query.is_empty() => {
                let needle = query.to_lowercase();
                self.items
                    .iter()
                    .filter(|item| item.name.to_lowercase().contains(&needle))
                    .collect()
            }
            _ => self.items.iter().collect(),
        }
    }

    /// Validate a draft and append it to the catalog
    pub fn add_item(&mut self, draft: ItemDraft, today: NaiveDate) -> Result<Item> {
        draft.validate()?;
        let id = self.allocate_id();
        let item = draft.into_item(id, today)?;
        self.items.push(item.clone());
        tracing::info!(item_id = %item.id, name = %item.name, "Item listed");
        Ok(item)
    }

    /// Build an item with a fresh id without listing it
    pub fn mint(&mut self, draft: ItemDraft, today: NaiveDate) -> Result<Item> {
        draft.validate()?;
        let id = self.allocate_id();
        draft.into_item(id, today)
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn require(&self, id: ItemId) -> Result<&Item> {
        self.get(id)
            .ok_or_else(|| SwapError::not_found(format!("item {} is not in the catalog", id)))
    }

    pub(crate) fn set_status(&mut self, id: ItemId, status: ItemStatus) -> Result<()> {
        let item = self
            .items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or_else(|| SwapError::not_found(format!("item {} is not in the catalog", id)))?;
        item.status = status;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub(crate) fn allocate_id(&mut self) -> ItemId {
        if self.next_id == 0 {
            self.next_id = 1;
        }
        let id = ItemId(self.next_id);
        self.next_id += 1;
        id
    }
}

type SeedItem = (
    &'static str,
    Category,
    &'static str,
    &'static str,
    &'static str,
    f32,
    (i32, u32, u32),
);

const SEED_ITEMS: &[SeedItem] = &[
    (
        "Leather Backpack",
        Category::Accessories,
        "A stylish brown leather backpack.",
        "Barcelona",
        "images/leatherbackpackimg.png",
        4.5,
        (2025, 6, 15),
    ),
    (
        "Blue Denim Jacket",
        Category::Clothing,
        "Trendy denim jacket.",
        "Barcelona",
        "images/bluedenimjacket.png",
        4.2,
        (2025, 6, 18),
    ),
    (
        "Red Running Shoes",
        Category::Footwear,
        "Comfy and light.",
        "Madrid",
        "images/redrunningshoes.png",
        4.7,
        (2025, 6, 20),
    ),
    (
        "Black Denim Shorts",
        Category::Clothing,
        "Black denim shorts, casual and cool.",
        "Barcelona",
        "images/blackshorts.png",
        4.3,
        (2025, 6, 21),
    ),
    (
        "Red Shirt",
        Category::Clothing,
        "Bright red shirt, perfect for summer.",
        "Barcelona",
        "images/redshirt.png",
        4.4,
        (2025, 6, 22),
    ),
    (
        "Beige Beach Hat",
        Category::Accessories,
        "Lightweight beige beach hat.",
        "Barcelona",
        "images/beachhat.png",
        4.6,
        (2025, 6, 22),
    ),
    (
        "Black Leather Jacket",
        Category::Clothing,
        "Classic black leather jacket.",
        "Barcelona",
        "images/blackleatherjacket.png",
        4.8,
        (2025, 6, 23),
    ),
    (
        "Plaid Skirt",
        Category::Clothing,
        "Trendy plaid skirt for casual outings.",
        "Barcelona",
        "images/plaidskirt.png",
        4.5,
        (2025, 6, 24),
    ),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    fn names(items: &[&Item]) -> Vec<String> {
        items.iter().map(|i| i.name.clone()).collect()
    }

    #[test]
    fn test_empty_filter_returns_everything_in_order() {
        let catalog = Catalog::seeded();
        let all = catalog.list_items(None);
        let empty = catalog.list_items(Some(""));

        assert_eq!(all.len(), 8);
        assert_eq!(names(&all), names(&empty));
        assert_eq!(all[0].name, "Leather Backpack");
        assert_eq!(all[7].name, "Plaid Skirt");
        assert!(all.windows(2).all(|w| w[0].id < w[1].id));
    }

    #[test]
    fn test_filter_is_case_insensitive() {
        let catalog = Catalog::seeded();
        let hits = catalog.list_items(Some("DENIM"));
        assert_eq!(names(&hits), vec!["Blue Denim Jacket", "Black Denim Shorts"]);
    }

    #[test]
    fn test_filter_without_matches() {
        let catalog = Catalog::seeded();
        assert!(catalog.list_items(Some("umbrella")).is_empty());
    }

    #[test]
    fn test_add_item_appends() {
        let mut catalog = Catalog::seeded();
        let item = catalog
            .add_item(
                ItemDraft::new("Green Parka", BlobHandle::new("blobs/0001_parka.png")),
                today(),
            )
            .unwrap();

        assert_eq!(item.id, ItemId(9));
        assert_eq!(catalog.len(), 9);
        assert_eq!(catalog.list_items(None).last().unwrap().name, "Green Parka");
    }

    #[test]
    fn test_add_item_with_empty_name_leaves_catalog_unchanged() {
        let mut catalog = Catalog::seeded();
        let result = catalog.add_item(ItemDraft::new("", BlobHandle::new("blobs/x.png")), today());

        assert!(matches!(result, Err(SwapError::Validation(_))));
        assert_eq!(catalog.len(), 8);
    }

    #[test]
    fn test_require_missing_item() {
        let catalog = Catalog::seeded();
        assert!(matches!(
            catalog.require(ItemId(42)),
            Err(SwapError::NotFound(_))
        ));
    }
}
