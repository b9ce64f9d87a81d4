//! # Items
//!
//! Listing types shared by the catalog, the user profile and reservations.

use crate::blob::BlobHandle;
use crate::error::{Result, SwapError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Catalog-assigned item identifier (1-based, insertion order)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u32);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Category {
    #[default]
    Clothing,
    Accessories,
    Footwear,
}

impl Category {
    pub fn all() -> [Category; 3] {
        [Category::Clothing, Category::Accessories, Category::Footwear]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Clothing => "Clothing",
            Category::Accessories => "Accessories",
            Category::Footwear => "Footwear",
        }
    }
}

/// Lifecycle of a listed item
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    /// Listed and open for reservation
    #[default]
    Available,
    /// Claimed by the user, awaiting checkout
    Reserved,
    /// Paid for at checkout
    Settled,
}

/// A listed secondhand item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub category: Category,
    pub description: String,
    pub location: String,
    pub image_ref: BlobHandle,
    pub rating: f32,
    pub available_from: NaiveDate,
    #[serde(default)]
    pub status: ItemStatus,
}

/// User-submitted listing before validation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub image_ref: Option<BlobHandle>,
    #[serde(default)]
    pub rating: Option<f32>,
    #[serde(default)]
    pub available_from: Option<NaiveDate>,
}

impl ItemDraft {
    pub fn new(name: impl Into<String>, image_ref: BlobHandle) -> Self {
        Self {
            name: name.into(),
            image_ref: Some(image_ref),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn with_available_from(mut self, date: NaiveDate) -> Self {
        self.available_from = Some(date);
        self
    }

    /// Check the fields every listing needs: a name and an image
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(SwapError::validation("item name is required"));
        }
        match &self.image_ref {
            Some(handle) if !handle.is_empty() => {}
            _ => return Err(SwapError::validation("item image is required")),
        }
        if let Some(rating) = self.rating {
            if !rating.is_finite() || rating < 0.0 {
                return Err(SwapError::validation("rating must be a non-negative number"));
            }
        }
        Ok(())
    }

    /// Validate and turn the draft into an available item
    pub fn into_item(self, id: ItemId, today: NaiveDate) -> Result<Item> {
        self.validate()?;
        Ok(Item {
            id,
            name: self.name.trim().to_string(),
            category: self.category.unwrap_or_default(),
            description: self.description,
            location: self.location,
            image_ref: self.image_ref.unwrap_or_default(),
            rating: self.rating.unwrap_or(0.0),
            available_from: self.available_from.unwrap_or(today),
            status: ItemStatus::Available,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    #[test]
    fn test_draft_defaults() {
        let item = ItemDraft::new("Wool Scarf", BlobHandle::new("blobs/scarf.png"))
            .into_item(ItemId(9), today())
            .unwrap();

        assert_eq!(item.rating, 0.0);
        assert_eq!(item.category, Category::Clothing);
        assert_eq!(item.available_from, today());
        assert_eq!(item.status, ItemStatus::Available);
    }

    #[test]
    fn test_whitespace_name_rejected() {
        let draft = ItemDraft::new("   ", BlobHandle::new("blobs/x.png"));
        assert!(matches!(draft.validate(), Err(SwapError::Validation(_))));
    }

    #[test]
    fn test_missing_image_rejected() {
        let draft = ItemDraft {
            name: "Hat".to_string(),
            ..Default::default()
        };
        assert!(matches!(draft.validate(), Err(SwapError::Validation(_))));

        let empty = ItemDraft::new("Hat", BlobHandle::new(""));
        assert!(matches!(empty.validate(), Err(SwapError::Validation(_))));
    }

    #[test]
    fn test_negative_rating_rejected() {
        let mut draft = ItemDraft::new("Hat", BlobHandle::new("blobs/hat.png"));
        draft.rating = Some(-1.0);
        assert!(draft.validate().is_err());
    }

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_string(&ItemStatus::Reserved).unwrap();
        assert_eq!(json, "\"reserved\"");
    }
}
