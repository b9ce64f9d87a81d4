//! # App State
//!
//! Everything a session mutates, owned in one place and handed to the engines
//! explicitly. Lives for the process lifetime only.

use super::catalog::Catalog;
use super::item::ItemId;
use super::lockers::LockerDirectory;
use super::profile::UserProfile;
use crate::engine::checkout::PaymentMethod;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A completed checkout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: u32,
    pub method: PaymentMethod,
    pub total: u64,
    pub item_ids: Vec<ItemId>,
    pub settled_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppState {
    pub catalog: Catalog,
    pub profile: UserProfile,
    pub lockers: LockerDirectory,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

impl AppState {
    pub fn new(catalog: Catalog, profile: UserProfile, lockers: LockerDirectory) -> Self {
        Self {
            catalog,
            profile,
            lockers,
            transactions: Vec::new(),
        }
    }

    /// Demo catalog, account and lockers
    pub fn seeded() -> Self {
        let mut catalog = Catalog::seeded();
        let profile = UserProfile::seeded(&mut catalog);
        Self::new(catalog, profile, LockerDirectory::seeded())
    }

    pub(crate) fn record_transaction(
        &mut self,
        method: PaymentMethod,
        total: u64,
        item_ids: Vec<ItemId>,
    ) -> &Transaction {
        let id = self.transactions.len() as u32 + 1;
        self.transactions.push(Transaction {
            id,
            method,
            total,
            item_ids,
            settled_at: Utc::now(),
        });
        &self.transactions[self.transactions.len() - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_state() {
        let state = AppState::seeded();
        assert_eq!(state.catalog.len(), 8);
        assert_eq!(state.lockers.all().len(), 2);
        assert!(state.transactions.is_empty());
    }

    #[test]
    fn test_transaction_ids_are_sequential() {
        let mut state = AppState::seeded();
        state.record_transaction(PaymentMethod::Credits, 5, vec![ItemId(3)]);
        let second = state.record_transaction(PaymentMethod::Card, 10, vec![ItemId(4)]);
        assert_eq!(second.id, 2);
    }
}
