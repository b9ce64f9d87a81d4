//! # Locker Directory
//!
//! Static pickup points. Fixed once the session starts.

use crate::error::{Result, SwapError};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Locker {
    pub name: String,
    pub address: String,
    pub city: String,
}

impl Locker {
    pub fn new(name: &str, address: &str, city: &str) -> Self {
        Self {
            name: name.to_string(),
            address: address.to_string(),
            city: city.to_string(),
        }
    }
}

impl fmt::Display for Locker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}, {}", self.name, self.address, self.city)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LockerDirectory {
    lockers: Vec<Locker>,
}

impl LockerDirectory {
    pub fn new(lockers: Vec<Locker>) -> Self {
        Self { lockers }
    }

    pub fn seeded() -> Self {
        Self::new(vec![
            Locker::new("Locker A", "123 Main St", "Barcelona"),
            Locker::new("Locker B", "456 Side St", "Madrid"),
        ])
    }

    pub fn all(&self) -> &[Locker] {
        &self.lockers
    }

    /// Locker used for every pickup. Always the first entry; the item's
    /// location is not taken into account.
    pub fn assign(&self) -> Result<&Locker> {
        self.lockers
            .first()
            .ok_or_else(|| SwapError::Config("locker directory is empty".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assign_first_locker() {
        let lockers = LockerDirectory::seeded();
        let locker = lockers.assign().unwrap();
        assert_eq!(locker.name, "Locker A");
        assert_eq!(locker.to_string(), "Locker A, 123 Main St, Barcelona");
    }

    #[test]
    fn test_empty_directory() {
        let lockers = LockerDirectory::default();
        assert!(matches!(lockers.assign(), Err(SwapError::Config(_))));
    }
}
