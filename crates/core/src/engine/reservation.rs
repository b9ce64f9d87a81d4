//! # Reservation Engine
//!
//! Claims catalog items for the active user and derives where and when they
//! can be picked up.

use crate::error::{Result, SwapError};
use crate::state::{Catalog, Item, ItemId, ItemStatus, Locker, LockerDirectory, UserProfile};
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_PICKUP_WINDOW_DAYS: u32 = 3;

/// Half-open pickup interval `[start, end)`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PickupWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl PickupWindow {
    /// Window of `days` days from `start`. Fails when the end date falls
    /// past the last representable date.
    pub fn starting(start: NaiveDate, days: u32) -> Result<Self> {
        let end = start.checked_add_days(Days::new(u64::from(days))).ok_or_else(|| {
            SwapError::validation(format!(
                "a {}-day pickup window from {} runs past the calendar",
                days, start
            ))
        })?;
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }
}

impl fmt::Display for PickupWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}–{}",
            self.start.format("%B %d"),
            self.end.format("%B %d")
        )
    }
}

/// A reserved item with its pickup window and locker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationRecord {
    pub item: Item,
    pub pickup: PickupWindow,
    pub locker: Locker,
}

impl ReservationRecord {
    fn build(item: &Item, locker: &Locker, window_days: u32) -> Result<Self> {
        Ok(Self {
            item: item.clone(),
            pickup: PickupWindow::starting(item.available_from, window_days)?,
            locker: locker.clone(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ReserveOutcome {
    /// Newly reserved
    Reserved(ReservationRecord),
    /// The user already holds this item. Nothing changed.
    AlreadyReserved(ReservationRecord),
}

impl ReserveOutcome {
    pub fn record(&self) -> &ReservationRecord {
        match self {
            Self::Reserved(record) | Self::AlreadyReserved(record) => record,
        }
    }

    pub fn is_new(&self) -> bool {
        matches!(self, Self::Reserved(_))
    }
}

/// Reserve `item_id` for the user.
///
/// Fails with `NotFound` if the item is not listed and `Config` if there is
/// no locker to assign. A pickup window that cannot be computed is a
/// `Validation` error raised before anything changes. Reserving an item twice returns `AlreadyReserved`.
pub fn reserve(
    profile: &mut UserProfile,
    catalog: &mut Catalog,
    lockers: &LockerDirectory,
    item_id: ItemId,
    window_days: u32,
) -> Result<ReserveOutcome> {
    let item = catalog.require(item_id)?;
    let locker = lockers.assign()?;

    if profile.has_reserved(item_id) {
        tracing::debug!(item_id = %item_id, "Item already reserved");
        return Ok(ReserveOutcome::AlreadyReserved(ReservationRecord::build(
            item,
            locker,
            window_days,
        )?));
    }

    let mut record = ReservationRecord::build(item, locker, window_days)?;
    catalog.set_status(item_id, ItemStatus::Reserved)?;
    record.item.status = ItemStatus::Reserved;
    profile.reservations.push(item_id);

    tracing::info!(
        item_id = %item_id,
        locker = %record.locker.name,
        pickup = %record.pickup,
        "Item reserved"
    );
    Ok(ReserveOutcome::Reserved(record))
}

/// The user's reservations in the order they were made
pub fn list_reservations(
    profile: &UserProfile,
    catalog: &Catalog,
    lockers: &LockerDirectory,
    window_days: u32,
) -> Result<Vec<ReservationRecord>> {
    if profile.reservations.is_empty() {
        return Ok(Vec::new());
    }
    let locker = lockers.assign()?;
    profile
        .reservations
        .iter()
        .map(|id| {
            let item = catalog.require(*id)?;
            ReservationRecord::build(item, locker, window_days)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blob::BlobHandle;
    use crate::state::{AppState, ItemDraft};

    fn reserve_in(state: &mut AppState, id: ItemId) -> Result<ReserveOutcome> {
        reserve(
            &mut state.profile,
            &mut state.catalog,
            &state.lockers,
            id,
            DEFAULT_PICKUP_WINDOW_DAYS,
        )
    }

    fn listed(state: &AppState) -> Vec<ReservationRecord> {
        list_reservations(
            &state.profile,
            &state.catalog,
            &state.lockers,
            DEFAULT_PICKUP_WINDOW_DAYS,
        )
        .unwrap()
    }

    #[test]
    fn test_red_running_shoes_pickup() {
        let mut state = AppState::seeded();
        let shoes = state.catalog.list_items(Some("Red Running Shoes"))[0].id;

        let outcome = reserve_in(&mut state, shoes).unwrap();
        let record = outcome.record();

        assert!(outcome.is_new());
        assert_eq!(record.pickup.start, NaiveDate::from_ymd_opt(2025, 6, 20).unwrap());
        assert_eq!(record.pickup.end, NaiveDate::from_ymd_opt(2025, 6, 23).unwrap());
        assert_eq!(record.locker.name, "Locker A");
        assert_eq!(record.pickup.to_string(), "June 20–June 23");
    }

    #[test]
    fn test_reserve_twice_lists_once() {
        let mut state = AppState::seeded();
        let id = ItemId(2);

        assert!(reserve_in(&mut state, id).unwrap().is_new());
        for _ in 0..3 {
            let again = reserve_in(&mut state, id).unwrap();
            assert!(matches!(again, ReserveOutcome::AlreadyReserved(_)));
        }

        let records = listed(&state);
        assert_eq!(records.iter().filter(|r| r.item.id == id).count(), 1);
        assert_eq!(state.profile.reservations, vec![id]);
    }

    #[test]
    fn test_reserved_item_stays_in_catalog() {
        let mut state = AppState::seeded();
        reserve_in(&mut state, ItemId(1)).unwrap();

        let item = state.catalog.get(ItemId(1)).unwrap();
        assert_eq!(item.status, ItemStatus::Reserved);
        assert_eq!(state.catalog.len(), 8);
    }

    #[test]
    fn test_reserve_unknown_item() {
        let mut state = AppState::seeded();
        let result = reserve_in(&mut state, ItemId(99));
        assert!(matches!(result, Err(SwapError::NotFound(_))));
        assert!(state.profile.reservations.is_empty());
    }

    #[test]
    fn test_reserve_without_lockers() {
        let mut state = AppState::seeded();
        state.lockers = LockerDirectory::default();

        let result = reserve_in(&mut state, ItemId(1));
        assert!(matches!(result, Err(SwapError::Config(_))));
        assert!(state.profile.reservations.is_empty());
        assert_eq!(state.catalog.get(ItemId(1)).unwrap().status, ItemStatus::Available);
    }

    #[test]
    fn test_list_preserves_reservation_order() {
        let mut state = AppState::seeded();
        for id in [5, 1, 3] {
            reserve_in(&mut state, ItemId(id)).unwrap();
        }
        let ids: Vec<u32> = listed(&state).iter().map(|r| r.item.id.0).collect();
        assert_eq!(ids, vec![5, 1, 3]);
    }

    #[test]
    fn test_window_is_half_open() {
        let start = NaiveDate::from_ymd_opt(2025, 6, 20).unwrap();
        let window = PickupWindow::starting(start, 3).unwrap();
        assert!(window.contains(start));
        assert!(window.contains(NaiveDate::from_ymd_opt(2025, 6, 22).unwrap()));
        assert!(!window.contains(window.end));
    }

    #[test]
    fn test_window_overflow_is_rejected() {
        let mut state = AppState::seeded();
        let draft = ItemDraft::new("Time Capsule Coat", BlobHandle::new("blobs/0001_coat.png"))
            .with_available_from(NaiveDate::MAX);
        let last_day = state.catalog.add_item(draft, NaiveDate::MAX).unwrap().id;

        let result = reserve_in(&mut state, last_day);
        assert!(matches!(result, Err(SwapError::Validation(_))));
        assert!(state.profile.reservations.is_empty());
        assert_eq!(
            state.catalog.get(last_day).unwrap().status,
            ItemStatus::Available
        );

        let huge_window = reserve(
            &mut state.profile,
            &mut state.catalog,
            &state.lockers,
            ItemId(3),
            u32::MAX,
        );
        assert!(matches!(huge_window, Err(SwapError::Validation(_))));
        assert!(state.profile.reservations.is_empty());
        assert_eq!(state.catalog.get(ItemId(3)).unwrap().status, ItemStatus::Available);
    }
}
