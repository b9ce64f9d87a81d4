pub mod app_state;
pub mod catalog;
pub mod community;
pub mod item;
pub mod lockers;
pub mod profile;

pub use app_state::{AppState, Transaction};
pub use catalog::Catalog;
pub use community::{community_members, CommunityMember};
pub use item::{Category, Item, ItemDraft, ItemId, ItemStatus};
pub use lockers::{Locker, LockerDirectory};
pub use profile::{AccountStatus, UserProfile};
