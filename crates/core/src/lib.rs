//! # Switch'd Core
//!
//! State and business rules for the Switch'd secondhand swap marketplace.
//!
//! ## Architecture
//!
//! - `state/` - Catalog, user profile, locker directory and the `AppState` that owns them
//! - `engine/` - Reservation and checkout operations over that state
//! - `session/` - UI events in, notices out; the boundary where errors stop
//! - `suggest/` - Similar-item suggestions from a hosted LLM
//! - `blob/` - Image storage behind opaque handles
//! - `config` / `models` - Runtime settings and LLM provider selection
//!
//! ## Usage
//!
//! ```rust,ignore
//! use switchd_core::config::SwitchdConfig;
//! use switchd_core::session::{Session, UiEvent};
//! use switchd_core::state::ItemId;
//!
//! let config = SwitchdConfig::default();
//! let suggester = switchd_core::suggest::from_config(&config);
//! let mut session = Session::seeded(config, suggester);
//! let reply = session.handle(UiEvent::Reserve { item_id: ItemId(3) }).await;
//! ```

pub mod blob;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod session;
pub mod state;
pub mod suggest;

pub use error::{Result, SwapError};
