//! # Engines
//!
//! Operations that move an item through its lifecycle:
//! Available → Reserved (`reservation`) → Settled (`checkout`).

pub mod checkout;
pub mod reservation;

pub use checkout::{
    compute_total, pay_with_credits, pay_with_external_method, settle, Cart, CartLine,
    CreditReceipt, ExternalCredentials, ExternalReceipt, PaymentMethod,
};
pub use reservation::{
    list_reservations, reserve, PickupWindow, ReservationRecord, ReserveOutcome,
    DEFAULT_PICKUP_WINDOW_DAYS,
};
