//! # Checkout Engine
//!
//! Cart totals, credit payments and the mocked card/PayPal methods.
//! No payment processor is contacted.

use crate::error::{Result, SwapError};
use crate::state::{Catalog, ItemId, ItemStatus, UserProfile};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Card,
    #[serde(rename = "paypal")]
    PayPal,
    Credits,
}

impl PaymentMethod {
    pub fn display_name(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "Card",
            PaymentMethod::PayPal => "PayPal",
            PaymentMethod::Credits => "Switch'd Credits",
        }
    }
}

/// One priced line in the cart
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CartLine {
    #[serde(default)]
    pub item_id: Option<ItemId>,
    pub name: String,
    /// Signed so malformed input can be rejected instead of wrapping
    pub price: i64,
}

impl CartLine {
    pub fn new(name: impl Into<String>, price: i64) -> Self {
        Self {
            item_id: None,
            name: name.into(),
            price,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cart {
    pub lines: Vec<CartLine>,
}

impl Cart {
    /// Reserved items that have not been paid for, each at `item_price`.
    /// A price too large for a cart line is a `Validation` error.
    pub fn from_reservations(
        profile: &UserProfile,
        catalog: &Catalog,
        item_price: u64,
    ) -> Result<Self> {
        let price = i64::try_from(item_price).map_err(|_| {
            SwapError::validation(format!("item price {} is too large", item_price))
        })?;
        let lines = profile
            .reservations
            .iter()
            .filter_map(|id| catalog.get(*id))
            .filter(|item| item.status == ItemStatus::Reserved)
            .map(|item| CartLine {
                item_id: Some(item.id),
                name: item.name.clone(),
                price,
            })
            .collect();
        Ok(Self { lines })
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn total(&self) -> Result<u64> {
        compute_total(&self.lines)
    }

    pub fn item_ids(&self) -> Vec<ItemId> {
        self.lines.iter().filter_map(|line| line.item_id).collect()
    }
}

/// Sum of line prices. Any negative price is rejected.
pub fn compute_total(lines: &[CartLine]) -> Result<u64> {
    lines.iter().try_fold(0u64, |total, line| {
        let price = u64::try_from(line.price).map_err(|_| {
            SwapError::validation(format!("price of '{}' cannot be negative", line.name))
        })?;
        total
            .checked_add(price)
            .ok_or_else(|| SwapError::validation("cart total is too large"))
    })
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreditReceipt {
    pub charged: u64,
    pub remaining: u64,
}

/// Deduct `total` from the user's credits. Either the whole amount is taken
/// or the balance is left untouched.
pub fn pay_with_credits(profile: &mut UserProfile, total: u64) -> Result<CreditReceipt> {
    let remaining = profile
        .credits
        .checked_sub(total)
        .ok_or(SwapError::InsufficientCredits {
            required: total,
            available: profile.credits,
        })?;
    profile.credits = remaining;

    tracing::info!(charged = total, remaining, "Paid with credits");
    Ok(CreditReceipt {
        charged: total,
        remaining,
    })
}

/// Card or PayPal details as typed into the checkout form
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum ExternalCredentials {
    Card {
        #[serde(default)]
        card_number: String,
        #[serde(default)]
        expiry: String,
        #[serde(default)]
        cvv: String,
        #[serde(default)]
        name_on_card: String,
    },
    #[serde(rename = "paypal")]
    PayPal {
        #[serde(default)]
        email: String,
        #[serde(default)]
        password: String,
    },
}

impl ExternalCredentials {
    pub fn method(&self) -> PaymentMethod {
        match self {
            Self::Card { .. } => PaymentMethod::Card,
            Self::PayPal { .. } => PaymentMethod::PayPal,
        }
    }

    fn missing_fields(&self) -> Vec<&'static str> {
        let fields: Vec<(&'static str, &str)> = match self {
            Self::Card {
                card_number,
                expiry,
                cvv,
                name_on_card,
            } => vec![
                ("card number", card_number.as_str()),
                ("expiry date", expiry.as_str()),
                ("CVV", cvv.as_str()),
                ("name on card", name_on_card.as_str()),
            ],
            Self::PayPal { email, password } => {
                vec![
                    ("PayPal email", email.as_str()),
                    ("PayPal password", password.as_str()),
                ]
            }
        };
        fields
            .into_iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(label, _)| label)
            .collect()
    }
}

// Never print card numbers or passwords
impl fmt::Debug for ExternalCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExternalCredentials")
            .field("method", &self.method())
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExternalReceipt {
    pub method: PaymentMethod,
}

/// Check that every required credential field is filled in.
/// Acceptance is mocked; credits are never touched.
pub fn pay_with_external_method(
    method: PaymentMethod,
    credentials: &ExternalCredentials,
) -> Result<ExternalReceipt> {
    if method == PaymentMethod::Credits {
        return Err(SwapError::validation(
            "credits are not an external payment method",
        ));
    }
    if credentials.method() != method {
        return Err(SwapError::validation(format!(
            "{} details were submitted for a {} payment",
            credentials.method().display_name(),
            method.display_name()
        )));
    }

    let missing = credentials.missing_fields();
    if !missing.is_empty() {
        return Err(SwapError::validation(format!(
            "missing {}",
            missing.join(", ")
        )));
    }

    tracing::info!(method = method.display_name(), "External payment accepted");
    Ok(ExternalReceipt { method })
}

/// Mark paid items as settled and add them to the exchange history
pub fn settle(profile: &mut UserProfile, catalog: &mut Catalog, item_ids: &[ItemId]) -> Result<()> {
    for id in item_ids {
        catalog.require(*id)?;
    }
    for id in item_ids {
        catalog.set_status(*id, ItemStatus::Settled)?;
        profile.record_exchange(*id);
    }
    tracing::info!(count = item_ids.len(), "Items settled");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::reservation::{reserve, DEFAULT_PICKUP_WINDOW_DAYS};
    use crate::state::AppState;

    fn card(number: &str) -> ExternalCredentials {
        ExternalCredentials::Card {
            card_number: number.to_string(),
            expiry: "12/27".to_string(),
            cvv: "123".to_string(),
            name_on_card: "Touraj Vaziri".to_string(),
        }
    }

    #[test]
    fn test_compute_total() {
        let lines: Vec<CartLine> = (0..3).map(|_| CartLine::new("ITEM NAME", 5)).collect();
        assert_eq!(compute_total(&lines).unwrap(), 15);
        assert_eq!(compute_total(&[]).unwrap(), 0);
    }

    #[test]
    fn test_negative_price_rejected() {
        let lines = vec![CartLine::new("Hat", 5), CartLine::new("Refund", -2)];
        assert!(matches!(
            compute_total(&lines),
            Err(SwapError::Validation(_))
        ));
    }

    #[test]
    fn test_pay_with_credits_deducts_exactly() {
        let mut profile = UserProfile::seeded(&mut Catalog::seeded());
        let receipt = tokio_test::assert_ok!(pay_with_credits(&mut profile, 15));
        assert_eq!(receipt.remaining, 15);
        assert_eq!(profile.credits, 15);

        tokio_test::assert_ok!(pay_with_credits(&mut profile, 15));
        assert_eq!(profile.credits, 0);
        tokio_test::assert_err!(pay_with_credits(&mut profile, 1));
    }

    #[test]
    fn test_pay_with_credits_insufficient_is_atomic() {
        let mut profile = UserProfile::seeded(&mut Catalog::seeded());
        let result = pay_with_credits(&mut profile, 31);

        assert_eq!(
            result,
            Err(SwapError::InsufficientCredits {
                required: 31,
                available: 30
            })
        );
        assert_eq!(profile.credits, 30);
    }

    #[test]
    fn test_card_requires_every_field() {
        let receipt = pay_with_external_method(PaymentMethod::Card, &card("4111111111111111"));
        assert_eq!(receipt.unwrap().method, PaymentMethod::Card);

        let err = pay_with_external_method(PaymentMethod::Card, &card(" ")).unwrap_err();
        assert_eq!(err, SwapError::Validation("missing card number".to_string()));
    }

    #[test]
    fn test_paypal_requires_credentials() {
        let creds = ExternalCredentials::PayPal {
            email: "touraj@sbs.barcelona".to_string(),
            password: String::new(),
        };
        assert!(pay_with_external_method(PaymentMethod::PayPal, &creds).is_err());
    }

    #[test]
    fn test_method_mismatch() {
        let result = pay_with_external_method(PaymentMethod::PayPal, &card("4111"));
        assert!(matches!(result, Err(SwapError::Validation(_))));
    }

    #[test]
    fn test_debug_hides_secrets() {
        let rendered = format!("{:?}", card("4111111111111111"));
        assert!(!rendered.contains("4111"));
        assert!(!rendered.contains("123"));
    }

    #[test]
    fn test_cart_from_reservations_and_settle() {
        let mut state = AppState::seeded();
        for id in [3, 4, 5] {
            reserve(
                &mut state.profile,
                &mut state.catalog,
                &state.lockers,
                ItemId(id),
                DEFAULT_PICKUP_WINDOW_DAYS,
            )
            .unwrap();
        }

        let cart = Cart::from_reservations(&state.profile, &state.catalog, 5).unwrap();
        assert_eq!(cart.total().unwrap(), 15);

        pay_with_credits(&mut state.profile, cart.total().unwrap()).unwrap();
        settle(&mut state.profile, &mut state.catalog, &cart.item_ids()).unwrap();

        assert_eq!(state.profile.credits, 15);
        assert_eq!(state.profile.items_exchanged(), 5);
        assert_eq!(state.catalog.get(ItemId(4)).unwrap().status, ItemStatus::Settled);
        assert!(Cart::from_reservations(&state.profile, &state.catalog, 5)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_price_beyond_cart_range_is_rejected() {
        let mut state = AppState::seeded();
        reserve(
            &mut state.profile,
            &mut state.catalog,
            &state.lockers,
            ItemId(3),
            DEFAULT_PICKUP_WINDOW_DAYS,
        )
        .unwrap();

        let result = Cart::from_reservations(&state.profile, &state.catalog, u64::MAX);
        assert!(matches!(result, Err(SwapError::Validation(_))));

        let max = i64::MAX as u64;
        let cart = Cart::from_reservations(&state.profile, &state.catalog, max).unwrap();
        assert_eq!(cart.lines[0].price, i64::MAX);
    }

    #[test]
    fn test_settle_unknown_item_changes_nothing() {
        let mut state = AppState::seeded();
        let result = settle(&mut state.profile, &mut state.catalog, &[ItemId(1), ItemId(77)]);
        assert!(matches!(result, Err(SwapError::NotFound(_))));
        assert_eq!(state.catalog.get(ItemId(1)).unwrap().status, ItemStatus::Available);
        assert_eq!(state.profile.items_exchanged(), 2);
    }
}
