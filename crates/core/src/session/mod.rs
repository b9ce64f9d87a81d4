//! # Session
//!
//! Owns the app state for one user and handles UI events one at a time.
//! Every error is caught here, logged, and turned into a notice; nothing
//! propagates past the event that caused it.
//!
//! ```rust,ignore
//! use switchd_core::session::{Session, UiEvent};
//!
//! let mut session = Session::seeded(config, suggester);
//! let reply = session.handle(UiEvent::Reserve { item_id: ItemId(3) }).await;
//! ```

pub mod events;

pub use events::{EventData, EventReply, Notice, NoticeLevel, UiEvent};

use crate::config::SwitchdConfig;
use crate::engine::{self, Cart, ExternalCredentials, PaymentMethod, ReservationRecord, ReserveOutcome};
use crate::error::{Result, SwapError};
use crate::state::{AppState, Item, ItemDraft, ItemId, Transaction};
use crate::suggest::SuggestionService;
use chrono::NaiveDate;
use std::sync::Arc;

pub struct Session {
    state: AppState,
    config: SwitchdConfig,
    suggester: Arc<dyn SuggestionService>,
}

impl Session {
    pub fn new(state: AppState, config: SwitchdConfig, suggester: Arc<dyn SuggestionService>) -> Self {
        Self {
            state,
            config,
            suggester,
        }
    }

    /// Session over the demo catalog, account and lockers
    pub fn seeded(config: SwitchdConfig, suggester: Arc<dyn SuggestionService>) -> Self {
        Self::new(AppState::seeded(), config, suggester)
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn config(&self) -> &SwitchdConfig {
        &self.config
    }

    /// Swap settings; the suggestion service is rebuilt by the caller
    pub fn reconfigure(&mut self, config: SwitchdConfig, suggester: Arc<dyn SuggestionService>) {
        self.config = config;
        self.suggester = suggester;
    }

    /// Handle one UI event to completion
    pub async fn handle(&mut self, event: UiEvent) -> EventReply {
        let name = event.name();
        tracing::debug!(event = name, "Handling UI event");

        match event {
            UiEvent::Search { query } => {
                let items = self.search(query.as_deref());
                EventReply::ok(None, EventData::Items(items))
            }
            UiEvent::SuggestSimilar { item_id } => match self.suggest_similar(item_id).await {
                Ok(text) => EventReply::ok(
                    Some(Notice::info(text.clone())),
                    EventData::Suggestion { item_id, text },
                ),
                Err(e) => {
                    let notice = Notice::error(format!("AI suggestion failed. {}", e));
                    report(name, e, notice)
                }
            },
            UiEvent::Reserve { item_id } => match self.reserve(item_id) {
                Ok(outcome) => {
                    let notice = reservation_notice(&outcome);
                    EventReply::ok(Some(notice), EventData::Reservation(outcome))
                }
                Err(e) => {
                    let notice = Notice::from_error(&e);
                    report(name, e, notice)
                }
            },
            UiEvent::SubmitNewItem { draft } => match self.submit_new_item(draft) {
                Ok(item) => EventReply::ok(Some(Notice::success("Item added!")), EventData::Listing(item)),
                Err(e) => {
                    let notice = Notice::from_error(&e);
                    report(name, e, notice)
                }
            },
            UiEvent::AddProfileItem { draft } => match self.add_profile_item(draft) {
                Ok(item) => EventReply::ok(Some(Notice::success("Item added!")), EventData::Listing(item)),
                Err(e) => {
                    let notice = match e {
                        SwapError::Validation(_) => {
                            Notice::warning("Please fill in all fields and upload an image.")
                        }
                        _ => Notice::from_error(&e),
                    };
                    report(name, e, notice)
                }
            },
            UiEvent::PayCard {
                card_number,
                expiry,
                cvv,
                name_on_card,
            } => {
                let credentials = ExternalCredentials::Card {
                    card_number,
                    expiry,
                    cvv,
                    name_on_card,
                };
                let result = self.pay_external(PaymentMethod::Card, &credentials);
                finish_payment(name, result)
            }
            UiEvent::PayPalPay { email, password } => {
                let credentials = ExternalCredentials::PayPal { email, password };
                let result = self.pay_external(PaymentMethod::PayPal, &credentials);
                finish_payment(name, result)
            }
            UiEvent::PayWithCredits => {
                let result = self.pay_with_credits();
                finish_payment(name, result)
            }
        }
    }

    /// Catalog items whose name contains `query`
    pub fn search(&self, query: Option<&str>) -> Vec<Item> {
        self.state
            .catalog
            .list_items(query)
            .into_iter()
            .cloned()
            .collect()
    }

    pub async fn suggest_similar(&self, item_id: ItemId) -> Result<String> {
        let description = self.state.catalog.require(item_id)?.description.clone();
        self.suggester.suggest_similar(&description).await
    }

    pub fn reserve(&mut self, item_id: ItemId) -> Result<ReserveOutcome> {
        let state = &mut self.state;
        engine::reserve(
            &mut state.profile,
            &mut state.catalog,
            &state.lockers,
            item_id,
            self.config.pickup_window_days,
        )
    }

    pub fn reservations(&self) -> Result<Vec<ReservationRecord>> {
        engine::list_reservations(
            &self.state.profile,
            &self.state.catalog,
            &self.state.lockers,
            self.config.pickup_window_days,
        )
    }

    /// List a new item in the catalog and record it as the user's own
    pub fn submit_new_item(&mut self, draft: ItemDraft) -> Result<Item> {
        let item = self.state.catalog.add_item(draft, today())?;
        self.state.profile.owned_items.push(item.clone());
        Ok(item)
    }

    /// Add an item to the profile without listing it. Needs a name, a
    /// description and an image.
    pub fn add_profile_item(&mut self, draft: ItemDraft) -> Result<Item> {
        if draft.description.trim().is_empty() {
            return Err(SwapError::validation("item description is required"));
        }
        let item = self.state.catalog.mint(draft, today())?;
        self.state.profile.owned_items.push(item.clone());
        tracing::info!(item_id = %item.id, name = %item.name, "Profile item added");
        Ok(item)
    }

    /// Unpaid reservations at the configured flat price
    pub fn cart(&self) -> Result<Cart> {
        Cart::from_reservations(
            &self.state.profile,
            &self.state.catalog,
            self.config.item_price,
        )
    }

    fn checkout_cart(&self) -> Result<(Cart, u64)> {
        let cart = self.cart()?;
        if cart.is_empty() {
            return Err(SwapError::validation("there is nothing in your cart"));
        }
        let total = cart.total()?;
        Ok((cart, total))
    }

    pub fn pay_with_credits(&mut self) -> Result<Transaction> {
        let (cart, total) = self.checkout_cart()?;
        engine::pay_with_credits(&mut self.state.profile, total)?;
        self.complete_checkout(PaymentMethod::Credits, total, cart)
    }

    pub fn pay_external(
        &mut self,
        method: PaymentMethod,
        credentials: &ExternalCredentials,
    ) -> Result<Transaction> {
        let (cart, total) = self.checkout_cart()?;
        engine::pay_with_external_method(method, credentials)?;
        self.complete_checkout(method, total, cart)
    }

    fn complete_checkout(&mut self, method: PaymentMethod, total: u64, cart: Cart) -> Result<Transaction> {
        let item_ids = cart.item_ids();
        let state = &mut self.state;
        engine::settle(&mut state.profile, &mut state.catalog, &item_ids)?;
        let transaction = state.record_transaction(method, total, item_ids).clone();
        tracing::info!(
            transaction_id = transaction.id,
            method = method.display_name(),
            total,
            "Checkout complete"
        );
        Ok(transaction)
    }
}

impl Notice {
    /// Generic notice for an error with no event-specific wording
    pub fn from_error(err: &SwapError) -> Self {
        match err {
            SwapError::Validation(msg) => Notice::warning(capitalize(msg)),
            SwapError::InsufficientCredits { .. } => Notice::error("Not enough credits."),
            SwapError::Service(_) => Notice::error(format!("AI suggestion failed. {}", err)),
            _ => Notice::error(format!("Something went wrong: {}", err)),
        }
    }
}

fn finish_payment(event: &'static str, result: Result<Transaction>) -> EventReply {
    match result {
        Ok(transaction) => {
            let message = match transaction.method {
                PaymentMethod::Credits => "Paid using Switch'd credits!".to_string(),
                method => format!("Payment successful via {}!", method.display_name()),
            };
            EventReply::ok(Some(Notice::success(message)), EventData::Payment(transaction))
        }
        Err(e) => {
            let notice = match (&e, event) {
                (SwapError::InsufficientCredits { .. }, _) => Notice::error("Not enough credits."),
                (SwapError::Validation(msg), _) if msg.contains("cart") => Notice::warning(msg.clone()),
                (SwapError::Validation(_), "pay_card") => {
                    Notice::error("Please fill out all card fields.")
                }
                (SwapError::Validation(_), "paypal_pay") => {
                    Notice::error("Please enter your PayPal credentials.")
                }
                _ => Notice::from_error(&e),
            };
            report(event, e, notice)
        }
    }
}

fn reservation_notice(outcome: &ReserveOutcome) -> Notice {
    match outcome {
        ReserveOutcome::Reserved(record) => Notice::success(format!(
            "Reserved {}! Pick up between {} at {}.",
            record.item.name, record.pickup, record.locker
        )),
        ReserveOutcome::AlreadyReserved(_) => Notice::info("You have already reserved this item."),
    }
}

/// Log a failed event at a level matching how surprising it is
fn report(event: &'static str, err: SwapError, notice: Notice) -> EventReply {
    match &err {
        SwapError::Validation(_) | SwapError::InsufficientCredits { .. } => {
            tracing::info!(event, error = %err, "Event rejected");
        }
        SwapError::Service(_) | SwapError::NotFound(_) => {
            tracing::warn!(event, error = %err, "Event failed");
        }
        SwapError::Config(_) | SwapError::Storage(_) => {
            tracing::error!(event, error = %err, "Event failed");
        }
    }
    EventReply::failed(err, notice)
}

fn capitalize(msg: &str) -> String {
    let mut chars = msg.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect::<String>() + ".",
        None => String::new(),
    }
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blob::BlobHandle;
    use crate::state::ItemStatus;
    use crate::suggest::DisabledSuggestionService;
    use async_trait::async_trait;

    struct CannedSuggestions;

    #[async_trait]
    impl SuggestionService for CannedSuggestions {
        async fn suggest_similar(&self, description: &str) -> Result<String> {
            Ok(format!("Like '{}': a linen shirt", description))
        }
    }

    fn session() -> Session {
        Session::seeded(SwitchdConfig::default(), Arc::new(CannedSuggestions))
    }

    fn card_event(number: &str) -> UiEvent {
        UiEvent::PayCard {
            card_number: number.to_string(),
            expiry: "12/27".to_string(),
            cvv: "123".to_string(),
            name_on_card: "Touraj Vaziri".to_string(),
        }
    }

    #[tokio::test]
    async fn test_search_event() {
        let mut session = session();
        let reply = session
            .handle(UiEvent::Search {
                query: Some("denim".to_string()),
            })
            .await;

        match reply.data {
            Some(EventData::Items(items)) => assert_eq!(items.len(), 2),
            other => panic!("unexpected reply: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_reserve_event_messages() {
        let mut session = session();
        let reply = session.handle(UiEvent::Reserve { item_id: ItemId(3) }).await;
        let notice = reply.notice.unwrap();
        assert_eq!(notice.level, NoticeLevel::Success);
        assert_eq!(
            notice.message,
            "Reserved Red Running Shoes! Pick up between June 20–June 23 at Locker A, 123 Main St, Barcelona."
        );

        let again = session.handle(UiEvent::Reserve { item_id: ItemId(3) }).await;
        assert!(again.is_ok());
        assert_eq!(again.notice.unwrap().message, "You have already reserved this item.");
        assert_eq!(session.reservations().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_suggestion_failure_is_contained() {
        let mut session = Session::seeded(
            SwitchdConfig::default(),
            Arc::new(DisabledSuggestionService::new("quota exceeded")),
        );
        session.reserve(ItemId(1)).unwrap();
        let credits_before = session.state().profile.credits;

        let reply = session.handle(UiEvent::SuggestSimilar { item_id: ItemId(2) }).await;

        assert!(matches!(reply.failure(), Some(SwapError::Service(_))));
        assert!(reply.notice.unwrap().message.starts_with("AI suggestion failed."));
        assert_eq!(session.state().profile.credits, credits_before);
        assert_eq!(session.state().profile.reservations, vec![ItemId(1)]);
    }

    #[tokio::test]
    async fn test_suggestion_uses_item_description() {
        let session = session();
        let text = session.suggest_similar(ItemId(3)).await.unwrap();
        assert!(text.contains("Comfy and light."));
    }

    #[tokio::test]
    async fn test_checkout_with_credits() {
        let mut session = session();
        for id in [1, 2, 3] {
            session.reserve(ItemId(id)).unwrap();
        }
        assert_eq!(session.cart().unwrap().total().unwrap(), 15);

        let reply = session.handle(UiEvent::PayWithCredits).await;
        assert!(reply.is_ok());
        assert_eq!(reply.notice.unwrap().message, "Paid using Switch'd credits!");

        let state = session.state();
        assert_eq!(state.profile.credits, 15);
        assert_eq!(state.transactions.len(), 1);
        assert_eq!(state.catalog.get(ItemId(2)).unwrap().status, ItemStatus::Settled);
        assert!(session.cart().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_credits_shortfall_changes_nothing() {
        let mut config = SwitchdConfig::default();
        config.item_price = 20;
        let mut session = Session::seeded(config, Arc::new(CannedSuggestions));
        session.reserve(ItemId(1)).unwrap();
        session.reserve(ItemId(2)).unwrap();

        let reply = session.handle(UiEvent::PayWithCredits).await;

        assert_eq!(reply.notice.unwrap().message, "Not enough credits.");
        let state = session.state();
        assert_eq!(state.profile.credits, 30);
        assert!(state.transactions.is_empty());
        assert_eq!(state.catalog.get(ItemId(1)).unwrap().status, ItemStatus::Reserved);
    }

    #[tokio::test]
    async fn test_empty_cart_cannot_be_paid() {
        let mut session = session();
        let reply = session.handle(card_event("4111111111111111")).await;
        assert!(matches!(reply.failure(), Some(SwapError::Validation(_))));
        assert!(session.state().transactions.is_empty());
    }

    #[tokio::test]
    async fn test_card_payment_keeps_credits() {
        let mut session = session();
        session.reserve(ItemId(4)).unwrap();

        let bad = session.handle(card_event("")).await;
        assert_eq!(bad.notice.unwrap().message, "Please fill out all card fields.");

        let good = session.handle(card_event("4111111111111111")).await;
        assert_eq!(good.notice.unwrap().message, "Payment successful via Card!");
        assert_eq!(session.state().profile.credits, 30);
    }

    #[tokio::test]
    async fn test_paypal_needs_credentials() {
        let mut session = session();
        session.reserve(ItemId(4)).unwrap();
        let reply = session
            .handle(UiEvent::PayPalPay {
                email: "touraj@sbs.barcelona".to_string(),
                password: String::new(),
            })
            .await;
        assert_eq!(reply.notice.unwrap().message, "Please enter your PayPal credentials.");
    }

    #[tokio::test]
    async fn test_submit_new_item_lists_and_owns() {
        let mut session = session();
        let draft = ItemDraft::new("Green Parka", BlobHandle::new("blobs/0001_parka.png"))
            .with_description("Warm and waterproof.");

        let reply = session.handle(UiEvent::SubmitNewItem { draft }).await;
        assert!(reply.is_ok());
        assert_eq!(session.state().catalog.len(), 9);
        assert_eq!(session.state().profile.owned_items.len(), 4);
    }

    #[tokio::test]
    async fn test_submit_without_image_is_rejected() {
        let mut session = session();
        let draft = ItemDraft {
            name: "Green Parka".to_string(),
            ..Default::default()
        };
        let reply = session.handle(UiEvent::SubmitNewItem { draft }).await;

        assert_eq!(reply.notice.as_ref().unwrap().level, NoticeLevel::Warning);
        assert_eq!(session.state().catalog.len(), 8);
        assert_eq!(session.state().profile.owned_items.len(), 3);
    }

    #[tokio::test]
    async fn test_profile_item_stays_off_catalog() {
        let mut session = session();
        let draft = ItemDraft::new("Blue Shirt", BlobHandle::new("blobs/0002_blueshirt.png"));

        let missing_desc = session
            .handle(UiEvent::AddProfileItem {
                draft: draft.clone(),
            })
            .await;
        assert_eq!(
            missing_desc.notice.unwrap().message,
            "Please fill in all fields and upload an image."
        );

        let reply = session
            .handle(UiEvent::AddProfileItem {
                draft: draft.with_description("Cotton, size M."),
            })
            .await;
        assert!(reply.is_ok());
        assert_eq!(session.state().catalog.len(), 8);
        let added = session.state().profile.owned_items.last().unwrap();
        assert_eq!(added.name, "Blue Shirt");
        assert_eq!(added.image_ref.as_str(), "blobs/0002_blueshirt.png");
    }
}
