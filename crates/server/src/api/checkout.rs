//! # Checkout API
//!
//! Cart view, the three payment methods, and the transaction log.

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use switchd_core::engine::{CartLine, PaymentMethod};
use switchd_core::session::{EventData, UiEvent};
use switchd_core::state::Transaction;
use utoipa::ToSchema;

use super::{unexpected, unpack, ApiResult, ErrorResponse, NoticeResponse};
use crate::SharedState;

#[derive(Debug, Serialize, ToSchema)]
pub struct CartLineResponse {
    /// Absent for lines that are not backed by a catalog item
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_id: Option<u32>,
    pub name: String,
    pub price: i64,
}

impl From<CartLine> for CartLineResponse {
    fn from(line: CartLine) -> Self {
        Self {
            item_id: line.item_id.map(|id| id.0),
            name: line.name,
            price: line.price,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartResponse {
    pub lines: Vec<CartLineResponse>,
    pub total: u64,
    /// Credits available for paying with Switch'd credits
    pub credits: u64,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct CardPaymentRequest {
    pub card_number: String,
    pub expiry: String,
    pub cvv: String,
    pub name_on_card: String,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct PayPalPaymentRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TransactionResponse {
    pub id: u32,
    /// card, paypal or credits
    pub method: String,
    pub total: u64,
    pub item_ids: Vec<u32>,
    pub settled_at: DateTime<Utc>,
}

impl From<Transaction> for TransactionResponse {
    fn from(transaction: Transaction) -> Self {
        let method = match transaction.method {
            PaymentMethod::Card => "card",
            PaymentMethod::PayPal => "paypal",
            PaymentMethod::Credits => "credits",
        };
        Self {
            id: transaction.id,
            method: method.to_string(),
            total: transaction.total,
            item_ids: transaction.item_ids.iter().map(|id| id.0).collect(),
            settled_at: transaction.settled_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<NoticeResponse>,
    pub transaction: TransactionResponse,
    /// Credit balance after the payment
    pub credits: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TransactionListResponse {
    pub transactions: Vec<TransactionResponse>,
}

pub fn checkout_routes() -> Router<SharedState> {
    Router::new()
        .route("/", get(get_cart))
        .route("/card", post(pay_card))
        .route("/paypal", post(pay_paypal))
        .route("/credits", post(pay_credits))
}

/// Current cart: every reserved, unpaid item at the flat price
#[utoipa::path(
    get,
    path = "/api/v1/checkout",
    tag = "checkout",
    responses(
        (status = 200, description = "Cart lines and total", body = CartResponse)
    )
)]
pub async fn get_cart(State(state): State<SharedState>) -> ApiResult<CartResponse> {
    let session = state.session.lock().await;
    let cart = session.cart()?;
    let total = cart.total()?;
    Ok(Json(CartResponse {
        total,
        credits: session.state().profile.credits,
        lines: cart.lines.into_iter().map(CartLineResponse::from).collect(),
    }))
}

/// Pay for the cart by card
#[utoipa::path(
    post,
    path = "/api/v1/checkout/card",
    tag = "checkout",
    request_body = CardPaymentRequest,
    responses(
        (status = 200, description = "Payment accepted", body = PaymentResponse),
        (status = 422, description = "Empty cart or missing card fields", body = ErrorResponse)
    )
)]
pub async fn pay_card(
    State(state): State<SharedState>,
    Json(req): Json<CardPaymentRequest>,
) -> ApiResult<PaymentResponse> {
    pay(
        &state,
        UiEvent::PayCard {
            card_number: req.card_number,
            expiry: req.expiry,
            cvv: req.cvv,
            name_on_card: req.name_on_card,
        },
    )
    .await
}

/// Pay for the cart with PayPal
#[utoipa::path(
    post,
    path = "/api/v1/checkout/paypal",
    tag = "checkout",
    request_body = PayPalPaymentRequest,
    responses(
        (status = 200, description = "Payment accepted", body = PaymentResponse),
        (status = 422, description = "Empty cart or missing credentials", body = ErrorResponse)
    )
)]
pub async fn pay_paypal(
    State(state): State<SharedState>,
    Json(req): Json<PayPalPaymentRequest>,
) -> ApiResult<PaymentResponse> {
    pay(
        &state,
        UiEvent::PayPalPay {
            email: req.email,
            password: req.password,
        },
    )
    .await
}

/// Pay for the cart with Switch'd credits
#[utoipa::path(
    post,
    path = "/api/v1/checkout/credits",
    tag = "checkout",
    responses(
        (status = 200, description = "Credits deducted", body = PaymentResponse),
        (status = 402, description = "Not enough credits", body = ErrorResponse),
        (status = 422, description = "Empty cart", body = ErrorResponse)
    )
)]
pub async fn pay_credits(State(state): State<SharedState>) -> ApiResult<PaymentResponse> {
    pay(&state, UiEvent::PayWithCredits).await
}

async fn pay(state: &SharedState, event: UiEvent) -> ApiResult<PaymentResponse> {
    let mut session = state.session.lock().await;
    let reply = session.handle(event).await;
    let credits = session.state().profile.credits;
    drop(session);

    match unpack(reply)? {
        (notice, EventData::Payment(transaction)) => Ok(Json(PaymentResponse {
            notice,
            transaction: transaction.into(),
            credits,
        })),
        (_, other) => Err(unexpected(&other)),
    }
}

/// Completed checkouts, oldest first
#[utoipa::path(
    get,
    path = "/api/v1/transactions",
    tag = "checkout",
    responses(
        (status = 200, description = "Transaction log", body = TransactionListResponse)
    )
)]
pub async fn list_transactions(State(state): State<SharedState>) -> Json<TransactionListResponse> {
    let session = state.session.lock().await;
    Json(TransactionListResponse {
        transactions: session
            .state()
            .transactions
            .iter()
            .cloned()
            .map(TransactionResponse::from)
            .collect(),
    })
}

