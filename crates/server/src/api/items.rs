//! # Items API
//!
//! Catalog search, new listings, AI suggestions and reservations.

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use switchd_core::blob::BlobHandle;
use switchd_core::engine::{ReservationRecord, ReserveOutcome};
use switchd_core::session::{EventData, UiEvent};
use switchd_core::state::{Category, Item, ItemDraft, ItemId, ItemStatus};
use switchd_core::SwapError;
use utoipa::{IntoParams, ToSchema};

use super::{unexpected, unpack, ApiError, ApiResult, ErrorResponse, NoticeResponse};
use crate::SharedState;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ItemResponse {
    pub id: u32,
    pub name: String,
    pub category: String,
    pub description: String,
    pub location: String,
    /// Blob handle, fetchable from `/api/v1/blobs/{handle}`
    pub image_ref: String,
    pub rating: f32,
    pub available_from: NaiveDate,
    /// available, reserved or settled
    pub status: String,
}

impl From<Item> for ItemResponse {
    fn from(item: Item) -> Self {
        let status = match item.status {
            ItemStatus::Available => "available",
            ItemStatus::Reserved => "reserved",
            ItemStatus::Settled => "settled",
        };
        Self {
            id: item.id.0,
            name: item.name,
            category: item.category.display_name().to_string(),
            description: item.description,
            location: item.location,
            image_ref: item.image_ref.as_str().to_string(),
            rating: item.rating,
            available_from: item.available_from,
            status: status.to_string(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ItemListResponse {
    pub items: Vec<ItemResponse>,
    pub total: usize,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Case-insensitive substring of the item name
    pub q: Option<String>,
}

/// Listing form, shared by the catalog and profile endpoints
#[derive(Debug, Deserialize, ToSchema)]
pub struct NewItemRequest {
    #[serde(default)]
    pub name: String,
    /// Clothing, Accessories or Footwear
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    /// Handle returned by `POST /api/v1/blobs`
    #[serde(default)]
    pub image_ref: Option<String>,
    #[serde(default)]
    pub rating: Option<f32>,
    #[serde(default)]
    pub available_from: Option<NaiveDate>,
}

impl NewItemRequest {
    pub fn into_draft(self) -> Result<ItemDraft, SwapError> {
        let category = match self.category.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(name) => Some(parse_category(name)?),
        };
        let image_ref = self
            .image_ref
            .filter(|handle| !handle.trim().is_empty())
            .map(BlobHandle::new);

        Ok(ItemDraft {
            name: self.name,
            category,
            description: self.description,
            location: self.location,
            image_ref,
            rating: self.rating,
            available_from: self.available_from,
        })
    }
}

fn parse_category(name: &str) -> Result<Category, SwapError> {
    Category::all()
        .into_iter()
        .find(|c| c.display_name().eq_ignore_ascii_case(name))
        .ok_or_else(|| SwapError::validation(format!("unknown category '{}'", name)))
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListingResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<NoticeResponse>,
    pub item: ItemResponse,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SuggestionResponse {
    pub item_id: u32,
    pub suggestions: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReservationResponse {
    pub item: ItemResponse,
    pub pickup_start: NaiveDate,
    pub pickup_end: NaiveDate,
    /// Human-readable window, e.g. "June 20–June 23"
    pub pickup_window: String,
    pub locker: String,
}

impl From<ReservationRecord> for ReservationResponse {
    fn from(record: ReservationRecord) -> Self {
        Self {
            pickup_start: record.pickup.start,
            pickup_end: record.pickup.end,
            pickup_window: record.pickup.to_string(),
            locker: record.locker.to_string(),
            item: record.item.into(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReserveResponse {
    /// True when the item was already on the user's reservation list
    pub already_reserved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<NoticeResponse>,
    pub reservation: ReservationResponse,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReservationListResponse {
    pub reservations: Vec<ReservationResponse>,
}

pub fn item_routes() -> Router<SharedState> {
    Router::new()
        .route("/", get(list_items).post(create_item))
        .route("/:id/suggest", post(suggest_similar))
        .route("/:id/reserve", post(reserve_item))
}

/// Search the catalog
#[utoipa::path(
    get,
    path = "/api/v1/items",
    tag = "items",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching items in catalog order", body = ItemListResponse)
    )
)]
pub async fn list_items(
    State(state): State<SharedState>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<ItemListResponse> {
    let reply = state.dispatch(UiEvent::Search { query: query.q }).await;
    match unpack(reply)? {
        (_, EventData::Items(items)) => {
            let items: Vec<ItemResponse> = items.into_iter().map(ItemResponse::from).collect();
            Ok(Json(ItemListResponse {
                total: items.len(),
                items,
            }))
        }
        (_, other) => Err(unexpected(&other)),
    }
}

/// List a new item in the catalog
#[utoipa::path(
    post,
    path = "/api/v1/items",
    tag = "items",
    request_body = NewItemRequest,
    responses(
        (status = 200, description = "Item listed", body = ListingResponse),
        (status = 422, description = "Missing name or image", body = ErrorResponse)
    )
)]
pub async fn create_item(
    State(state): State<SharedState>,
    Json(req): Json<NewItemRequest>,
) -> ApiResult<ListingResponse> {
    let draft = req.into_draft()?;
    let reply = state.dispatch(UiEvent::SubmitNewItem { draft }).await;
    listing_response(unpack(reply)?)
}

pub(crate) fn listing_response(
    unpacked: (Option<NoticeResponse>, EventData),
) -> ApiResult<ListingResponse> {
    match unpacked {
        (notice, EventData::Listing(item)) => Ok(Json(ListingResponse {
            notice,
            item: item.into(),
        })),
        (_, other) => Err(unexpected(&other)),
    }
}

/// Ask the model for secondhand items similar to this one
#[utoipa::path(
    post,
    path = "/api/v1/items/{id}/suggest",
    tag = "items",
    params(("id" = u32, Path, description = "Item id")),
    responses(
        (status = 200, description = "Suggestions as free text", body = SuggestionResponse),
        (status = 404, description = "No such item", body = ErrorResponse),
        (status = 502, description = "Suggestion service failed", body = ErrorResponse)
    )
)]
pub async fn suggest_similar(
    State(state): State<SharedState>,
    Path(id): Path<u32>,
) -> ApiResult<SuggestionResponse> {
    let reply = state
        .dispatch(UiEvent::SuggestSimilar { item_id: ItemId(id) })
        .await;
    match unpack(reply)? {
        (_, EventData::Suggestion { item_id, text }) => Ok(Json(SuggestionResponse {
            item_id: item_id.0,
            suggestions: text,
        })),
        (_, other) => Err(unexpected(&other)),
    }
}

/// Reserve an item for locker pickup
#[utoipa::path(
    post,
    path = "/api/v1/items/{id}/reserve",
    tag = "items",
    params(("id" = u32, Path, description = "Item id")),
    responses(
        (status = 200, description = "Reserved, or already reserved", body = ReserveResponse),
        (status = 404, description = "No such item", body = ErrorResponse)
    )
)]
pub async fn reserve_item(
    State(state): State<SharedState>,
    Path(id): Path<u32>,
) -> ApiResult<ReserveResponse> {
    let reply = state.dispatch(UiEvent::Reserve { item_id: ItemId(id) }).await;
    match unpack(reply)? {
        (notice, EventData::Reservation(outcome)) => {
            let already_reserved = !outcome.is_new();
            let record = match outcome {
                ReserveOutcome::Reserved(record) | ReserveOutcome::AlreadyReserved(record) => record,
            };
            Ok(Json(ReserveResponse {
                already_reserved,
                notice,
                reservation: record.into(),
            }))
        }
        (_, other) => Err(unexpected(&other)),
    }
}

/// The user's reservations, oldest first
#[utoipa::path(
    get,
    path = "/api/v1/reservations",
    tag = "items",
    responses(
        (status = 200, description = "Reserved items with pickup details", body = ReservationListResponse)
    )
)]
pub async fn list_reservations(
    State(state): State<SharedState>,
) -> ApiResult<ReservationListResponse> {
    let records = state.session.lock().await.reservations().map_err(ApiError::from)?;
    Ok(Json(ReservationListResponse {
        reservations: records.into_iter().map(ReservationResponse::from).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_item_request_to_draft() {
        let req: NewItemRequest = serde_json::from_str(
            r#"{"name":"Green Parka","category":"footwear","image_ref":"blobs/0001_parka.png"}"#,
        )
        .unwrap();
        let draft = req.into_draft().unwrap();
        assert_eq!(draft.category, Some(Category::Footwear));
        assert_eq!(draft.image_ref, Some(BlobHandle::new("blobs/0001_parka.png")));
    }

    #[test]
    fn test_blank_image_ref_is_missing() {
        let req: NewItemRequest =
            serde_json::from_str(r#"{"name":"Green Parka","image_ref":"  "}"#).unwrap();
        assert_eq!(req.into_draft().unwrap().image_ref, None);
    }

    #[test]
    fn test_unknown_category_rejected() {
        let req: NewItemRequest =
            serde_json::from_str(r#"{"name":"Hat","category":"Hats"}"#).unwrap();
        assert!(matches!(req.into_draft(), Err(SwapError::Validation(_))));
    }
}
