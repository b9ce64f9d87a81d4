//! # Profile API
//!
//! The signed-in user's account, plus the locker and community directories.

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use switchd_core::session::UiEvent;
use switchd_core::state::{community_members, AccountStatus, CommunityMember, Locker};
use utoipa::ToSchema;

use super::items::{listing_response, ItemResponse, ListingResponse, NewItemRequest};
use super::{unpack, ApiResult, ErrorResponse};
use crate::SharedState;

#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileResponse {
    pub name: String,
    pub email: String,
    /// active or suspended
    pub status: String,
    pub credits: u64,
    pub items_exchanged: usize,
    pub history_item_ids: Vec<u32>,
    pub reserved_item_ids: Vec<u32>,
    pub owned_items: Vec<ItemResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LockerResponse {
    pub name: String,
    pub address: String,
    pub city: String,
    /// "Locker A, 123 Main St, Barcelona"
    pub label: String,
}

impl From<&Locker> for LockerResponse {
    fn from(locker: &Locker) -> Self {
        Self {
            name: locker.name.clone(),
            address: locker.address.clone(),
            city: locker.city.clone(),
            label: locker.to_string(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LockerListResponse {
    pub lockers: Vec<LockerResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CommunityMemberResponse {
    pub name: String,
    pub switches: u32,
    pub rating: u8,
}

impl From<CommunityMember> for CommunityMemberResponse {
    fn from(member: CommunityMember) -> Self {
        Self {
            name: member.name,
            switches: member.switches,
            rating: member.rating,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CommunityResponse {
    pub members: Vec<CommunityMemberResponse>,
}

pub fn profile_routes() -> Router<SharedState> {
    Router::new()
        .route("/", get(get_profile))
        .route("/items", post(add_profile_item))
}

/// Get the user's profile
#[utoipa::path(
    get,
    path = "/api/v1/profile",
    tag = "profile",
    responses(
        (status = 200, description = "Account, credits and own listings", body = ProfileResponse)
    )
)]
pub async fn get_profile(State(state): State<SharedState>) -> Json<ProfileResponse> {
    let session = state.session.lock().await;
    let profile = &session.state().profile;
    let status = match profile.status {
        AccountStatus::Active => "active",
        AccountStatus::Suspended => "suspended",
    };

    Json(ProfileResponse {
        name: profile.name.clone(),
        email: profile.email.clone(),
        status: status.to_string(),
        credits: profile.credits,
        items_exchanged: profile.items_exchanged(),
        history_item_ids: profile.history_item_ids.iter().map(|id| id.0).collect(),
        reserved_item_ids: profile.reservations.iter().map(|id| id.0).collect(),
        owned_items: profile
            .owned_items
            .iter()
            .cloned()
            .map(ItemResponse::from)
            .collect(),
    })
}

/// Add an item to the profile without listing it in the catalog
#[utoipa::path(
    post,
    path = "/api/v1/profile/items",
    tag = "profile",
    request_body = NewItemRequest,
    responses(
        (status = 200, description = "Item added to the profile", body = ListingResponse),
        (status = 422, description = "Missing name, description or image", body = ErrorResponse)
    )
)]
pub async fn add_profile_item(
    State(state): State<SharedState>,
    Json(req): Json<NewItemRequest>,
) -> ApiResult<ListingResponse> {
    let draft = req.into_draft()?;
    let reply = state.dispatch(UiEvent::AddProfileItem { draft }).await;
    listing_response(unpack(reply)?)
}

/// Pickup lockers
#[utoipa::path(
    get,
    path = "/api/v1/lockers",
    tag = "profile",
    responses(
        (status = 200, description = "All pickup lockers", body = LockerListResponse)
    )
)]
pub async fn list_lockers(State(state): State<SharedState>) -> Json<LockerListResponse> {
    let session = state.session.lock().await;
    Json(LockerListResponse {
        lockers: session
            .state()
            .lockers
            .all()
            .iter()
            .map(LockerResponse::from)
            .collect(),
    })
}

/// Other swappers in the community
#[utoipa::path(
    get,
    path = "/api/v1/community",
    tag = "profile",
    responses(
        (status = 200, description = "Community members", body = CommunityResponse)
    )
)]
pub async fn list_community() -> Json<CommunityResponse> {
    Json(CommunityResponse {
        members: community_members()
            .into_iter()
            .map(CommunityMemberResponse::from)
            .collect(),
    })
}
