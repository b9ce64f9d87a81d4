//! # REST API
//!
//! Handlers stay thin: lock the session, hand it a UI event, and map the
//! reply onto a response body. A failed event becomes an [`ApiError`] that
//! still carries the notice the user would have seen.

pub mod blobs;
pub mod checkout;
pub mod config;
pub mod items;
pub mod profile;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use switchd_core::session::{EventData, EventReply, Notice, NoticeLevel};
use switchd_core::SwapError;
use utoipa::ToSchema;

pub type ApiResult<T> = Result<Json<T>, ApiError>;

/// Message for the user, as shown by the web client
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct NoticeResponse {
    /// success, info, warning or error
    pub level: String,
    pub message: String,
}

impl From<Notice> for NoticeResponse {
    fn from(notice: Notice) -> Self {
        let level = match notice.level {
            NoticeLevel::Success => "success",
            NoticeLevel::Info => "info",
            NoticeLevel::Warning => "warning",
            NoticeLevel::Error => "error",
        };
        Self {
            level: level.to_string(),
            message: notice.message,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Machine-readable error kind, e.g. `not_found`
    pub kind: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<NoticeResponse>,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorResponse,
}

impl ApiError {
    pub fn new(err: &SwapError, notice: Option<Notice>) -> Self {
        Self {
            status: status_for(err),
            body: ErrorResponse {
                kind: err.kind().to_string(),
                message: err.to_string(),
                notice: notice.map(NoticeResponse::from),
            },
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<SwapError> for ApiError {
    fn from(err: SwapError) -> Self {
        Self::new(&err, None)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body)).into_response()
    }
}

pub fn status_for(err: &SwapError) -> StatusCode {
    match err {
        SwapError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        SwapError::NotFound(_) => StatusCode::NOT_FOUND,
        SwapError::InsufficientCredits { .. } => StatusCode::PAYMENT_REQUIRED,
        SwapError::Service(_) => StatusCode::BAD_GATEWAY,
        SwapError::Config(_) | SwapError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Split an event reply into its notice and payload, or the error it failed with
pub fn unpack(reply: EventReply) -> Result<(Option<NoticeResponse>, EventData), ApiError> {
    if let Some(err) = reply.failure() {
        return Err(ApiError::new(err, reply.notice.clone()));
    }
    let notice = reply.notice.map(NoticeResponse::from);
    match reply.data {
        Some(data) => Ok((notice, data)),
        None => Err(SwapError::Config("event produced no data".to_string()).into()),
    }
}

/// The session answered with a payload the handler did not ask for
pub fn unexpected(data: &EventData) -> ApiError {
    tracing::error!(?data, "Unexpected event payload");
    SwapError::Config("unexpected event payload".to_string()).into()
}
