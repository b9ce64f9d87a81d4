//! # Blob API
//!
//! Image upload for new listings, and image download for display.

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use switchd_core::blob::BlobHandle;
use switchd_core::SwapError;
use utoipa::{IntoParams, ToSchema};

use super::{ApiError, ApiResult, ErrorResponse};
use crate::SharedState;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UploadQuery {
    /// Original file name; only its last path component is kept
    pub name: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BlobResponse {
    /// Pass this as `image_ref` when listing an item
    pub handle: String,
    pub size: usize,
}

pub fn blob_routes() -> Router<SharedState> {
    Router::new()
        .route("/", post(upload_blob))
        .route("/*handle", get(get_blob))
}

/// Upload an image
#[utoipa::path(
    post,
    path = "/api/v1/blobs",
    tag = "blobs",
    params(UploadQuery),
    request_body(content = String, content_type = "application/octet-stream", description = "Raw file bytes"),
    responses(
        (status = 200, description = "Stored", body = BlobResponse),
        (status = 422, description = "Empty upload", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn upload_blob(
    State(state): State<SharedState>,
    Query(query): Query<UploadQuery>,
    body: Bytes,
) -> ApiResult<BlobResponse> {
    if body.is_empty() {
        return Err(SwapError::validation("uploaded file is empty").into());
    }
    let size = body.len();
    let name = query.name.as_deref().unwrap_or("upload");
    let handle = state.blobs.store(body.to_vec(), name).await?;
    tracing::info!(handle = %handle, size, "Blob stored");

    Ok(Json(BlobResponse {
        handle: handle.as_str().to_string(),
        size,
    }))
}

/// Download a stored image
#[utoipa::path(
    get,
    path = "/api/v1/blobs/{handle}",
    tag = "blobs",
    params(("handle" = String, Path, description = "Handle returned by the upload")),
    responses(
        (status = 200, description = "File bytes", content_type = "application/octet-stream", body = String),
        (status = 404, description = "No such blob", body = ErrorResponse)
    )
)]
pub async fn get_blob(
    State(state): State<SharedState>,
    Path(handle): Path<String>,
) -> Result<Response, ApiError> {
    let handle = BlobHandle::new(handle);
    let bytes = state.blobs.resolve(&handle).await?;
    let mime = mime_guess::from_path(handle.as_str()).first_or_octet_stream();

    Ok(([(header::CONTENT_TYPE, mime.to_string())], bytes).into_response())
}
