//! Tag HTTP handlers.
//!
//! Storage failures on these routes are logged in full and answered with a
//! fixed message.

use axum::{extract::State, http::StatusCode, Json};
use tracing::error;

use promptdeck_core::{CreateTagRequest, TagEntry};

use crate::auth::RequireUser;
use crate::{ApiError, AppState, JsonBody};

/// Distinct tags used on the caller's prompts, sorted.
#[utoipa::path(
    get,
    path = "/api/tags",
    tag = "Tags",
    responses(
        (status = 200, description = "Sorted distinct tags", body = Vec<String>),
        (status = 401, description = "No user identity"),
        (status = 500, description = "Storage failure")
    )
)]
pub async fn list_tags(
    State(state): State<AppState>,
    user: RequireUser,
) -> Result<Json<Vec<String>>, ApiError> {
    let tags = state.tags.distinct_tags(&user.owner).await.map_err(|e| {
        error!(subsystem = "api", component = "tags", op = "list", error = %e, "Error fetching tags");
        ApiError::Internal("Failed to fetch tags".to_string())
    })?;
    Ok(Json(tags))
}

/// Add a standalone tag catalog entry.
#[utoipa::path(
    post,
    path = "/api/tags",
    tag = "Tags",
    request_body = CreateTagRequest,
    responses(
        (status = 201, description = "Catalog entry created", body = TagEntry),
        (status = 400, description = "Malformed request body"),
        (status = 401, description = "No user identity"),
        (status = 500, description = "Storage failure")
    )
)]
pub async fn create_tag(
    State(state): State<AppState>,
    _user: RequireUser,
    JsonBody(body): JsonBody<CreateTagRequest>,
) -> Result<(StatusCode, Json<TagEntry>), ApiError> {
    let entry = state.tags.create(&body.name).await.map_err(|e| {
        error!(subsystem = "api", component = "tags", op = "create", error = %e, "Error creating tag");
        ApiError::Internal("Failed to create tag".to_string())
    })?;
    Ok((StatusCode::CREATED, Json(entry)))
}
