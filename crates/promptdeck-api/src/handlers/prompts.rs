//! Prompt HTTP handlers.

use axum::{
    extract::{RawQuery, State},
    http::StatusCode,
    Json,
};
use tracing::{debug, warn};

use promptdeck_core::{logging, CreatePromptRequest, Prompt, PromptPage};

use crate::auth::RequireUser;
use crate::query_types::parse_list_query;
use crate::{ApiError, AppState, JsonBody};

/// List the caller's prompts.
///
/// # Query Parameters
/// - `tags`: repeatable, comma-separated values allowed (`tag` is an alias)
/// - `search`: case-insensitive substring of title or content
/// - `page`, `limit`: 1-based page and page size (defaults 1 and 12, limit <= 100)
///
/// # Returns
/// - 200 OK with the page and pagination metadata
/// - 400 Bad Request for invalid page/limit
/// - 401 Unauthorized without a user identity
/// - 500 Internal Server Error if the store fails
#[utoipa::path(
    get,
    path = "/api/prompts",
    tag = "Prompts",
    params(
        ("tags" = Option<Vec<String>>, Query, description = "Tags to match (any)"),
        ("search" = Option<String>, Query, description = "Substring of title or content"),
        ("page" = Option<i64>, Query, description = "1-based page number"),
        ("limit" = Option<i64>, Query, description = "Page size, 1..=100")
    ),
    responses(
        (status = 200, description = "Page of prompts", body = PromptPage),
        (status = 400, description = "Invalid query parameters"),
        (status = 401, description = "No user identity"),
        (status = 500, description = "Storage failure")
    )
)]
pub async fn list_prompts(
    State(state): State<AppState>,
    user: RequireUser,
    RawQuery(raw): RawQuery,
) -> Result<Json<PromptPage>, ApiError> {
    let req = parse_list_query(raw.as_deref())?;
    let (page, limit) = (req.page, req.limit);

    let result = state.prompts.list(&user.owner, req).await.map_err(|e| {
        warn!(subsystem = "api", component = "prompts", op = "list", error = %e, "List failed");
        ApiError::from(e)
    })?;

    let page = PromptPage::new(result, page, limit);
    debug!(
        subsystem = "api",
        component = "prompts",
        op = "list",
        result_count = page.data.len(),
        total_count = page.pagination.total_count,
        total_pages = page.pagination.total_pages,
        "Prompt page served"
    );

    Ok(Json(page))
}

/// Create a prompt owned by the caller.
///
/// A `user_id` in the body is ignored.
///
/// # Returns
/// - 201 Created with the stored prompt
/// - 400 Bad Request when the body is not a valid prompt
/// - 401 Unauthorized without a user identity
/// - 500 Internal Server Error if the store fails
#[utoipa::path(
    post,
    path = "/api/prompts",
    tag = "Prompts",
    request_body = CreatePromptRequest,
    responses(
        (status = 201, description = "Prompt created", body = Prompt),
        (status = 400, description = "Malformed request body"),
        (status = 401, description = "No user identity"),
        (status = 500, description = "Storage failure")
    )
)]
pub async fn create_prompt(
    State(state): State<AppState>,
    user: RequireUser,
    JsonBody(body): JsonBody<CreatePromptRequest>,
) -> Result<(StatusCode, Json<Prompt>), ApiError> {
    if let Some(claimed) = body.user_id.as_deref() {
        if claimed != user.owner.as_str() {
            warn!(
                subsystem = "api",
                component = "prompts",
                op = "create",
                "Ignoring user_id in request body"
            );
        }
    }

    let prompt = state.prompts.insert(&user.owner, body).await.map_err(|e| {
        warn!(subsystem = "api", component = "prompts", op = "create", error = %e, "Create failed");
        ApiError::from(e)
    })?;

    tracing::Span::current().record(logging::PROMPT_ID, tracing::field::display(prompt.id));
    Ok((StatusCode::CREATED, Json(prompt)))
}
