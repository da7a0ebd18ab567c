//! # promptdeck-api
//!
//! HTTP API for promptdeck: owner-scoped prompt listing and creation plus the
//! tag catalog, served with axum.
//!
//! | Route | Handler |
//! |-------|---------|
//! | `GET /api/prompts` | filtered, paginated list of the caller's prompts |
//! | `POST /api/prompts` | create a prompt owned by the caller |
//! | `GET /api/tags` | distinct tags on the caller's prompts |
//! | `POST /api/tags` | add a tag catalog entry |
//! | `GET /health` | liveness |
//! | `GET /openapi.json` | OpenAPI document |

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod query_types;

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::{header, HeaderValue, Method, Request},
    response::IntoResponse,
    routing::get,
    Router,
};
use governor::{Quota, RateLimiter};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use uuid::Uuid;

use promptdeck_core::{defaults, Error, PromptRepository, Result, TagCatalogRepository};

pub use auth::{IdentityResolver, RequireUser, StaticTokenResolver, TrustedHeaderResolver};
pub use config::{ApiConfig, AuthMode};
pub use error::ApiError;
pub use extract::JsonBody;

// =============================================================================
// REQUEST ID (UUIDv7)
// =============================================================================

/// Generates time-ordered UUIDv7 request correlation IDs.
#[derive(Clone, Default)]
pub struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

// =============================================================================
// STATE
// =============================================================================

pub type GlobalRateLimiter = RateLimiter<
    governor::state::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub prompts: Arc<dyn PromptRepository>,
    pub tags: Arc<dyn TagCatalogRepository>,
    pub identity: Arc<dyn IdentityResolver>,
    /// Global rate limiter (None if rate limiting is disabled).
    pub rate_limiter: Option<Arc<GlobalRateLimiter>>,
}

impl AppState {
    pub fn new(
        prompts: Arc<dyn PromptRepository>,
        tags: Arc<dyn TagCatalogRepository>,
        identity: Arc<dyn IdentityResolver>,
    ) -> Self {
        Self {
            prompts,
            tags,
            identity,
            rate_limiter: None,
        }
    }

    pub fn with_rate_limiter(mut self, limiter: Option<Arc<GlobalRateLimiter>>) -> Self {
        self.rate_limiter = limiter;
        self
    }
}

/// Build a global limiter allowing `requests` per `period_secs`, bursting up to `requests`.
pub fn build_rate_limiter(requests: u64, period_secs: u64) -> Result<Arc<GlobalRateLimiter>> {
    let burst = u32::try_from(requests)
        .ok()
        .and_then(NonZeroU32::new)
        .ok_or_else(|| Error::Config("RATE_LIMIT_REQUESTS must be between 1 and u32::MAX".into()))?;
    let quota = Quota::with_period(Duration::from_secs(period_secs) / burst.get())
        .ok_or_else(|| Error::Config("RATE_LIMIT_PERIOD_SECS must be non-zero".into()))?
        .allow_burst(burst);
    Ok(Arc::new(RateLimiter::direct(quota)))
}

// =============================================================================
// OPENAPI
// =============================================================================

#[derive(OpenApi)]
#[openapi(
    info(
        title = "promptdeck API",
        description = "Store, tag, search and paginate prompts"
    ),
    paths(
        handlers::prompts::list_prompts,
        handlers::prompts::create_prompt,
        handlers::tags::list_tags,
        handlers::tags::create_tag,
    ),
    components(schemas(
        promptdeck_core::Prompt,
        promptdeck_core::CreatePromptRequest,
        promptdeck_core::TagsInput,
        promptdeck_core::TagEntry,
        promptdeck_core::CreateTagRequest,
        promptdeck_core::PaginationMeta,
        promptdeck_core::PromptPage,
    )),
    tags(
        (name = "Prompts", description = "Prompt listing and creation"),
        (name = "Tags", description = "Tag catalog")
    )
)]
pub struct ApiDoc;

// =============================================================================
// MIDDLEWARE
// =============================================================================

async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: axum::extract::Request,
    next: axum::middleware::Next,
) -> std::result::Result<impl IntoResponse, ApiError> {
    if let Some(limiter) = &state.rate_limiter {
        if limiter.check().is_err() {
            tracing::warn!(subsystem = "api", component = "rate_limit", "Rate limit exceeded");
            return Err(ApiError::RateLimited);
        }
    }
    Ok(next.run(request).await)
}

fn cors_layer(allowed_origins: Vec<HeaderValue>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::HeaderName::from_static(defaults::AUTH_HEADER),
        ])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}

// =============================================================================
// ROUTER
// =============================================================================

/// Assemble the full application router.
pub fn build_router(state: AppState, allowed_origins: Vec<HeaderValue>) -> Router {
    Router::new()
        .route(
            "/api/prompts",
            get(handlers::prompts::list_prompts).post(handlers::prompts::create_prompt),
        )
        .route(
            "/api/tags",
            get(handlers::tags::list_tags).post(handlers::tags::create_tag),
        )
        .route("/health", get(handlers::system::health_check))
        .route("/openapi.json", get(handlers::system::openapi_json))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .layer(TraceLayer::new_for_http().make_span_with(request_span::<axum::body::Body>))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer(cors_layer(allowed_origins))
        .layer(RequestBodyLimitLayer::new(defaults::BODY_LIMIT_BYTES))
        .with_state(state)
}

/// Root span for one request. Handlers fill in the owner and prompt fields.
fn request_span<B>(request: &Request<B>) -> tracing::Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    tracing::info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %request_id,
        owner_id = tracing::field::Empty,
        prompt_id = tracing::field::Empty,
    )
}
