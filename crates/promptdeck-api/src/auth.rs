//! Request identity resolution.
//!
//! The server never authenticates users itself. An [`IdentityResolver`] turns
//! request headers into an opaque user id, and the [`RequireUser`] extractor
//! rejects the request with 401 before any handler logic runs when none is
//! found.

use std::collections::HashMap;

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap, HeaderName},
};
use tracing::warn;

use promptdeck_core::{logging, Error, OwnerId, Result};

use crate::{ApiError, AppState};

/// Resolves the user identity a request acts for.
pub trait IdentityResolver: Send + Sync {
    /// The raw user id, or `None` when the request carries no identity.
    fn resolve(&self, headers: &HeaderMap) -> Option<String>;
}

/// Trusts a header set by an authenticating reverse proxy.
#[derive(Debug, Clone)]
pub struct TrustedHeaderResolver {
    header: HeaderName,
}

impl TrustedHeaderResolver {
    pub fn new(header: &str) -> Result<Self> {
        let header = HeaderName::from_bytes(header.trim().as_bytes())
            .map_err(|e| Error::Config(format!("invalid identity header '{}': {}", header, e)))?;
        Ok(Self { header })
    }
}

impl IdentityResolver for TrustedHeaderResolver {
    fn resolve(&self, headers: &HeaderMap) -> Option<String> {
        headers
            .get(&self.header)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}

/// Maps static bearer tokens to user ids.
#[derive(Debug, Clone, Default)]
pub struct StaticTokenResolver {
    tokens: HashMap<String, String>,
}

impl StaticTokenResolver {
    pub fn new(tokens: HashMap<String, String>) -> Self {
        Self { tokens }
    }

    /// Parse `token:user,token:user` pairs.
    pub fn parse(spec: &str) -> Result<Self> {
        let mut tokens = HashMap::new();
        for pair in spec.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (token, user) = pair
                .split_once(':')
                .map(|(t, u)| (t.trim(), u.trim()))
                .filter(|(t, u)| !t.is_empty() && !u.is_empty())
                .ok_or_else(|| {
                    Error::Config(format!(
                        "invalid auth token entry '{}', expected token:user",
                        pair
                    ))
                })?;
            tokens.insert(token.to_string(), user.to_string());
        }
        if tokens.is_empty() {
            return Err(Error::Config(
                "token auth mode requires at least one token:user entry".to_string(),
            ));
        }
        Ok(Self { tokens })
    }
}

impl IdentityResolver for StaticTokenResolver {
    fn resolve(&self, headers: &HeaderMap) -> Option<String> {
        let token = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))?
            .trim();
        self.tokens.get(token).cloned()
    }
}

/// Extractor that requires a resolved user identity.
#[derive(Debug, Clone)]
pub struct RequireUser {
    pub owner: OwnerId,
}

#[axum::async_trait]
impl FromRequestParts<AppState> for RequireUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> std::result::Result<Self, Self::Rejection> {
        let resolved = state.identity.resolve(&parts.headers);

        let owner = match resolved.map(OwnerId::new) {
            Some(Ok(owner)) => owner,
            _ => {
                warn!(
                    subsystem = "api",
                    component = "auth",
                    path = %parts.uri.path(),
                    "Request rejected: no user identity"
                );
                return Err(ApiError::Unauthorized(
                    "Authentication required".to_string(),
                ));
            }
        };

        tracing::Span::current().record(logging::OWNER_ID, owner.as_str());
        Ok(RequireUser { owner })
    }
}
