//! Server configuration from environment variables.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `DATABASE_URL` | local development database |
//! | `HOST` / `PORT` | `0.0.0.0` / `3000` |
//! | `ALLOWED_ORIGINS` | `http://localhost:3000` (comma-separated) |
//! | `RATE_LIMIT_ENABLED` | `true` |
//! | `RATE_LIMIT_REQUESTS` / `RATE_LIMIT_PERIOD_SECS` | `100` / `60` |
//! | `AUTH_MODE` | `header` (`header` or `token`) |
//! | `AUTH_HEADER` | `x-user-id` |
//! | `AUTH_TOKENS` | required when `AUTH_MODE=token`: `token:user,...` |
//! | `DB_MAX_CONNECTIONS` | `10` |
//! | `DB_ACQUIRE_TIMEOUT_SECS` | `30` |

use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderValue;

use promptdeck_core::{defaults, Error, Result};
use promptdeck_db::pool::{DEFAULT_ACQUIRE_TIMEOUT_SECS, DEFAULT_MAX_CONNECTIONS};
use promptdeck_db::PoolConfig;

use crate::auth::{IdentityResolver, StaticTokenResolver, TrustedHeaderResolver};

/// How request identities are resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthMode {
    /// Trust a header set by an authenticating proxy.
    Header(String),
    /// Map bearer tokens to users from a static table.
    Token(String),
}

impl AuthMode {
    /// Build the resolver for this mode.
    pub fn resolver(&self) -> Result<Arc<dyn IdentityResolver>> {
        Ok(match self {
            AuthMode::Header(name) => Arc::new(TrustedHeaderResolver::new(name)?),
            AuthMode::Token(spec) => Arc::new(StaticTokenResolver::parse(spec)?),
        })
    }
}

/// Complete server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub allowed_origins: Vec<HeaderValue>,
    pub rate_limit_enabled: bool,
    pub rate_limit_requests: u64,
    pub rate_limit_period_secs: u64,
    pub auth: AuthMode,
    pub pool: PoolConfig,
}

impl ApiConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let auth = match var("AUTH_MODE", "header").trim() {
            "header" => AuthMode::Header(var("AUTH_HEADER", defaults::AUTH_HEADER)),
            "token" => AuthMode::Token(lookup("AUTH_TOKENS").ok_or_else(|| {
                Error::Config("AUTH_MODE=token requires AUTH_TOKENS".to_string())
            })?),
            other => {
                return Err(Error::Config(format!(
                    "unknown AUTH_MODE '{}', expected 'header' or 'token'",
                    other
                )))
            }
        };

        Ok(Self {
            database_url: var("DATABASE_URL", defaults::DATABASE_URL),
            host: var("HOST", defaults::SERVER_HOST),
            port: parse_or("PORT", lookup("PORT"), defaults::SERVER_PORT)?,
            allowed_origins: parse_allowed_origins(&var(
                "ALLOWED_ORIGINS",
                defaults::ALLOWED_ORIGINS,
            )),
            rate_limit_enabled: lookup("RATE_LIMIT_ENABLED")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(true),
            rate_limit_requests: parse_or(
                "RATE_LIMIT_REQUESTS",
                lookup("RATE_LIMIT_REQUESTS"),
                defaults::RATE_LIMIT_REQUESTS,
            )?,
            rate_limit_period_secs: parse_or(
                "RATE_LIMIT_PERIOD_SECS",
                lookup("RATE_LIMIT_PERIOD_SECS"),
                defaults::RATE_LIMIT_PERIOD_SECS,
            )?,
            auth,
            pool: PoolConfig::new(
                parse_or(
                    "DB_MAX_CONNECTIONS",
                    lookup("DB_MAX_CONNECTIONS"),
                    DEFAULT_MAX_CONNECTIONS,
                )?,
                Duration::from_secs(parse_or(
                    "DB_ACQUIRE_TIMEOUT_SECS",
                    lookup("DB_ACQUIRE_TIMEOUT_SECS"),
                    DEFAULT_ACQUIRE_TIMEOUT_SECS,
                )?),
            )?,
        })
    }

    /// `host:port` bind address.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, value: Option<String>, default: T) -> Result<T> {
    match value {
        Some(v) if !v.trim().is_empty() => v
            .trim()
            .parse()
            .map_err(|_| Error::Config(format!("{} has invalid value '{}'", key, v))),
        _ => Ok(default),
    }
}

/// Parse allowed CORS origins from a comma-separated list.
///
/// Invalid entries are logged and skipped. An empty list falls back to the
/// default origin.
pub fn parse_allowed_origins(origins: &str) -> Vec<HeaderValue> {
    let parsed: Vec<HeaderValue> = origins
        .split(',')
        .filter_map(|s| {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            match trimmed.parse::<HeaderValue>() {
                Ok(v) => Some(v),
                Err(e) => {
                    tracing::warn!("Invalid CORS origin '{}': {}", trimmed, e);
                    None
                }
            }
        })
        .collect();

    if parsed.is_empty() {
        return vec![HeaderValue::from_static(defaults::ALLOWED_ORIGINS)];
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ApiConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.bind_addr(), "0.0.0.0:3000");
        assert_eq!(config.auth, AuthMode::Header("x-user-id".to_string()));
        assert!(config.rate_limit_enabled);
        assert_eq!(config.rate_limit_requests, 100);
        assert_eq!(config.rate_limit_period_secs, 60);
        assert_eq!(config.pool, PoolConfig::default());
        assert_eq!(config.allowed_origins, vec!["http://localhost:3000"]);
    }

    #[test]
    fn test_overrides() {
        let config = ApiConfig::from_lookup(lookup(&[
            ("PORT", "8080"),
            ("HOST", "127.0.0.1"),
            ("RATE_LIMIT_ENABLED", "false"),
            ("AUTH_MODE", "token"),
            ("AUTH_TOKENS", "t1:alice"),
            ("DB_MAX_CONNECTIONS", "3"),
            ("DB_ACQUIRE_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();
        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
        assert!(!config.rate_limit_enabled);
        assert_eq!(config.auth, AuthMode::Token("t1:alice".to_string()));
        assert_eq!(config.pool.max_connections, 3);
        assert_eq!(config.pool.acquire_timeout, Duration::from_secs(5));
        assert!(config.auth.resolver().is_ok());
    }

    #[test]
    fn test_invalid_values_are_config_errors() {
        assert!(matches!(
            ApiConfig::from_lookup(lookup(&[("PORT", "eighty")])),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            ApiConfig::from_lookup(lookup(&[("AUTH_MODE", "token")])),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            ApiConfig::from_lookup(lookup(&[("AUTH_MODE", "oauth")])),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            ApiConfig::from_lookup(lookup(&[("DB_MAX_CONNECTIONS", "0")])),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_parse_allowed_origins() {
        let origins = parse_allowed_origins("https://a.example, ,https://b.example");
        assert_eq!(origins, vec!["https://a.example", "https://b.example"]);
        assert_eq!(parse_allowed_origins("  "), vec!["http://localhost:3000"]);
    }
}
