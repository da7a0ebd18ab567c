//! Client configuration.
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `PROMPTDECK_URL` | `http://localhost:3000` | API base URL |
//! | `PROMPTDECK_TOKEN` | unset | bearer token for token-mode servers |
//! | `PROMPTDECK_USER` | unset | identity sent in `x-user-id` for header-mode servers |
//! | `PROMPTDECK_TIMEOUT_SECS` | `30` | per-request timeout |

use promptdeck_core::{defaults, Error, Result};

/// Connection settings for [`crate::PromptClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub token: Option<String>,
    pub user: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::CLIENT_BASE_URL.to_string(),
            token: None,
            user: None,
            timeout_secs: defaults::CLIENT_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let base_url = non_blank("PROMPTDECK_URL")
            .unwrap_or_else(|| defaults::CLIENT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let timeout_secs = match non_blank("PROMPTDECK_TIMEOUT_SECS") {
            Some(v) => v.parse().map_err(|_| {
                Error::Config(format!("PROMPTDECK_TIMEOUT_SECS has invalid value '{}'", v))
            })?,
            None => defaults::CLIENT_TIMEOUT_SECS,
        };
        if timeout_secs == 0 {
            return Err(Error::Config(
                "PROMPTDECK_TIMEOUT_SECS must be non-zero".to_string(),
            ));
        }

        Ok(Self {
            base_url,
            token: non_blank("PROMPTDECK_TOKEN"),
            user: non_blank("PROMPTDECK_USER"),
            timeout_secs,
        })
    }
}
