//! Typed HTTP client for the promptdeck API.

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};
use tracing::debug;

use promptdeck_core::{
    defaults, CreatePromptRequest, CreateTagRequest, Error, ListPromptsRequest, Prompt,
    PromptPage, Result, TagEntry,
};

use crate::config::ClientConfig;

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Client for the prompt and tag routes.
#[derive(Debug, Clone)]
pub struct PromptClient {
    client: Client,
    base_url: String,
    token: Option<String>,
    user: Option<String>,
}

impl PromptClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token,
            user: config.user,
        })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch one filtered page of the caller's prompts.
    ///
    /// Every selected tag is sent as its own `tags` parameter.
    pub async fn list_prompts(&self, request: &ListPromptsRequest) -> Result<PromptPage> {
        let mut query: Vec<(&str, String)> = request
            .effective_tags()
            .into_iter()
            .map(|tag| ("tags", tag))
            .collect();
        if let Some(search) = request.effective_search() {
            query.push(("search", search.to_string()));
        }
        query.push(("page", request.page.to_string()));
        query.push(("limit", request.limit.to_string()));

        debug!(
            subsystem = "client",
            component = "prompts",
            op = "list",
            page = request.page,
            limit = request.limit,
            tag_count = request.tags.len(),
            "Fetching prompt page"
        );

        let response = self
            .request(Method::GET, "/api/prompts")
            .query(&query)
            .send()
            .await?;
        parse_json(response).await
    }

    pub async fn create_prompt(&self, request: &CreatePromptRequest) -> Result<Prompt> {
        let response = self
            .request(Method::POST, "/api/prompts")
            .json(request)
            .send()
            .await?;
        parse_json(response).await
    }

    /// Distinct tags across the caller's prompts, sorted.
    pub async fn list_tags(&self) -> Result<Vec<String>> {
        let response = self.request(Method::GET, "/api/tags").send().await?;
        parse_json(response).await
    }

    pub async fn create_tag(&self, name: &str) -> Result<TagEntry> {
        let response = self
            .request(Method::POST, "/api/tags")
            .json(&CreateTagRequest {
                name: name.to_string(),
            })
            .send()
            .await?;
        parse_json(response).await
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut builder = self
            .client
            .request(method, format!("{}{}", self.base_url, path));
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }
        if let Some(user) = &self.user {
            builder = builder.header(defaults::AUTH_HEADER, user);
        }
        builder
    }
}

async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|b| b.error)
            .unwrap_or(body);
        return Err(status_error(status, message));
    }

    response
        .json()
        .await
        .map_err(|e| Error::Serialization(format!("Failed to parse response: {}", e)))
}

fn status_error(status: StatusCode, message: String) -> Error {
    match status {
        StatusCode::UNAUTHORIZED => Error::Unauthorized(message),
        StatusCode::BAD_REQUEST => Error::InvalidInput(message),
        _ => Error::Request(format!("API returned {}: {}", status, message)),
    }
}
