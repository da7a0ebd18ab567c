//! Core data models for promptdeck.
//!
//! These types are shared across all promptdeck crates and represent the
//! domain entities exchanged between storage, the HTTP API and clients.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::defaults;
use crate::error::{Error, Result};
use crate::pagination::PaginationMeta;
use crate::tags::normalize_tag_string;

// =============================================================================
// IDENTITY
// =============================================================================

/// Verified identity of the user a request acts for.
///
/// Every read and write on prompt records is scoped to an `OwnerId`; the only
/// way to get one is through [`OwnerId::new`], which rejects blank identities
/// so an absent user can never reach the store as an empty filter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct OwnerId(String);

impl OwnerId {
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(Error::Unauthorized("Authentication required".to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// PROMPT TYPES
// =============================================================================

/// A user-owned prompt record.
///
/// `tags` is the stored comma-separated tag string, not a normalized set; use
/// [`Prompt::tag_list`] to get the individual tokens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Prompt {
    pub id: Uuid,
    pub user_id: String,
    pub title: String,
    pub content: String,
    pub tags: String,
    pub cover_img: Option<String>,
    pub version: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Prompt {
    /// Tag tokens of this prompt (split on `,`, trimmed, blanks dropped).
    pub fn tag_list(&self) -> Vec<String> {
        crate::tags::split_tags(&self.tags)
    }

    /// Version, falling back to the default for prompts stored without one.
    pub fn version_or_default(&self) -> &str {
        self.version
            .as_deref()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults::PROMPT_VERSION)
    }
}

/// Tags as accepted on input: either the stored comma-separated form or a list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(untagged)]
pub enum TagsInput {
    Joined(String),
    List(Vec<String>),
}

impl TagsInput {
    /// Canonical stored tag string: trimmed tokens, no blanks, no duplicates.
    pub fn normalized(&self) -> String {
        match self {
            TagsInput::Joined(raw) => normalize_tag_string(raw),
            TagsInput::List(items) => {
                let joined = items.join(",");
                normalize_tag_string(&joined)
            }
        }
    }
}

impl Default for TagsInput {
    fn default() -> Self {
        TagsInput::Joined(String::new())
    }
}

/// Request for creating a prompt.
///
/// A `user_id` in the body is accepted so existing clients keep working, but
/// it is never trusted: the store always writes the authenticated owner.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CreatePromptRequest {
    pub title: String,
    pub content: String,
    #[serde(default, deserialize_with = "nullable_tags")]
    pub tags: TagsInput,
    #[serde(default)]
    pub cover_img: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

fn nullable_tags<'de, D>(deserializer: D) -> std::result::Result<TagsInput, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<TagsInput>::deserialize(deserializer)?.unwrap_or_default())
}

/// Filter and page parameters for listing prompts.
#[derive(Debug, Clone, PartialEq)]
pub struct ListPromptsRequest {
    /// Match prompts carrying any of these tags.
    pub tags: Vec<String>,
    /// Case-insensitive substring matched against title and content.
    pub search: Option<String>,
    /// 1-based page number.
    pub page: i64,
    /// Page size.
    pub limit: i64,
}

impl Default for ListPromptsRequest {
    fn default() -> Self {
        Self {
            tags: Vec::new(),
            search: None,
            page: defaults::PAGE,
            limit: defaults::PAGE_LIMIT,
        }
    }
}

impl ListPromptsRequest {
    /// Validate page and limit bounds.
    pub fn validate(&self) -> Result<()> {
        if self.page < 1 {
            return Err(Error::InvalidInput("page must be >= 1".to_string()));
        }
        if self.limit < 1 {
            return Err(Error::InvalidInput("limit must be >= 1".to_string()));
        }
        if self.limit > defaults::PAGE_LIMIT_MAX {
            return Err(Error::InvalidInput(format!(
                "limit must be <= {}",
                defaults::PAGE_LIMIT_MAX
            )));
        }
        Ok(())
    }

    /// Rows skipped before the requested page.
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }

    /// Requested tags with surrounding whitespace removed and blanks dropped.
    pub fn effective_tags(&self) -> Vec<String> {
        self.tags
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect()
    }

    /// Trimmed search term, `None` when blank.
    pub fn effective_search(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// One page of prompts plus the count of all matches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListPromptsResponse {
    pub prompts: Vec<Prompt>,
    pub total: i64,
}

/// One page of prompts with its pagination metadata, as served over HTTP.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct PromptPage {
    pub data: Vec<Prompt>,
    pub pagination: PaginationMeta,
}

impl PromptPage {
    /// Wrap a store result for the requested page and page size.
    pub fn new(result: ListPromptsResponse, page: i64, per_page: i64) -> Self {
        Self {
            pagination: PaginationMeta::new(page, per_page, result.total),
            data: result.prompts,
        }
    }
}

// =============================================================================
// TAG CATALOG TYPES
// =============================================================================

/// A standalone tag catalog row.
///
/// The catalog is not linked to the tag strings stored on prompts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct TagEntry {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Request for creating a tag catalog entry.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CreateTagRequest {
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_prompt() -> Prompt {
        Prompt {
            id: Uuid::nil(),
            user_id: "user_1".to_string(),
            title: "Summarize".to_string(),
            content: "Summarize the following text".to_string(),
            tags: "ai, writing,,summary".to_string(),
            cover_img: None,
            version: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_owner_id_rejects_blank() {
        assert!(matches!(OwnerId::new(""), Err(Error::Unauthorized(_))));
        assert!(matches!(OwnerId::new("   "), Err(Error::Unauthorized(_))));
    }

    #[test]
    fn test_owner_id_trims() {
        let owner = OwnerId::new("  user_2abc ").unwrap();
        assert_eq!(owner.as_str(), "user_2abc");
        assert_eq!(owner.to_string(), "user_2abc");
    }

    #[test]
    fn test_prompt_tag_list() {
        assert_eq!(sample_prompt().tag_list(), vec!["ai", "writing", "summary"]);
    }

    #[test]
    fn test_version_defaults_when_absent() {
        let mut prompt = sample_prompt();
        assert_eq!(prompt.version_or_default(), "1.0");
        prompt.version = Some("".to_string());
        assert_eq!(prompt.version_or_default(), "1.0");
        prompt.version = Some("2.1".to_string());
        assert_eq!(prompt.version_or_default(), "2.1");
    }

    #[test]
    fn test_create_request_accepts_string_tags() {
        let req: CreatePromptRequest = serde_json::from_value(json!({
            "title": "t",
            "content": "c",
            "tags": " ai ,writing, ai"
        }))
        .unwrap();
        assert_eq!(req.tags.normalized(), "ai,writing");
    }

    #[test]
    fn test_create_request_accepts_list_tags() {
        let req: CreatePromptRequest = serde_json::from_value(json!({
            "title": "t",
            "content": "c",
            "tags": ["ai", " coding ", ""]
        }))
        .unwrap();
        assert_eq!(req.tags.normalized(), "ai,coding");
    }

    #[test]
    fn test_create_request_tags_optional_or_null() {
        let missing: CreatePromptRequest =
            serde_json::from_value(json!({"title": "t", "content": "c"})).unwrap();
        assert_eq!(missing.tags.normalized(), "");

        let null: CreatePromptRequest =
            serde_json::from_value(json!({"title": "t", "content": "c", "tags": null})).unwrap();
        assert_eq!(null.tags.normalized(), "");
    }

    #[test]
    fn test_create_request_keeps_supplied_user_id() {
        let req: CreatePromptRequest = serde_json::from_value(json!({
            "title": "t",
            "content": "c",
            "user_id": "someone_else"
        }))
        .unwrap();
        assert_eq!(req.user_id.as_deref(), Some("someone_else"));
    }

    #[test]
    fn test_list_request_defaults() {
        let req = ListPromptsRequest::default();
        assert_eq!(req.page, 1);
        assert_eq!(req.limit, 12);
        assert_eq!(req.offset(), 0);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_list_request_offset() {
        let req = ListPromptsRequest {
            page: 3,
            limit: 12,
            ..Default::default()
        };
        assert_eq!(req.offset(), 24);
    }

    #[test]
    fn test_list_request_validate_bounds() {
        let zero_page = ListPromptsRequest {
            page: 0,
            ..Default::default()
        };
        assert!(matches!(zero_page.validate(), Err(Error::InvalidInput(_))));

        let zero_limit = ListPromptsRequest {
            limit: 0,
            ..Default::default()
        };
        assert!(matches!(zero_limit.validate(), Err(Error::InvalidInput(_))));

        let huge_limit = ListPromptsRequest {
            limit: 101,
            ..Default::default()
        };
        assert!(matches!(huge_limit.validate(), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_prompt_page_wraps_store_result() {
        let page = PromptPage::new(
            ListPromptsResponse {
                prompts: vec![sample_prompt()],
                total: 25,
            },
            3,
            12,
        );
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.pagination.total_pages, 3);
        assert!(page.pagination.has_prev);
        assert!(!page.pagination.has_next);
    }

    #[test]
    fn test_list_request_effective_filters() {
        let req = ListPromptsRequest {
            tags: vec![" ai ".to_string(), "".to_string(), "  ".to_string()],
            search: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(req.effective_tags(), vec!["ai"]);
        assert_eq!(req.effective_search(), None);

        let req = ListPromptsRequest {
            search: Some(" draft ".to_string()),
            ..Default::default()
        };
        assert_eq!(req.effective_search(), Some("draft"));
    }
}
