//! Repository traits for promptdeck storage backends.
//!
//! The HTTP layer only talks to these traits, so the PostgreSQL
//! implementation and the in-memory store used in tests are interchangeable.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::*;

/// Repository for prompt records.
///
/// Every method takes the requesting [`OwnerId`]; implementations must scope
/// reads and writes to it.
#[async_trait]
pub trait PromptRepository: Send + Sync {
    /// List one page of the owner's prompts matching the filter, newest first,
    /// together with the total number of matches.
    async fn list(&self, owner: &OwnerId, req: ListPromptsRequest) -> Result<ListPromptsResponse>;

    /// Insert a prompt owned by `owner` and return the stored row.
    ///
    /// Any `user_id` carried by the request is ignored.
    async fn insert(&self, owner: &OwnerId, req: CreatePromptRequest) -> Result<Prompt>;
}

/// Repository for the tag catalog.
#[async_trait]
pub trait TagCatalogRepository: Send + Sync {
    /// Distinct tags used on the owner's prompts, sorted.
    async fn distinct_tags(&self, owner: &OwnerId) -> Result<Vec<String>>;

    /// Insert a standalone catalog entry.
    async fn create(&self, name: &str) -> Result<TagEntry>;
}
