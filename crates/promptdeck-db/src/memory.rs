//! In-memory storage backend.
//!
//! Implements the same repository traits as the PostgreSQL layer, with the
//! same owner scoping, filter semantics and ordering, so the HTTP layer can be
//! exercised without a database.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use promptdeck_core::{
    collect_distinct_tags, defaults, has_tag, CreatePromptRequest, Error, ListPromptsRequest,
    ListPromptsResponse, OwnerId, Prompt, PromptRepository, Result, TagCatalogRepository,
    TagEntry,
};

/// In-memory prompt and tag catalog store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    prompts: RwLock<Vec<Prompt>>,
    tag_catalog: RwLock<Vec<TagEntry>>,
    failure: RwLock<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a prompt exactly as given, bypassing normalization.
    pub async fn seed(&self, prompt: Prompt) {
        self.prompts.write().await.push(prompt);
    }

    /// Make every following call fail with a storage error, or clear it with `None`.
    pub async fn fail_with(&self, message: Option<&str>) {
        *self.failure.write().await = message.map(String::from);
    }

    /// Number of stored prompts across all owners.
    pub async fn prompt_count(&self) -> usize {
        self.prompts.read().await.len()
    }

    /// Snapshot of all tag catalog entries.
    pub async fn catalog_entries(&self) -> Vec<TagEntry> {
        self.tag_catalog.read().await.clone()
    }

    async fn check_failure(&self) -> Result<()> {
        match self.failure.read().await.as_ref() {
            Some(message) => Err(Error::Storage(message.clone())),
            None => Ok(()),
        }
    }
}

fn matches_filter(prompt: &Prompt, tags: &[String], search: Option<&str>) -> bool {
    if !tags.is_empty() && !tags.iter().any(|t| has_tag(&prompt.tags, t)) {
        return false;
    }
    if let Some(term) = search {
        let term = term.to_lowercase();
        if !prompt.title.to_lowercase().contains(&term)
            && !prompt.content.to_lowercase().contains(&term)
        {
            return false;
        }
    }
    true
}

#[async_trait]
impl PromptRepository for MemoryStore {
    async fn list(&self, owner: &OwnerId, req: ListPromptsRequest) -> Result<ListPromptsResponse> {
        self.check_failure().await?;
        req.validate()?;

        let tags = req.effective_tags();
        let search = req.effective_search();

        let mut matched: Vec<Prompt> = self
            .prompts
            .read()
            .await
            .iter()
            .filter(|p| p.user_id == owner.as_str())
            .filter(|p| matches_filter(p, &tags, search))
            .cloned()
            .collect();

        matched.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        let total = matched.len() as i64;
        let prompts = matched
            .into_iter()
            .skip(req.offset() as usize)
            .take(req.limit as usize)
            .collect();

        Ok(ListPromptsResponse { prompts, total })
    }

    async fn insert(&self, owner: &OwnerId, req: CreatePromptRequest) -> Result<Prompt> {
        self.check_failure().await?;

        let prompt = Prompt {
            id: Uuid::now_v7(),
            user_id: owner.as_str().to_string(),
            tags: req.tags.normalized(),
            title: req.title,
            content: req.content,
            cover_img: req.cover_img,
            version: Some(
                req.version
                    .filter(|v| !v.trim().is_empty())
                    .unwrap_or_else(|| defaults::PROMPT_VERSION.to_string()),
            ),
            created_at: Utc::now(),
        };

        self.prompts.write().await.push(prompt.clone());
        Ok(prompt)
    }
}

#[async_trait]
impl TagCatalogRepository for MemoryStore {
    async fn distinct_tags(&self, owner: &OwnerId) -> Result<Vec<String>> {
        self.check_failure().await?;

        let prompts = self.prompts.read().await;
        Ok(collect_distinct_tags(
            prompts
                .iter()
                .filter(|p| p.user_id == owner.as_str())
                .map(|p| p.tags.as_str()),
        ))
    }

    async fn create(&self, name: &str) -> Result<TagEntry> {
        self.check_failure().await?;

        let entry = TagEntry {
            id: Uuid::now_v7(),
            name: name.to_string(),
            created_at: Utc::now(),
        };
        self.tag_catalog.write().await.push(entry.clone());
        Ok(entry)
    }
}
