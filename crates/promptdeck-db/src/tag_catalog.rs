//! Tag catalog repository implementation.
//!
//! Distinct tags are derived from the owner's prompt tag strings; the
//! standalone `tag_catalog` table only receives explicit inserts.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres, Row};
use tracing::{debug, info};
use uuid::Uuid;

use promptdeck_core::{collect_distinct_tags, Error, OwnerId, Result, TagCatalogRepository, TagEntry};

/// PostgreSQL implementation of TagCatalogRepository.
#[derive(Clone)]
pub struct PgTagCatalogRepository {
    pool: Pool<Postgres>,
}

impl PgTagCatalogRepository {
    /// Create a new PgTagCatalogRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TagCatalogRepository for PgTagCatalogRepository {
    async fn distinct_tags(&self, owner: &OwnerId) -> Result<Vec<String>> {
        let raw: Vec<String> = sqlx::query_scalar("SELECT tags FROM prompt WHERE user_id = $1")
            .bind(owner.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;

        let tags = collect_distinct_tags(raw.iter().map(String::as_str));

        debug!(
            subsystem = "database",
            component = "tag_catalog",
            op = "distinct_tags",
            owner_id = %owner,
            prompt_count = raw.len(),
            result_count = tags.len(),
            "Collected distinct tags"
        );

        Ok(tags)
    }

    async fn create(&self, name: &str) -> Result<TagEntry> {
        let row = sqlx::query(
            "INSERT INTO tag_catalog (id, name, created_at) VALUES ($1, $2, $3)
             RETURNING id, name, created_at",
        )
        .bind(Uuid::now_v7())
        .bind(name)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        let entry = TagEntry {
            id: row.try_get("id").map_err(Error::Database)?,
            name: row.try_get("name").map_err(Error::Database)?,
            created_at: row.try_get("created_at").map_err(Error::Database)?,
        };

        info!(
            subsystem = "database",
            component = "tag_catalog",
            op = "create",
            tag_id = %entry.id,
            "Tag catalog entry created"
        );

        Ok(entry)
    }
}
