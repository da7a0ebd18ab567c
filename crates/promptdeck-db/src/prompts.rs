//! Prompt repository implementation.

use std::time::Instant;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{postgres::PgRow, Pool, Postgres, Row, Transaction};
use tracing::{debug, info};
use uuid::Uuid;

use promptdeck_core::{
    defaults, CreatePromptRequest, Error, ListPromptsRequest, ListPromptsResponse, OwnerId,
    Prompt, PromptRepository, Result,
};

use crate::prompt_filter::{bind_query_params, PromptFilterQueryBuilder, QueryParam};

const PROMPT_COLUMNS: &str =
    "p.id, p.user_id, p.title, p.content, p.tags, p.cover_img, p.version, p.created_at";

/// PostgreSQL implementation of PromptRepository.
#[derive(Clone)]
pub struct PgPromptRepository {
    pool: Pool<Postgres>,
}

impl PgPromptRepository {
    /// Create a new PgPromptRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List prompts within an existing transaction.
    ///
    /// The count and the page are read with the same predicate so `total`
    /// and `prompts` describe the same snapshot.
    pub async fn list_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        owner: &OwnerId,
        req: ListPromptsRequest,
    ) -> Result<ListPromptsResponse> {
        req.validate()?;
        let start = Instant::now();

        let (where_clause, mut params) = PromptFilterQueryBuilder::new(owner, &req).build();

        let count_query = format!("SELECT COUNT(*) FROM prompt p WHERE {}", where_clause);
        let total: i64 = {
            let q = sqlx::query_scalar(&count_query);
            let q = bind_query_params!(q, &params);
            q.fetch_one(&mut **tx).await.map_err(Error::Database)?
        };

        let limit_idx = params.len() + 1;
        let page_query = format!(
            "SELECT {} FROM prompt p WHERE {} ORDER BY p.created_at DESC, p.id DESC LIMIT ${} OFFSET ${}",
            PROMPT_COLUMNS,
            where_clause,
            limit_idx,
            limit_idx + 1
        );
        params.push(QueryParam::Int(req.limit));
        params.push(QueryParam::Int(req.offset()));

        let rows = {
            let q = sqlx::query(&page_query);
            let q = bind_query_params!(q, &params);
            q.fetch_all(&mut **tx).await.map_err(Error::Database)?
        };

        let prompts = rows
            .into_iter()
            .map(map_row_to_prompt)
            .collect::<Result<Vec<_>>>()?;

        debug!(
            subsystem = "database",
            component = "prompts",
            op = "list",
            owner_id = %owner,
            tag_count = req.effective_tags().len(),
            has_search = req.effective_search().is_some(),
            page = req.page,
            result_count = prompts.len(),
            total_count = total,
            duration_ms = start.elapsed().as_millis() as u64,
            "Listed prompts"
        );

        Ok(ListPromptsResponse { prompts, total })
    }

    /// Insert a prompt within an existing transaction.
    pub async fn insert_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        owner: &OwnerId,
        req: CreatePromptRequest,
    ) -> Result<Prompt> {
        let id = Uuid::now_v7();
        let now = Utc::now();
        let tags = req.tags.normalized();
        let version = req
            .version
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| defaults::PROMPT_VERSION.to_string());

        let row = sqlx::query(
            "INSERT INTO prompt (id, user_id, title, content, tags, cover_img, version, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING id, user_id, title, content, tags, cover_img, version, created_at",
        )
        .bind(id)
        .bind(owner.as_str())
        .bind(&req.title)
        .bind(&req.content)
        .bind(&tags)
        .bind(&req.cover_img)
        .bind(&version)
        .bind(now)
        .fetch_one(&mut **tx)
        .await
        .map_err(Error::Database)?;

        let prompt = map_row_to_prompt(row)?;

        info!(
            subsystem = "database",
            component = "prompts",
            op = "insert",
            owner_id = %owner,
            prompt_id = %prompt.id,
            "Prompt created"
        );

        Ok(prompt)
    }
}

#[async_trait]
impl PromptRepository for PgPromptRepository {
    async fn list(&self, owner: &OwnerId, req: ListPromptsRequest) -> Result<ListPromptsResponse> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;
        let result = self.list_tx(&mut tx, owner, req).await?;
        tx.commit().await.map_err(Error::Database)?;
        Ok(result)
    }

    async fn insert(&self, owner: &OwnerId, req: CreatePromptRequest) -> Result<Prompt> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;
        let prompt = self.insert_tx(&mut tx, owner, req).await?;
        tx.commit().await.map_err(Error::Database)?;
        Ok(prompt)
    }
}

fn map_row_to_prompt(row: PgRow) -> Result<Prompt> {
    Ok(Prompt {
        id: row.try_get("id").map_err(Error::Database)?,
        user_id: row.try_get("user_id").map_err(Error::Database)?,
        title: row.try_get("title").map_err(Error::Database)?,
        content: row.try_get("content").map_err(Error::Database)?,
        tags: row.try_get("tags").map_err(Error::Database)?,
        cover_img: row.try_get("cover_img").map_err(Error::Database)?,
        version: row.try_get("version").map_err(Error::Database)?,
        created_at: row.try_get("created_at").map_err(Error::Database)?,
    })
}
