//! # promptdeck-db
//!
//! PostgreSQL database layer for promptdeck.
//!
//! This crate provides:
//! - Connection pool management
//! - The filtered, paginated prompt list query builder
//! - Repository implementations for prompts and the tag catalog
//! - An in-memory store with the same filter semantics, for tests
//!
//! ## Example
//!
//! ```rust,ignore
//! use promptdeck_db::{Database, ListPromptsRequest, OwnerId, PromptRepository};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/promptdeck").await?;
//!     let owner = OwnerId::new("user_2abc")?;
//!
//!     let page = db.prompts.list(&owner, ListPromptsRequest {
//!         tags: vec!["ai".to_string()],
//!         ..Default::default()
//!     }).await?;
//!
//!     println!("{} matching prompts", page.total);
//!     Ok(())
//! }
//! ```
pub mod memory;
pub mod pool;
pub mod prompt_filter;
pub mod prompts;
pub mod tag_catalog;

// Test fixtures for integration tests
// Note: Always compiled so integration tests (in tests/) can use DEFAULT_TEST_DATABASE_URL
pub mod test_fixtures;

// Re-export core types
pub use promptdeck_core::*;

/// Escape LIKE/ILIKE wildcard characters (`%`, `_`, `\`) in user input.
pub fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

pub use memory::MemoryStore;
pub use pool::{create_pool, create_pool_with_config, log_pool_metrics, PoolConfig};
pub use prompt_filter::{PromptFilterQueryBuilder, QueryParam};
pub use prompts::PgPromptRepository;
pub use tag_catalog::PgTagCatalogRepository;

/// Combined database context with all repositories.
#[derive(Clone)]
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    /// Prompt repository (list/insert).
    pub prompts: PgPromptRepository,
    /// Tag catalog repository.
    pub tag_catalog: PgTagCatalogRepository,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            prompts: PgPromptRepository::new(pool.clone()),
            tag_catalog: PgTagCatalogRepository::new(pool.clone()),
            pool,
        }
    }

    /// Create a new Database instance by connecting to the given URL.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = create_pool(url).await?;
        Ok(Self::new(pool))
    }

    /// Create with custom pool configuration.
    pub async fn connect_with_config(url: &str, config: PoolConfig) -> Result<Self> {
        let pool = create_pool_with_config(url, config).await?;
        Ok(Self::new(pool))
    }

    /// Run pending migrations.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &sqlx::Pool<sqlx::Postgres> {
        &self.pool
    }
}
