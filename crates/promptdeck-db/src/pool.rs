//! PostgreSQL pool setup.
//!
//! The server sizes the pool from `DB_MAX_CONNECTIONS` and bounds how long a
//! request waits for a connection with `DB_ACQUIRE_TIMEOUT_SECS`.

use std::time::{Duration, Instant};

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::{debug, info, warn};

use promptdeck_core::{Error, Result};

pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

pub const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 30;

/// Pool sizing for one process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    pub max_connections: u32,
    /// Longest a caller waits for a free connection before the query fails.
    pub acquire_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: DEFAULT_MAX_CONNECTIONS,
            acquire_timeout: Duration::from_secs(DEFAULT_ACQUIRE_TIMEOUT_SECS),
        }
    }
}

impl PoolConfig {
    pub fn new(max_connections: u32, acquire_timeout: Duration) -> Result<Self> {
        if max_connections == 0 {
            return Err(Error::Config(
                "DB_MAX_CONNECTIONS must be at least 1".to_string(),
            ));
        }
        if acquire_timeout.is_zero() {
            return Err(Error::Config(
                "DB_ACQUIRE_TIMEOUT_SECS must be non-zero".to_string(),
            ));
        }
        Ok(Self {
            max_connections,
            acquire_timeout,
        })
    }
}

pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    create_pool_with_config(database_url, PoolConfig::default()).await
}

pub async fn create_pool_with_config(database_url: &str, config: PoolConfig) -> Result<PgPool> {
    let start = Instant::now();

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect(database_url)
        .await
        .map_err(Error::Database)?;

    info!(
        subsystem = "database",
        component = "pool",
        op = "connect",
        max_connections = config.max_connections,
        acquire_timeout_secs = config.acquire_timeout.as_secs(),
        pool_size = pool.size(),
        duration_ms = start.elapsed().as_millis() as u64,
        "Connected to PostgreSQL"
    );
    Ok(pool)
}

/// Log pool occupancy, warning when every connection is checked out.
pub fn log_pool_metrics(pool: &PgPool) {
    let size = pool.size();
    let idle = pool.num_idle();

    if size > 0 && idle == 0 {
        warn!(
            subsystem = "database",
            component = "pool",
            pool_size = size,
            "All pooled connections in use"
        );
    } else {
        debug!(
            subsystem = "database",
            component = "pool",
            pool_size = size,
            pool_idle = idle,
            "Pool occupancy"
        );
    }
}
