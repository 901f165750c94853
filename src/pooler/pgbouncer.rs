//! PgBouncer admin console client.

use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{PgPool, Row};
use std::time::Duration;

use crate::config::PoolerConfig;
use crate::pooler::{Pooler, PoolerError};

/// Client for the PgBouncer admin console (the virtual `pgbouncer`
/// database).
///
/// The console only understands the simple query protocol, so
/// prepared-statement caching is disabled and every command goes through
/// `raw_sql`.
pub struct PgBouncerAdmin {
    pool: PgPool,
}

impl PgBouncerAdmin {
    /// Build a lazily-connected admin client. The first command opens the
    /// connection, so a pooler that is down at startup surfaces through
    /// the health check instead of aborting boot.
    pub fn new(config: &PoolerConfig) -> Self {
        let mut options = PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .database(&config.database)
            .statement_cache_capacity(0);

        if !config.password.is_empty() {
            options = options.password(&config.password);
        }

        let pool = PgPoolOptions::new()
            .max_connections(2)
            .acquire_timeout(Duration::from_millis(config.connect_timeout_ms))
            .connect_lazy_with(options);

        Self { pool }
    }

    async fn execute(&self, command: &str) -> Result<(), PoolerError> {
        sqlx::raw_sql(command)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }
}

#[async_trait]
impl Pooler for PgBouncerAdmin {
    async fn pause(&self) -> Result<(), PoolerError> {
        self.execute("PAUSE").await
    }

    async fn resume(&self) -> Result<(), PoolerError> {
        self.execute("RESUME").await
    }

    async fn show_databases(&self) -> Result<Vec<String>, PoolerError> {
        let rows = sqlx::raw_sql("SHOW DATABASES")
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        rows.iter()
            .map(|row| row.try_get::<String, _>("name").map_err(map_sqlx_error))
            .collect()
    }
}

fn map_sqlx_error(error: sqlx::Error) -> PoolerError {
    match error {
        sqlx::Error::Io(_) | sqlx::Error::Tls(_) | sqlx::Error::PoolTimedOut => {
            PoolerError::Connection(error.to_string())
        }
        _ => PoolerError::Command(error.to_string()),
    }
}
