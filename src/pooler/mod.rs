//! Connection pooler control operations.
//!
//! # Responsibilities
//! - Expose the pooler admin operations the coordinator drives: pause,
//!   resume, and a liveness probe
//! - Keep the pooler's wire protocol behind a trait so tests can
//!   substitute a mock
//!
//! # Design Decisions
//! - Deadlines are enforced by callers via `tokio::time::timeout`, so
//!   implementations stay free of timing policy
//! - PAUSE and RESUME are assumed safe to issue redundantly; the
//!   coordinator schedules overlapping resumes on that assumption

pub mod pgbouncer;

use async_trait::async_trait;
use thiserror::Error;

pub use pgbouncer::PgBouncerAdmin;

/// Errors surfaced by pooler admin operations.
#[derive(Debug, Error)]
pub enum PoolerError {
    /// The admin connection could not be established or was lost.
    #[error("pooler connection failed: {0}")]
    Connection(String),

    /// The admin command was rejected by the pooler.
    #[error("pooler command failed: {0}")]
    Command(String),
}

/// Admin operations required from the connection pooler.
#[async_trait]
pub trait Pooler: Send + Sync + 'static {
    /// Stop dispatching client queries. In-flight queries complete; new
    /// ones queue at the pooler until resume.
    async fn pause(&self) -> Result<(), PoolerError>;

    /// Resume dispatching client queries.
    async fn resume(&self) -> Result<(), PoolerError>;

    /// Lightweight liveness probe: list the databases the pooler serves.
    async fn show_databases(&self) -> Result<Vec<String>, PoolerError>;
}
