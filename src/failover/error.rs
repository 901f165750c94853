//! Error definitions for pause/resume operations.

use thiserror::Error;

use crate::pooler::PoolerError;

/// Errors surfaced to callers of the coordinator.
#[derive(Debug, Error)]
pub enum FailoverError {
    /// The enclosing deadline expired before the pooler operation
    /// finished. Classified distinctly so callers can tell a slow pooler
    /// from a broken one.
    #[error("exceeded {operation} timeout")]
    DeadlineExceeded { operation: &'static str },

    /// The pooler rejected or failed the operation.
    #[error("pooler {operation} failed: {source}")]
    Pooler {
        operation: &'static str,
        #[source]
        source: PoolerError,
    },

    /// The request carried an unusable parameter.
    #[error("invalid {field}: {reason}")]
    InvalidRequest {
        field: &'static str,
        reason: &'static str,
    },
}
