//! Key-value store abstraction.
//!
//! # Responsibilities
//! - Expose the two store primitives the stream needs: bounded point
//!   lookups and prefix watch subscriptions
//! - Keep the store client behind a trait so tests can substitute a mock
//!
//! # Design Decisions
//! - A watch subscription surfaces as an mpsc receiver; channel closure is
//!   the signal that the subscription was lost and must be reopened
//! - Batch-level errors are advisory payload, not subscription termination
//! - `require_leader` is part of the watch call, not connection state

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;

/// A snapshot of a key's current value. Not a diff: the same logical change
/// may be observed more than once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValue {
    pub key: Vec<u8>,
    pub value: Vec<u8>,
}

impl KeyValue {
    pub fn new(key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Key rendered as UTF-8 for logging.
    pub fn key_str(&self) -> String {
        String::from_utf8_lossy(&self.key).into_owned()
    }
}

/// One delivery from a watch subscription.
#[derive(Debug, Clone, Default)]
pub struct WatchBatch {
    /// Changes observed since the previous batch.
    pub events: Vec<KeyValue>,
    /// Advisory transport error. The subscription is still live.
    pub error: Option<String>,
}

/// Errors surfaced by store lookups.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The lookup deadline expired before the store answered.
    #[error("store request timed out")]
    Timeout,

    /// The request failed in transit or was rejected by the store.
    #[error("store request failed: {0}")]
    Transport(String),
}

/// The primitives required from a replicated, watch-capable store.
#[async_trait]
pub trait WatchStore: Send + Sync + 'static {
    /// Point lookup bounded by `timeout`. `Ok(None)` means the key exists
    /// nowhere in the store, which callers treat as its own condition.
    async fn get(&self, key: &str, timeout: Duration) -> Result<Option<KeyValue>, StoreError>;

    /// Open a long-lived watch over every key under `prefix`. When
    /// `require_leader` is set, the subscription must be served by a replica
    /// that can confirm a current cluster leader.
    async fn watch(&self, prefix: &str, require_leader: bool) -> mpsc::Receiver<WatchBatch>;
}
