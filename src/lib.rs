//! PostgreSQL failover coordination core.
//!
//! Sits beside a PgBouncer-class connection pooler and gives an external
//! orchestrator two capabilities: a loss-resistant stream of cluster-state
//! key changes, and a time-bounded pause of pooled traffic with a detached
//! auto-resume safety net.

pub mod api;
pub mod config;
pub mod failover;
pub mod lifecycle;
pub mod pooler;
pub mod store;
pub mod stream;

pub use config::FailoverConfig;
pub use failover::FailoverCoordinator;
pub use lifecycle::Shutdown;
pub use stream::{ChangeStream, StreamConfig};
