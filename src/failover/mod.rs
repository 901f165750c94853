//! Failover pause/resume coordination subsystem.
//!
//! # Data Flow
//! ```text
//! orchestrator ── pause(timeout, expiry) ──▶ coordinator.rs
//!     → pooler PAUSE under the caller's deadline
//!     → on success, detached auto-resume task armed at expiry
//!
//! orchestrator ── resume() ──▶ pooler RESUME under the exec deadline
//! orchestrator ── health_check() ──▶ probe pooler, aggregate (health.rs)
//! ```
//!
//! # Design Decisions
//! - The auto-resume task is deliberately decoupled from the originating
//!   call: it must fire even if the requester is gone
//! - Deadline expiry is classified distinctly from pooler failures
//! - Overlapping pause/resume calls are not serialized; the pooler admin
//!   commands are relied upon to tolerate redundant invocation

pub mod coordinator;
pub mod error;
pub mod health;

use chrono::{DateTime, Utc};

pub use coordinator::{FailoverCoordinator, PauseReceipt, ResumeReceipt};
pub use error::FailoverError;
pub use health::{ComponentHealth, HealthReport, HealthStatus};

/// Render a timestamp as ISO-8601 with a numeric offset and no sub-second
/// precision, e.g. `2021-03-09T17:04:05+0000`.
pub fn iso8601(t: DateTime<Utc>) -> String {
    t.format("%Y-%m-%dT%H:%M:%S%z").to_string()
}
