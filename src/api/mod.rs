//! HTTP control surface.
//!
//! # Data Flow
//! ```text
//! orchestrator / failover-cli
//!     → trace.rs (per-request trace id + duration log)
//!     → auth.rs (shared-secret bearer check)
//!     → handlers.rs (pause / resume / health)
//!     → FailoverCoordinator
//! ```
//!
//! # Design Decisions
//! - The auth secret is injected state, so tests can run with auth
//!   disabled or a fixed token
//! - Deadline errors map to 504, pooler failures to 502, bad durations
//!   to 400; health always answers 200 with the verdict in the body

pub mod auth;
pub mod handlers;
pub mod server;
pub mod trace;

pub use auth::AuthPolicy;
pub use server::{ApiServer, AppState};
