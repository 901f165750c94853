//! Process lifecycle subsystem.
//!
//! # Data Flow
//! ```text
//! SIGTERM / SIGINT (signals.rs)
//!     → Shutdown::trigger (shutdown.rs)
//!     → broadcast to API server, change streams, workers
//!     → tasks observe the signal at their next wait point and stop
//! ```
//!
//! # Design Decisions
//! - One broadcast channel fans the signal out to every long-running task
//! - Cancellation is cooperative: checked at loop tops and wait points,
//!   never pre-empting an operation mid-flight

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
