//! Pause/resume coordination against the pooler.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::time;

use crate::failover::error::FailoverError;
use crate::failover::health::{ComponentHealth, HealthReport};
use crate::failover::iso8601;
use crate::pooler::Pooler;

/// Receipt for a successful pause.
#[derive(Debug, Clone, Copy)]
pub struct PauseReceipt {
    pub created_at: DateTime<Utc>,
    /// `created_at + expiry`. Equal to `created_at` when no auto-resume
    /// was requested.
    pub expires_at: DateTime<Utc>,
}

/// Receipt for a successful resume.
#[derive(Debug, Clone, Copy)]
pub struct ResumeReceipt {
    pub created_at: DateTime<Utc>,
}

/// Executes pause/resume against the pooler with deadline enforcement and
/// schedules the detached auto-resume safety net.
///
/// Overlapping pause, resume and auto-resume invocations are not
/// serialized. Correctness under overlap relies on the pooler admin
/// commands being safe to issue concurrently and redundantly.
pub struct FailoverCoordinator {
    pooler: Arc<dyn Pooler>,
    /// Deadline applied to explicit resume and the liveness probe.
    exec_timeout: Duration,
}

impl FailoverCoordinator {
    pub fn new(pooler: Arc<dyn Pooler>, exec_timeout: Duration) -> Self {
        Self {
            pooler,
            exec_timeout,
        }
    }

    /// Pause pooled traffic under `timeout` as a hard deadline.
    ///
    /// With `expiry > 0`, a detached task resumes traffic at
    /// `created_at + expiry` so the pooler is never left paused if the
    /// orchestrator dies mid-switchover. The task is independent of this
    /// call's lifetime and its failures are logged, never surfaced.
    pub async fn pause(
        &self,
        timeout: Duration,
        expiry: Duration,
    ) -> Result<PauseReceipt, FailoverError> {
        if timeout.is_zero() {
            return Err(FailoverError::InvalidRequest {
                field: "timeout",
                reason: "must be greater than zero",
            });
        }

        let created_at = Utc::now();
        let resume_at = time::Instant::now() + expiry;
        let expires_at = created_at
            + chrono::Duration::from_std(expiry).map_err(|_| FailoverError::InvalidRequest {
                field: "expiry",
                reason: "out of range",
            })?;

        match time::timeout(timeout, self.pooler.pause()).await {
            Err(_) => return Err(FailoverError::DeadlineExceeded { operation: "pause" }),
            Ok(Err(source)) => {
                return Err(FailoverError::Pooler {
                    operation: "pause",
                    source,
                })
            }
            Ok(Ok(())) => {}
        }

        if !expiry.is_zero() {
            let pooler = Arc::clone(&self.pooler);
            tokio::spawn(async move {
                tracing::info!(at = %iso8601(expires_at), "scheduling pooler resume");
                time::sleep_until(resume_at).await;

                // The resume gets the same deadline the pause was given.
                tracing::info!("executing scheduled resume");
                match time::timeout(timeout, pooler.resume()).await {
                    Err(_) => tracing::error!("scheduled resume exceeded its deadline"),
                    Ok(Err(error)) => tracing::error!(%error, "failed to resume pooler"),
                    Ok(Ok(())) => tracing::info!("scheduled resume complete"),
                }
            });
        }

        Ok(PauseReceipt {
            created_at,
            expires_at,
        })
    }

    /// Resume pooled traffic under the configured exec deadline.
    pub async fn resume(&self) -> Result<ResumeReceipt, FailoverError> {
        match time::timeout(self.exec_timeout, self.pooler.resume()).await {
            Err(_) => Err(FailoverError::DeadlineExceeded {
                operation: "resume",
            }),
            Ok(Err(source)) => Err(FailoverError::Pooler {
                operation: "resume",
                source,
            }),
            Ok(Ok(())) => Ok(ResumeReceipt {
                created_at: Utc::now(),
            }),
        }
    }

    /// Probe pooler liveness and aggregate the result.
    pub async fn health_check(&self) -> HealthReport {
        let component = match time::timeout(self.exec_timeout, self.pooler.show_databases()).await {
            Err(_) => ComponentHealth::unhealthy("pgbouncer", "liveness probe timed out"),
            Ok(Err(error)) => ComponentHealth::unhealthy("pgbouncer", error.to_string()),
            Ok(Ok(_)) => ComponentHealth::healthy("pgbouncer"),
        };

        HealthReport::aggregate(vec![component])
    }
}
