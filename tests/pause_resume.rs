//! Coordinator deadline, expiry and overlap behavior.

mod common;

use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::sleep;

use common::{Behavior, MockPooler};
use failover_coordinator::failover::{FailoverError, HealthStatus};
use failover_coordinator::FailoverCoordinator;

const EXEC_TIMEOUT: Duration = Duration::from_millis(2_000);

fn coordinator(pooler: &Arc<MockPooler>) -> FailoverCoordinator {
    FailoverCoordinator::new(pooler.clone(), EXEC_TIMEOUT)
}

#[tokio::test]
async fn test_pause_deadline_is_classified_distinctly() {
    let pooler = MockPooler::blocking();
    let coordinator = coordinator(&pooler);

    let begin = Instant::now();
    let err = coordinator
        .pause(Duration::from_millis(100), Duration::ZERO)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        FailoverError::DeadlineExceeded { operation: "pause" }
    ));
    assert!(
        begin.elapsed() < Duration::from_millis(600),
        "deadline was not enforced promptly"
    );
}

#[tokio::test]
async fn test_pause_receipt_carries_expiry_and_schedules_resume() {
    let pooler = MockPooler::healthy();
    let coordinator = coordinator(&pooler);

    let receipt = coordinator
        .pause(Duration::from_secs(1), Duration::from_millis(200))
        .await
        .unwrap();

    assert_eq!(
        receipt.expires_at - receipt.created_at,
        chrono::Duration::milliseconds(200)
    );
    assert_eq!(pooler.resumes(), 0, "resume fired before expiry");

    sleep(Duration::from_millis(600)).await;
    assert_eq!(pooler.resumes(), 1, "auto-resume never fired");
}

#[tokio::test]
async fn test_pause_without_expiry_never_resumes() {
    let pooler = MockPooler::healthy();
    let coordinator = coordinator(&pooler);

    let receipt = coordinator
        .pause(Duration::from_secs(1), Duration::ZERO)
        .await
        .unwrap();
    assert_eq!(receipt.expires_at, receipt.created_at);

    sleep(Duration::from_millis(500)).await;
    assert_eq!(pooler.resumes(), 0);
}

#[tokio::test]
async fn test_overlapping_pauses_schedule_independent_resumes() {
    let pooler = MockPooler::healthy();
    let coordinator = coordinator(&pooler);

    coordinator
        .pause(Duration::from_secs(1), Duration::from_millis(150))
        .await
        .unwrap();
    coordinator
        .pause(Duration::from_secs(1), Duration::from_millis(250))
        .await
        .unwrap();

    sleep(Duration::from_millis(800)).await;
    assert_eq!(pooler.resumes(), 2, "an auto-resume was dropped");
}

#[tokio::test]
async fn test_failed_pause_schedules_no_resume() {
    let pooler = MockPooler::with(
        Behavior::FailWith("already suspended"),
        Behavior::Ok,
        Behavior::Ok,
    );
    let coordinator = coordinator(&pooler);

    let err = coordinator
        .pause(Duration::from_secs(1), Duration::from_millis(100))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        FailoverError::Pooler {
            operation: "pause",
            ..
        }
    ));

    sleep(Duration::from_millis(400)).await;
    assert_eq!(pooler.resumes(), 0);
}

#[tokio::test]
async fn test_auto_resume_failure_is_absorbed() {
    let pooler = MockPooler::with(Behavior::Ok, Behavior::FailWith("broken pipe"), Behavior::Ok);
    let coordinator = coordinator(&pooler);

    coordinator
        .pause(Duration::from_secs(1), Duration::from_millis(100))
        .await
        .unwrap();

    // The scheduled resume runs, fails, and surfaces nowhere.
    sleep(Duration::from_millis(400)).await;
    assert_eq!(pooler.resumes(), 1);

    // An explicit resume does surface the same failure.
    let err = coordinator.resume().await.unwrap_err();
    assert!(matches!(
        err,
        FailoverError::Pooler {
            operation: "resume",
            ..
        }
    ));
}

#[tokio::test]
async fn test_resume_returns_timestamp() {
    let pooler = MockPooler::healthy();
    let coordinator = coordinator(&pooler);

    let receipt = coordinator.resume().await.unwrap();
    assert!(receipt.created_at <= chrono::Utc::now());
    assert_eq!(pooler.resumes(), 1);
}

#[tokio::test]
async fn test_pause_rejects_zero_timeout() {
    let pooler = MockPooler::healthy();
    let coordinator = coordinator(&pooler);

    let err = coordinator
        .pause(Duration::ZERO, Duration::ZERO)
        .await
        .unwrap_err();
    assert!(matches!(err, FailoverError::InvalidRequest { .. }));
    assert_eq!(
        pooler.pause_calls.load(std::sync::atomic::Ordering::SeqCst),
        0,
        "pooler was reached with an invalid request"
    );
}

#[tokio::test]
async fn test_health_check_maps_probe_results() {
    let pooler = MockPooler::failing("connection refused");
    let report = coordinator(&pooler).health_check().await;

    assert_eq!(report.status, HealthStatus::Unhealthy);
    assert_eq!(report.components.len(), 1);
    assert_eq!(report.components[0].name, "pgbouncer");
    assert!(report.components[0]
        .error
        .as_deref()
        .unwrap()
        .contains("connection refused"));

    let pooler = MockPooler::healthy();
    let report = coordinator(&pooler).health_check().await;

    assert_eq!(report.status, HealthStatus::Healthy);
    assert!(report.components[0].error.is_none());
}
