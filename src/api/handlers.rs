//! Control API handlers.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::api::server::AppState;
use crate::failover::{iso8601, FailoverError, HealthReport};

#[derive(Debug, Deserialize)]
pub struct PauseBody {
    /// Hard deadline for the pause command, in milliseconds.
    pub timeout_ms: u64,
    /// Auto-resume delay in milliseconds; 0 disables the safety net.
    #[serde(default)]
    pub expiry_ms: u64,
}

#[derive(Debug, Serialize)]
pub struct PauseReply {
    pub created_at: String,
    pub expires_at: String,
}

#[derive(Debug, Serialize)]
pub struct ResumeReply {
    pub created_at: String,
}

pub async fn pause(
    State(state): State<AppState>,
    Json(body): Json<PauseBody>,
) -> Result<Json<PauseReply>, ApiError> {
    let receipt = state
        .coordinator
        .pause(
            Duration::from_millis(body.timeout_ms),
            Duration::from_millis(body.expiry_ms),
        )
        .await?;

    Ok(Json(PauseReply {
        created_at: iso8601(receipt.created_at),
        expires_at: iso8601(receipt.expires_at),
    }))
}

pub async fn resume(State(state): State<AppState>) -> Result<Json<ResumeReply>, ApiError> {
    let receipt = state.coordinator.resume().await?;

    Ok(Json(ResumeReply {
        created_at: iso8601(receipt.created_at),
    }))
}

pub async fn health(State(state): State<AppState>) -> Json<HealthReport> {
    Json(state.coordinator.health_check().await)
}

/// Wrapper mapping coordinator errors onto HTTP statuses.
pub struct ApiError(FailoverError);

impl From<FailoverError> for ApiError {
    fn from(error: FailoverError) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            FailoverError::DeadlineExceeded { .. } => StatusCode::GATEWAY_TIMEOUT,
            FailoverError::Pooler { .. } => StatusCode::BAD_GATEWAY,
            FailoverError::InvalidRequest { .. } => StatusCode::BAD_REQUEST,
        };

        (
            status,
            Json(serde_json::json!({ "error": self.0.to_string() })),
        )
            .into_response()
    }
}
