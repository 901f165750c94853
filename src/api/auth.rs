//! Shared-secret bearer authentication.

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::Response,
};

use crate::api::server::AppState;

/// Comparison capability for the shared secret.
///
/// Holds no state beyond the configured token. `disabled` permits every
/// request, which is also what an empty configured token means.
#[derive(Clone)]
pub struct AuthPolicy {
    token: Option<String>,
}

impl AuthPolicy {
    /// Require `Authorization: Bearer <token>` on every request.
    pub fn bearer(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }

    /// Permit every request.
    pub fn disabled() -> Self {
        Self { token: None }
    }

    /// Build from the configured secret; empty disables authentication.
    pub fn from_configured(token: &str) -> Self {
        if token.is_empty() {
            Self::disabled()
        } else {
            Self::bearer(token)
        }
    }

    fn permits(&self, header: Option<&str>) -> bool {
        match &self.token {
            None => true,
            Some(expected) => header
                .map(|value| value == format!("Bearer {}", expected))
                .unwrap_or(false),
        }
    }
}

pub async fn require_bearer(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    if state.auth.permits(header) {
        Ok(next.run(request).await)
    } else {
        Err(StatusCode::UNAUTHORIZED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_policy_permits_anything() {
        let policy = AuthPolicy::disabled();
        assert!(policy.permits(None));
        assert!(policy.permits(Some("Bearer whatever")));
    }

    #[test]
    fn test_bearer_policy_requires_exact_match() {
        let policy = AuthPolicy::bearer("s3cret");
        assert!(policy.permits(Some("Bearer s3cret")));
        assert!(!policy.permits(Some("Bearer wrong")));
        assert!(!policy.permits(Some("s3cret")));
        assert!(!policy.permits(None));
    }

    #[test]
    fn test_empty_configured_token_disables_auth() {
        let policy = AuthPolicy::from_configured("");
        assert!(policy.permits(None));
    }
}
