//! Control API server setup.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::api::auth::{require_bearer, AuthPolicy};
use crate::api::{handlers, trace};
use crate::failover::FailoverCoordinator;

/// Application state injected into handlers and middleware.
#[derive(Clone)]
pub struct AppState {
    pub coordinator: Arc<FailoverCoordinator>,
    pub auth: AuthPolicy,
}

/// HTTP server exposing the failover control surface.
pub struct ApiServer {
    router: Router,
}

impl ApiServer {
    pub fn new(coordinator: Arc<FailoverCoordinator>, auth: AuthPolicy) -> Self {
        let state = AppState { coordinator, auth };

        Self {
            router: build_router(state),
        }
    }

    /// Serve until the shutdown scope signals.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "control API starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("control API stopped");
        Ok(())
    }
}

/// Build the router with all middleware layers. Auth sits closest to the
/// handlers so rejected requests still get a trace log line.
fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/v1/pause", post(handlers::pause))
        .route("/v1/resume", post(handlers::resume))
        .route("/v1/health", get(handlers::health))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_bearer,
        ))
        .layer(middleware::from_fn(trace::log_requests))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
