//! Request/duration logging.

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use std::time::Instant;
use uuid::Uuid;

/// Log every request at start and completion with a per-request trace id.
pub async fn log_requests(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let trace = Uuid::new_v4();

    tracing::info!(%method, %path, %trace, "handling request");
    let begin = Instant::now();

    let response = next.run(request).await;

    tracing::info!(
        %method,
        %path,
        %trace,
        status = %response.status(),
        duration_secs = begin.elapsed().as_secs_f64(),
        "request complete"
    );

    response
}
