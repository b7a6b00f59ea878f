use axum::{body::Body, http::Request, middleware::Next, response::Response};
use std::time::{Duration, Instant};
use tower_http::timeout::TimeoutLayer;
use tracing::{debug, warn};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub fn create_timeout_layer() -> TimeoutLayer {
    TimeoutLayer::new(REQUEST_TIMEOUT)
}

/// Per-request log line. Successful requests go to debug: an open progress
/// page polls once a second.
pub async fn request_logger(req: Request<Body>, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let start = Instant::now();

    let response = next.run(req).await;

    let duration = start.elapsed();
    let status = response.status();
    let progress = response
        .headers()
        .get(super::pages::X_PROGRESS)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string();

    if status.is_client_error() || status.is_server_error() {
        warn!(
            target: "covwatch.http",
            method = %method,
            uri = %uri,
            status = %status.as_u16(),
            duration_ms = %duration.as_millis(),
            "Request failed"
        );
    } else {
        debug!(
            target: "covwatch.http",
            method = %method,
            uri = %uri,
            status = %status.as_u16(),
            progress = %progress,
            duration_ms = %duration.as_millis(),
            "Request completed"
        );
    }

    response
}
