//! HTTP metrics middleware

use std::time::Instant;

use axum::{body::Body, http::Request, middleware::Next, response::Response};

use super::matched_path;
use crate::infrastructure::observability::record_http_request;

/// Paths polled by orchestrators and scrapers; recording them only adds noise
const UNRECORDED_PATHS: [&str; 4] = ["/health", "/live", "/ready", "/metrics"];

/// Record count, latency and 5xx rate per route
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response {
    let path = matched_path(&request);

    if UNRECORDED_PATHS.contains(&path.as_str()) {
        return next.run(request).await;
    }

    let start = Instant::now();
    let method = request.method().clone();
    let response = next.run(request).await;

    record_http_request(
        method.as_str(),
        &path,
        response.status().as_u16(),
        start.elapsed(),
    );

    response
}
