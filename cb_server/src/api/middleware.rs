//! Request middleware: request ids, request logging and HTTP metrics.

use axum::{
    extract::{MatchedPath, Request},
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

use crate::{logging, metrics};

/// Header name for request ID
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Generate or extract request ID from headers
fn get_or_generate_request_id(headers: &HeaderMap) -> String {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

/// Tags the request with an id, runs it inside a span carrying that id, and
/// records the outcome.
///
/// The id is echoed back in the `x-request-id` response header. Static files
/// are labelled `static` in metrics to keep path cardinality bounded.
pub async fn request_middleware(request: Request, next: Next) -> Response {
    let request_id = get_or_generate_request_id(request.headers());
    let method = request.method().clone();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| "static".to_string(), |p| p.as_str().to_string());

    let span = tracing::info_span!("request", request_id = %request_id);
    let start = Instant::now();

    let mut response = async {
        tracing::debug!(method = %method, uri = %request.uri(), "Request started");
        next.run(request).await
    }
    .instrument(span.clone())
    .await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    let duration_ms = start.elapsed().as_secs_f64() * 1000.0;
    let status = response.status().as_u16();
    metrics::http_requests_total(method.as_str(), &path, status);
    metrics::http_request_duration_ms(method.as_str(), &path, duration_ms);
    span.in_scope(|| logging::log_api_request(method.as_str(), &path, status, duration_ms));

    response
}
