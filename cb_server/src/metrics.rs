//! Prometheus metrics for monitoring server health and game activity.
//!
//! Nothing is exported unless [`init_metrics`] installs the recorder; until
//! then every call here is a no-op.
//!
//! # Metrics
//!
//! - `http_requests_total{method,path,status}`
//! - `http_request_duration_ms{method,path}`
//! - `game_actions_total{action}`
//! - `events_published_total{event}`
//! - `event_stream_connections_active`
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use cb_server::metrics;
//! use std::net::SocketAddr;
//!
//! let addr: SocketAddr = "127.0.0.1:9090".parse().unwrap();
//! metrics::init_metrics(addr).unwrap();
//!
//! metrics::http_requests_total("POST", "/api/vote", 204);
//! ```

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;

/// Initialize Prometheus metrics exporter.
///
/// Metrics will be available at `http://<addr>/metrics`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()
}

// ============================================================================
// HTTP Metrics
// ============================================================================

/// Record HTTP request.
pub fn http_requests_total(method: &str, path: &str, status: u16) {
    metrics::counter!("http_requests_total",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record HTTP request duration in milliseconds.
pub fn http_request_duration_ms(method: &str, path: &str, duration_ms: f64) {
    metrics::histogram!("http_request_duration_ms",
        "method" => method.to_string(),
        "path" => path.to_string()
    )
    .record(duration_ms);
}

// ============================================================================
// Game Metrics
// ============================================================================

/// Count an accepted game action (`join`, `choose`, `vote`, `reset`, `settings`).
pub fn game_actions_total(action: &'static str) {
    metrics::counter!("game_actions_total", "action" => action).increment(1);
}

// ============================================================================
// Event Stream Metrics
// ============================================================================

/// Count a broadcast handed to the hub.
pub fn events_published_total(event: &'static str) {
    metrics::counter!("events_published_total", "event" => event).increment(1);
}

/// Track one open event stream for as long as the guard lives.
#[derive(Debug)]
pub struct StreamConnectionGuard(());

impl StreamConnectionGuard {
    #[must_use]
    pub fn open() -> Self {
        metrics::gauge!("event_stream_connections_active").increment(1.0);
        Self(())
    }
}

impl Drop for StreamConnectionGuard {
    fn drop(&mut self) {
        metrics::gauge!("event_stream_connections_active").decrement(1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_without_exporter_is_noop() {
        http_requests_total("GET", "/health", 200);
        http_request_duration_ms("GET", "/health", 0.3);
        game_actions_total("join");
        events_published_total("update");
        drop(StreamConnectionGuard::open());
    }
}
