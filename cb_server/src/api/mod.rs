//! HTTP API for the game server.
//!
//! # Modules
//!
//! - [`game`]: join, choose, vote, reset and settings handlers
//! - [`events`]: the `text/event-stream` endpoint
//! - [`validation`]: form parameter checks
//! - [`cache`]: ETag handling for snapshot reads
//! - [`middleware`]: request ids, request logging and HTTP metrics
//!
//! # Endpoints Overview
//!
//! ```text
//! POST  /api/join     name                    -> 200 {"player_index": n}
//! POST  /api/choose   player, white, black*   -> 204
//! POST  /api/vote     player, fighter         -> 204
//! POST  /api/reset                            -> 204
//! GET   /api/game                             -> 200 snapshot (ETag) | 304
//! PATCH /api/game     goal_points?, fighters_per_black?,
//!                     hand_white_size?, hand_black_size? -> 204
//! GET   /api/events                           -> text/event-stream
//! GET   /health                               -> 200 status JSON
//! ```
//!
//! Anything else is served from the static directory.
//!
//! # CORS
//!
//! CORS is configured permissively so the page can be hosted elsewhere
//! during development.

pub mod cache;
pub mod error;
pub mod events;
pub mod game;
pub mod middleware;
pub mod validation;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
};
use card_brawl::{EventKind, GameState, HubHandle};
use serde::Serialize;
use serde_json::json;
use std::{path::Path, sync::Arc};
use tokio::sync::Mutex;
use tower_http::{cors::CorsLayer, services::ServeDir};

use crate::metrics;

/// Application state shared across all HTTP handlers and event streams.
///
/// Handlers validate, mutate and snapshot while holding `game`, then release
/// it before publishing through `hub`.
#[derive(Clone)]
pub struct AppState {
    pub game: Arc<Mutex<GameState>>,
    pub hub: HubHandle,
}

impl AppState {
    #[must_use]
    pub fn new(game: GameState, hub: HubHandle) -> Self {
        Self {
            game: Arc::new(Mutex::new(game)),
            hub,
        }
    }

    /// Broadcasts one event. Failures only affect listeners, so the caller's
    /// request still succeeds.
    pub async fn publish<T>(&self, event: EventKind, payload: &T)
    where
        T: Serialize + ?Sized,
    {
        match self.hub.send_event(event, payload).await {
            Ok(()) => metrics::events_published_total(event.as_str()),
            Err(e) => tracing::warn!("Failed to publish {event} event: {e}"),
        }
    }
}

/// Create the complete router with all endpoints and middleware.
///
/// `static_dir` backs every path no API route claims.
pub fn create_router(state: AppState, static_dir: &Path) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/join", post(game::join))
        .route("/api/choose", post(game::choose))
        .route("/api/vote", post(game::vote))
        .route("/api/reset", post(game::reset))
        .route(
            "/api/game",
            get(game::get_game).patch(game::update_settings),
        )
        .route("/api/events", get(events::event_stream))
        .fallback_service(ServeDir::new(static_dir))
        .layer(axum::middleware::from_fn(middleware::request_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint for monitoring and load balancers.
///
/// Returns `200 OK` while the event hub is running, `503` once it has shut
/// down.
///
/// ```bash
/// curl http://localhost:8080/health
/// # {"status":"healthy","players":3,"phase":"voting","streams":2,"timestamp":"2026-10-17T10:30:00Z"}
/// ```
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let (players, phase) = {
        let game = state.game.lock().await;
        (game.players().len(), game.phase())
    };
    let streams = state.hub.client_count().await.ok();

    let (status_code, status) = match streams {
        Some(_) => (StatusCode::OK, "healthy"),
        None => (StatusCode::SERVICE_UNAVAILABLE, "unhealthy"),
    };

    (
        status_code,
        Json(json!({
            "status": status,
            "players": players,
            "phase": phase,
            "streams": streams,
            "timestamp": chrono::Utc::now().to_rfc3339(),
        })),
    )
}
