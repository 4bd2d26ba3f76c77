//! Server-sent event stream.
//!
//! Each connection owns one hub [`Mailbox`]. Frames are written to the
//! response body as they arrive; the stream ends when the hub closes the
//! mailbox. When the peer disconnects hyper drops the body, which drops the
//! mailbox and unregisters it.

use axum::{
    body::Body,
    extract::State,
    http::{
        HeaderValue,
        header::{CACHE_CONTROL, CONTENT_TYPE},
    },
    response::{IntoResponse, Response},
};
use card_brawl::{EventKind, Mailbox, hub::format_event};
use futures_util::stream;
use std::convert::Infallible;

use super::{AppState, error::ApiError};
use crate::metrics::StreamConnectionGuard;

/// `GET /api/events`
pub async fn event_stream(State(state): State<AppState>) -> Result<Response, ApiError> {
    // Registration is queued before the lock is released, so no update made
    // after the seed snapshot can reach the hub ahead of it. The inbox slot
    // is claimed first so nothing under the lock waits on the hub.
    let pending = state.hub.reserve_subscription().await?;
    let mailbox = {
        let game = state.game.lock().await;
        let seed = format_event(EventKind::Update, &game.snapshot())?;
        pending.activate(Some(seed))?
    };
    tracing::debug!(client = %mailbox.id(), "Event stream opened");

    let connection = Connection {
        mailbox,
        _guard: StreamConnectionGuard::open(),
    };
    let body = stream::unfold(connection, |mut connection| async move {
        let frame = connection.mailbox.recv().await?;
        Some((Ok::<_, Infallible>(frame), connection))
    });

    Ok((
        [
            (CONTENT_TYPE, HeaderValue::from_static("text/event-stream")),
            (CACHE_CONTROL, HeaderValue::from_static("no-cache")),
        ],
        Body::from_stream(body),
    )
        .into_response())
}

struct Connection {
    mailbox: Mailbox,
    _guard: StreamConnectionGuard,
}

impl Drop for Connection {
    fn drop(&mut self) {
        tracing::debug!(client = %self.mailbox.id(), "Event stream closed");
    }
}
