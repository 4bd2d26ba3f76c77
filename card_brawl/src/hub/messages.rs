//! Hub message types and event framing.

use serde::Serialize;
use serde_json::Value;
use std::fmt;
use tokio::sync::{mpsc, oneshot};
use uuid::Uuid;

/// Identity of one registered stream.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct ClientId(Uuid);

impl ClientId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ClientId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Messages that can be sent to the HubActor
#[derive(Debug)]
pub enum HubMessage {
    /// Start delivering frames to a mailbox
    Register {
        id: ClientId,
        mailbox: mpsc::Sender<String>,
    },

    /// Stop delivering and close the mailbox
    Unregister { id: ClientId },

    /// Deliver a pre-formatted frame to every registered mailbox
    Broadcast { frame: String },

    /// Number of registered mailboxes
    ClientCount { response: oneshot::Sender<usize> },

    /// Send the final frame, close everything and stop the hub
    Shutdown { done: oneshot::Sender<()> },
}

/// Event names understood by clients.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum EventKind {
    /// Full game state changed
    Update,
    /// Settings changed
    Settings,
    /// Clear local vote or game UI; payload is a [`ResetKind`]
    Reset,
    /// Server is going away; payload is a timestamp
    Shutdown,
}

impl EventKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Update => "update",
            Self::Settings => "settings",
            Self::Reset => "reset",
            Self::Shutdown => "shutdown",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload of a `reset` event.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResetKind {
    Votes,
    Game,
}

/// Renders one event-stream frame.
///
/// Payloads that serialize to a JSON string are written verbatim; anything
/// else is written as compact JSON.
pub fn format_event<T>(event: EventKind, data: &T) -> Result<String, serde_json::Error>
where
    T: Serialize + ?Sized,
{
    let data = match serde_json::to_value(data)? {
        Value::String(text) => text,
        other => other.to_string(),
    };
    Ok(format!("event: {event}\ndata: {data}\n\n"))
}
