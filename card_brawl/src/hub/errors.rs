//! Hub error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HubError {
    /// The hub task has shut down and accepts no more requests.
    #[error("event hub is closed")]
    Closed,

    /// The payload could not be rendered into an event frame.
    #[error("failed to serialize event payload: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type HubResult<T> = Result<T, HubError>;
