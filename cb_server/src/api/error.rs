//! API error responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use card_brawl::{GameError, HubError};
use thiserror::Error;

use super::validation::ValidationError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Bad request parameters
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Request was well-formed but doesn't fit the current game state
    #[error(transparent)]
    Game(#[from] GameError),

    #[error(transparent)]
    Hub(#[from] HubError),

    #[error("failed to serialize response: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl ApiError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Game(_) => StatusCode::CONFLICT,
            Self::Hub(HubError::Closed) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Hub(HubError::Serialize(_)) | Self::Serialize(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {self}");
        } else {
            tracing::debug!("Request rejected: {self}");
        }
        (status, self.to_string()).into_response()
    }
}
