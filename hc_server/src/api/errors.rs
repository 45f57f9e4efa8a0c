//! Uniform error envelope for every HTTP handler.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use hand_cricket::{IdentifierError, SessionError, TrackerError, chain::GatewayError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error body returned to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionError {
    pub message: String,
}

/// Errors raised while serving a request
#[derive(Debug, Error)]
pub enum ApiError {
    /// Caller account could not be parsed
    #[error(transparent)]
    Identifier(#[from] IdentifierError),

    /// Tracker rejected the operation or the actor is gone
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Transaction could not be prepared
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// Body is not valid JSON of the expected shape
    #[error("Malformed request body: {0}")]
    InvalidBody(String),

    /// Turn request without a usable hand value
    #[error("Missing or non-numeric options")]
    InvalidOptions,

    /// Administrator key missing or malformed
    #[error("Malformed administrator key")]
    InvalidAdmin,

    /// POST to an unknown action path
    #[error("Unknown action: {0}")]
    UnknownAction(String),
}

impl ApiError {
    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Session(SessionError::Closed) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    /// Message shown to the caller
    pub fn client_message(&self) -> String {
        match self {
            ApiError::Identifier(e) => e.client_message(),
            ApiError::Session(e) => e.client_message(),
            ApiError::Gateway(e) => e.client_message(),
            ApiError::InvalidBody(_) => "An unknown error occurred".to_string(),
            ApiError::InvalidOptions => "Invalid \"options\" provided".to_string(),
            ApiError::InvalidAdmin => "Invalid admin key or unauthorized access".to_string(),
            ApiError::UnknownAction(_) => "Invalid action requested".to_string(),
        }
    }

    /// Short machine-readable kind, used for logs and metrics labels
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Identifier(_) => "malformed_identifier",
            ApiError::Session(SessionError::Tracker(e)) => e.kind(),
            ApiError::Session(SessionError::Closed) => "session_closed",
            ApiError::Gateway(_) => "gateway",
            ApiError::InvalidBody(_) => "invalid_body",
            ApiError::InvalidOptions => "invalid_options",
            ApiError::InvalidAdmin => "invalid_admin",
            ApiError::UnknownAction(_) => "unknown_action",
        }
    }
}

impl From<TrackerError> for ApiError {
    fn from(err: TrackerError) -> Self {
        ApiError::Session(SessionError::Tracker(err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, "Request rejected");
        }

        let body = ActionError {
            message: self.client_message(),
        };
        (status, Json(body)).into_response()
    }
}

/// Result type for handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use hand_cricket::PlayerId;

    #[test]
    fn test_tracker_errors_are_bad_requests() {
        let err = ApiError::from(TrackerError::NotRegistered(PlayerId::from_bytes([1; 32])));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            err.client_message(),
            "You must register for the tournament before playing"
        );
        assert_eq!(err.kind(), "not_registered");
    }

    #[test]
    fn test_closed_session_is_unavailable() {
        let err = ApiError::from(SessionError::Closed);
        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_body_details_are_not_echoed() {
        let err = ApiError::InvalidBody("expected value at line 1 column 1".to_string());
        assert_eq!(err.client_message(), "An unknown error occurred");
    }

    #[test]
    fn test_malformed_account_message() {
        let err = ApiError::from(PlayerId::parse("xyz").unwrap_err());
        assert_eq!(err.client_message(), "Invalid \"account\" provided");
    }
}
