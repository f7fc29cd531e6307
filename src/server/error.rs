use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::core::auth::AuthError;
use crate::core::spending::report::ReportError;

const GENERIC_MESSAGE: &str = "Internal server error";

/// Renders as a JSON `{"error": "..."}` response with the matching status code.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Unauthorized(AuthError),
    #[error("{0}")]
    Forbidden(AuthError),
    /// Upstream failure; the message is passed through when non-empty
    #[error("{0}")]
    Upstream(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match self {
            Self::Unauthorized(e) | Self::Forbidden(e) => e.to_string(),
            Self::Upstream(msg) if msg.trim().is_empty() => GENERIC_MESSAGE.to_string(),
            Self::Upstream(msg) => msg.clone(),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::NotAdmin => Self::Forbidden(e),
            AuthError::MissingToken | AuthError::InvalidToken => Self::Unauthorized(e),
        }
    }
}

impl From<ReportError> for ApiError {
    fn from(e: ReportError) -> Self {
        error!("Credit history failed: {}", e);
        Self::Upstream(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.message() }))).into_response()
    }
}
