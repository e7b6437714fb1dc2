//! Error types for the Auth API service.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use vigil_auth_core::{AuthError, ErrorKind};

/// API error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

/// API error type
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("missing bearer token")]
    MissingBearer,

    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingBearer => StatusCode::UNAUTHORIZED,
            Self::Auth(e) => match e.kind() {
                ErrorKind::Input => StatusCode::BAD_REQUEST,
                ErrorKind::Conflict => StatusCode::CONFLICT,
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::Security => StatusCode::UNAUTHORIZED,
                ErrorKind::Infrastructure => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingBearer => "MISSING_BEARER",
            Self::Auth(e) => match e.kind() {
                ErrorKind::Input => "INVALID_INPUT",
                ErrorKind::Conflict => "CONFLICT",
                ErrorKind::NotFound => "NOT_FOUND",
                ErrorKind::Security => "ACCESS_DENIED",
                ErrorKind::Infrastructure => "INTERNAL_ERROR",
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code();

        // Outages are logged here; denials are already logged in the core.
        if matches!(&self, Self::Auth(e) if e.kind() == ErrorKind::Infrastructure) {
            tracing::error!(error = ?self, "Internal API error");
        }

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
