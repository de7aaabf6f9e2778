use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::notice::NoticeRedirect;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Internal Server Error: {0}")]
    Internal(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Conflict: {0}")]
    Conflict(String),
}

impl AppError {
    /// The message shown to the user, without the variant prefix.
    pub fn message(&self) -> &str {
        match self {
            AppError::Auth(msg)
            | AppError::Forbidden(msg)
            | AppError::NotFound(msg)
            | AppError::BadRequest(msg)
            | AppError::Internal(msg)
            | AppError::Database(msg)
            | AppError::ValidationError(msg)
            | AppError::Conflict(msg) => msg,
        }
    }

    /// Errors the user can act on are reported as a notice, everything else
    /// is an opaque server failure.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, AppError::Internal(_) | AppError::Database(_))
    }

    /// Turns the error into a redirect to `location` carrying the message,
    /// or into a plain error response when it is not recoverable.
    pub fn redirect(self, location: &str) -> Response {
        if self.is_recoverable() {
            tracing::warn!("Request rejected: {}", self);
            NoticeRedirect::error(location, self.message()).into_response()
        } else {
            self.into_response()
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Auth(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            AppError::Database(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
        };

        tracing::error!("Error: {}: {}", status, message);

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::LOCATION;

    #[test]
    fn test_recoverable_errors_redirect_with_notice() {
        let response = AppError::NotFound("Doctor not found.".to_string())
            .redirect("/admin-dashboard");

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let location = response.headers().get(LOCATION).unwrap().to_str().unwrap();
        assert_eq!(
            location,
            "/admin-dashboard?notice=Doctor%20not%20found.&level=error"
        );
    }

    #[test]
    fn test_database_errors_are_not_redirected() {
        let response = AppError::Database("disk I/O error".to_string()).redirect("/register");
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
