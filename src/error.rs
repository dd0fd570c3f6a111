//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the application.
//! It centralizes error management, providing a consistent way to handle and represent
//! the error conditions that can occur, from database issues to failed authentication.
//!
//! `AppError` implements `actix_web::error::ResponseError` so handlers and middleware can
//! return it directly. Authentication failures are deliberately coarse: every broken link
//! in the bearer-token chain becomes `AppError::Unauthenticated`, and every failed login
//! becomes `AppError::InvalidCredentials`, each with a fixed response body.

use actix_web::{
    error::{BlockingError, ResponseError},
    http::{header, StatusCode},
    HttpResponse,
};
use log::error;
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

/// Body returned for every failed identity resolution.
pub const UNAUTHENTICATED_MESSAGE: &str = "Invalid or expired authentication token";
/// Body returned for every failed login.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Incorrect email or password";
const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Represents all possible errors that can occur within the application.
#[derive(Debug)]
pub enum AppError {
    /// The bearer token chain failed somewhere (HTTP 401).
    /// Carries no detail on purpose.
    Unauthenticated,
    /// Email not found or password mismatch during login (HTTP 401).
    InvalidCredentials,
    /// Represents a client-side error due to a malformed or invalid request (HTTP 400).
    BadRequest(String),
    /// Represents a situation where a requested resource was not found (HTTP 404).
    NotFound(String),
    /// Represents an unexpected server-side error (HTTP 500).
    InternalServerError(String),
    /// Represents an error originating from database operations (HTTP 500).
    DatabaseError(String),
    /// Represents an error due to failed input validation (HTTP 422 Unprocessable Entity).
    ValidationError(String),
    /// Missing or invalid startup configuration.
    Config(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Unauthenticated => write!(f, "Unauthenticated: {}", UNAUTHENTICATED_MESSAGE),
            AppError::InvalidCredentials => {
                write!(f, "Invalid Credentials: {}", INVALID_CREDENTIALS_MESSAGE)
            }
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
            AppError::Config(msg) => write!(f, "Configuration Error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthenticated | AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::InternalServerError(_) | AppError::DatabaseError(_) | AppError::Config(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Unauthenticated => HttpResponse::Unauthorized()
                .insert_header((header::WWW_AUTHENTICATE, "Bearer"))
                .json(json!({ "error": UNAUTHENTICATED_MESSAGE })),
            AppError::InvalidCredentials => HttpResponse::Unauthorized()
                .insert_header((header::WWW_AUTHENTICATE, "Bearer"))
                .json(json!({ "error": INVALID_CREDENTIALS_MESSAGE })),
            AppError::BadRequest(msg) => HttpResponse::BadRequest().json(json!({
                "error": msg
            })),
            AppError::NotFound(msg) => HttpResponse::NotFound().json(json!({
                "error": msg
            })),
            AppError::ValidationError(msg) => HttpResponse::UnprocessableEntity().json(json!({
                "error": msg
            })),
            // Server-side details stay in the log.
            AppError::InternalServerError(msg)
            | AppError::DatabaseError(msg)
            | AppError::Config(msg) => {
                error!("{}", msg);
                HttpResponse::InternalServerError().json(json!({
                    "error": INTERNAL_ERROR_MESSAGE
                }))
            }
        }
    }
}

/// Converts `sqlx::Error` into `AppError`.
///
/// Specific cases like `sqlx::Error::RowNotFound` are mapped to `AppError::NotFound`,
/// while other database errors become `AppError::DatabaseError`.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match error {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            _ => AppError::DatabaseError(error.to_string()),
        }
    }
}

/// Converts `validator::ValidationErrors` into `AppError::ValidationError`.
///
/// The detailed validation messages are preserved.
impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::ValidationError(error.to_string())
    }
}

/// A `web::block` closure was cancelled or its thread pool is gone.
impl From<BlockingError> for AppError {
    fn from(error: BlockingError) -> AppError {
        AppError::InternalServerError(format!("Blocking task failed: {}", error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[test]
    fn test_error_responses() {
        let response = AppError::Unauthenticated.error_response();
        assert_eq!(response.status(), 401);

        let response = AppError::InvalidCredentials.error_response();
        assert_eq!(response.status(), 401);

        let response = AppError::BadRequest("Invalid input".into()).error_response();
        assert_eq!(response.status(), 400);

        let response = AppError::NotFound("Resource not found".into()).error_response();
        assert_eq!(response.status(), 404);

        let response = AppError::ValidationError("email: invalid".into()).error_response();
        assert_eq!(response.status(), 422);

        let response = AppError::InternalServerError("Server error".into()).error_response();
        assert_eq!(response.status(), 500);

        let response = AppError::DatabaseError("connection reset".into()).error_response();
        assert_eq!(response.status(), 500);
    }

    #[test]
    fn test_unauthorized_responses_challenge_bearer() {
        for error in [AppError::Unauthenticated, AppError::InvalidCredentials] {
            let response = error.error_response();
            let challenge = response
                .headers()
                .get(header::WWW_AUTHENTICATE)
                .and_then(|value| value.to_str().ok());
            assert_eq!(challenge, Some("Bearer"));
        }
    }

    #[actix_rt::test]
    async fn test_server_errors_hide_details() {
        let response =
            AppError::DatabaseError("password authentication failed for user".into())
                .error_response();
        let body = to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], INTERNAL_ERROR_MESSAGE);
    }

    #[actix_rt::test]
    async fn test_unauthenticated_body_is_fixed() {
        let body = to_bytes(AppError::Unauthenticated.error_response().into_body())
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], UNAUTHENTICATED_MESSAGE);
    }
}
