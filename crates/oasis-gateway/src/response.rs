//! Standard response envelope.
//!
//! Every endpoint answers `{"success": true, "data": …}` or
//! `{"success": false, "error": "…"}` with a conventional status code.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;
use tracing::error;

/// 200 with the success envelope.
pub fn success<T: Serialize>(data: T) -> Response {
    (StatusCode::OK, Json(json!({ "success": true, "data": data }))).into_response()
}

/// 201 with the success envelope.
pub fn created<T: Serialize>(data: T) -> Response {
    (StatusCode::CREATED, Json(json!({ "success": true, "data": data }))).into_response()
}

/// Error half of the envelope. Handlers return `Result<Response, ApiError>`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::FORBIDDEN,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(json!({ "success": false, "error": self.message })),
        )
            .into_response()
    }
}

impl From<oasis_users::UserError> for ApiError {
    fn from(e: oasis_users::UserError) -> Self {
        use oasis_users::UserError;
        match e {
            UserError::NotFound(_) => ApiError::not_found("User not found"),
            UserError::EmailTaken(_) => ApiError::bad_request("Email already registered"),
            UserError::InvalidCredentials => ApiError::unauthorized("Invalid email or password"),
            UserError::Hash(msg) => {
                error!(error = %msg, "password hashing failed");
                ApiError::internal("Internal server error")
            }
            UserError::Database(db) => {
                error!(error = %db, "user store failure");
                ApiError::internal("Internal server error")
            }
        }
    }
}

impl From<oasis_habits::HabitError> for ApiError {
    fn from(e: oasis_habits::HabitError) -> Self {
        use oasis_habits::HabitError;
        match e {
            HabitError::NotFound(_) => ApiError::not_found("Habit not found"),
            HabitError::CategoryNotFound(_) => {
                ApiError::not_found("Category not found or not yours")
            }
            HabitError::CategoryInUse(_) => {
                ApiError::bad_request("Cannot delete a category that still has habits")
            }
            HabitError::Database(db) => {
                error!(error = %db, "habit store failure");
                ApiError::internal("Internal server error")
            }
        }
    }
}

impl From<oasis_journal::JournalError> for ApiError {
    fn from(e: oasis_journal::JournalError) -> Self {
        use oasis_journal::JournalError;
        match e {
            JournalError::NotFound(_) => ApiError::not_found("Journal entry not found"),
            JournalError::Database(db) => {
                error!(error = %db, "journal store failure");
                ApiError::internal("Internal server error")
            }
        }
    }
}
