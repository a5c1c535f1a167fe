//! JSON response bodies shared by the route handlers.
//!
//! Errors are sent as `{"error": "..."}` and informational replies as
//! `{"message": "..."}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::db::DbError;

/// The body of an error response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// A short description of what went wrong.
    pub error: String,
}

/// The body of a response that carries a message instead of a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageBody {
    /// The message for the client.
    pub message: String,
}

/// An error response with a status code and a JSON [ErrorBody].
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    /// Create an error response with an arbitrary `status`.
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// 400 Bad Request.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// 404 Not Found.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// 500 Internal Server Error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// A 500 response for a failed database operation.
    ///
    /// `message` is sent to the client as-is, the details of `error` are only
    /// logged.
    pub fn from_db_error(error: &DbError, message: impl Into<String>) -> Self {
        match error {
            DbError::ConnectionFailed(_) => tracing::error!("database unavailable: {error}"),
            DbError::ConstraintViolated(_) => {
                tracing::error!("write rejected by the database: {error}")
            }
            DbError::QueryFailed(_) => tracing::error!("{error}"),
        }

        Self::internal(message)
    }

    /// The HTTP status of the response.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// The message sent to the client.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}

/// A JSON [MessageBody] response.
pub fn message_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(MessageBody {
            message: message.into(),
        }),
    )
        .into_response()
}
