use axum::response::{IntoResponse, Response};

use crate::response::ApiError;

/// The fallback route handler for paths that do not match any route.
pub async fn get_404_not_found() -> Response {
    ApiError::not_found("Not found").into_response()
}
