//! Middleware for logging requests and responses.

use axum::{
    body::{Body, Bytes, to_bytes},
    extract::Request,
    http::{request, response},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::response::ApiError;

/// The number of characters of a body that are logged at the `info` level.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If a body is longer than [LOG_BODY_LENGTH_LIMIT] characters, it is
/// truncated and the full body is logged at the `debug` level.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let body = match to_bytes(body, usize::MAX).await {
        Ok(body) => body,
        Err(error) => {
            tracing::error!("could not read request body: {error}");
            return ApiError::bad_request("Could not read request body").into_response();
        }
    };

    log_request(&parts, &body);

    let response = next.run(Request::from_parts(parts, Body::from(body))).await;

    let (parts, body) = response.into_parts();
    let body = match to_bytes(body, usize::MAX).await {
        Ok(body) => body,
        Err(error) => {
            tracing::error!("could not read response body: {error}");
            return ApiError::internal("Could not read response body").into_response();
        }
    };

    log_response(&parts, &body);

    Response::from_parts(parts, Body::from(body))
}

/// Split `body` into the text logged at the `info` level and whether it was
/// truncated.
fn truncate_body(body: &str) -> (&str, bool) {
    match body.char_indices().nth(LOG_BODY_LENGTH_LIMIT) {
        Some((end, _)) => (&body[..end], true),
        None => (body, false),
    }
}

fn log_request(parts: &request::Parts, body: &Bytes) {
    let body = String::from_utf8_lossy(body);
    let (method, uri) = (&parts.method, &parts.uri);

    tracing::debug!("Request headers: {:#?}", parts.headers);

    match truncate_body(&body) {
        (text, true) => {
            tracing::info!("Received request: {method} {uri}\nbody: {text}...");
            tracing::debug!("Full request body: {body:?}");
        }
        (text, false) => tracing::info!("Received request: {method} {uri}\nbody: {text:?}"),
    }
}

fn log_response(parts: &response::Parts, body: &Bytes) {
    let body = String::from_utf8_lossy(body);
    let status = parts.status;

    match truncate_body(&body) {
        (text, true) => {
            tracing::info!("Sending response: {status}\nbody: {text}...");
            tracing::debug!("Full response body: {body:?}");
        }
        (text, false) => tracing::info!("Sending response: {status}\nbody: {text:?}"),
    }
}
