//! A greeting endpoint that reports whether the database is reachable.

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::Response,
};

use crate::{
    AppState,
    db::{DbPool, check_connection},
    response::message_response,
};

const GREETING: &str = "Hello from Budgie Backend!";

/// The state needed to check the database connection.
#[derive(Debug, Clone)]
pub struct HealthState {
    /// The pool to check a database connection out of.
    pub db_pool: DbPool,
}

impl FromRef<AppState> for HealthState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_pool: state.db_pool.clone(),
        }
    }
}

/// A route handler that always responds with 200 OK.
///
/// Whether a database connection could be made is only reported in the
/// message text.
pub async fn get_hello(State(state): State<HealthState>) -> Response {
    let message = match check_connection(&state.db_pool) {
        Ok(()) => format!("{GREETING} DB Connected!"),
        Err(error) => {
            tracing::error!("health check failed: {error}");
            format!("{GREETING} DB FAILED!")
        }
    };

    message_response(StatusCode::OK, message)
}
