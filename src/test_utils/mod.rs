//! Helpers shared by the route handler tests.

use std::time::Duration;

use axum_test::TestServer;

use crate::{
    AppState, build_router,
    db::{SqliteConnectionManager, create_pool},
    settings::Settings,
};

/// Create an [AppState] backed by a fresh in-memory database.
///
/// The pool holds a single connection so that every handler sees the same
/// in-memory database.
pub(crate) fn get_test_state() -> AppState {
    let db_pool = create_pool(SqliteConnectionManager::Memory, 1, Duration::from_secs(5))
        .expect("Could not create database pool");

    AppState::new(db_pool, &Settings::default()).expect("Could not initialize database")
}

/// Create a test server that serves the full router with `state`.
pub(crate) fn get_test_server(state: AppState) -> TestServer {
    TestServer::try_new(build_router(state)).expect("Could not create test server.")
}
