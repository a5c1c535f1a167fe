//! Budgie is a REST API for tracking personal income and expenses.
//!
//! The server keeps a ledger of transactions and a single settings record in
//! a SQLite database and serves both as JSON under `/api`.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod amount;
mod app_state;
mod config;
mod database_id;
pub mod db;
pub mod endpoints;
mod health;
mod logging;
mod not_found;
mod response;
mod routing;
mod row;
pub mod settings;
pub mod transaction;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use config::Config;
pub use database_id::{DatabaseId, TransactionId};
pub use db::{DbError, DbPool, SqliteConnectionManager, create_pool, initialize as initialize_db};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use response::{ApiError, ErrorBody, MessageBody};
pub use routing::{add_tracing_layer, build_router};
pub use settings::Settings;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!("failed to install signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may stop the server from starting or running.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The database could not be opened or initialized.
    #[error("database error: {0}")]
    Database(#[from] DbError),

    /// The log file could not be opened or the listener failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
