//! Transaction management for the budgeting application.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and its database queries
//! - The route handlers for listing, creating and deleting transactions

mod core;
mod create_endpoint;
mod delete_endpoint;
mod list_endpoint;

pub use core::{
    InvalidTransactionKind, NewTransaction, Transaction, TransactionKind, create_transaction,
    create_transaction_table, delete_transaction, get_transactions_by_id, list_transactions,
};
pub use create_endpoint::{TransactionRequest, create_transaction_endpoint};
pub use delete_endpoint::delete_transaction_endpoint;
pub use list_endpoint::list_transactions_endpoint;

use axum::extract::FromRef;

use crate::{AppState, db::DbPool};

/// The state needed by the transaction route handlers.
#[derive(Debug, Clone)]
pub struct TransactionState {
    /// The pool to check database connections out of.
    pub db_pool: DbPool,
}

impl FromRef<AppState> for TransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_pool: state.db_pool.clone(),
        }
    }
}
