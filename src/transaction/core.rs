//! Defines the core data models and database queries for transactions.

use std::{fmt, str::FromStr};

use rusqlite::{
    Connection, Row, ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    database_id::TransactionId,
    db::{DbError, WriteOutcome, execute_write, query_rows},
    row::{MapRow, iso_date},
};

// ============================================================================
// MODELS
// ============================================================================

/// Whether money was earned or spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money earned, e.g. a salary payment.
    Income,
    /// Money spent, e.g. groceries.
    Expense,
}

impl TransactionKind {
    /// The name stored in the database and used in JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The text was not the name of a [TransactionKind].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("\"{0}\" is not a valid transaction type, expected \"income\" or \"expense\"")]
pub struct InvalidTransactionKind(pub String);

impl FromStr for TransactionKind {
    type Err = InvalidTransactionKind;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            other => Err(InvalidTransactionKind(other.to_owned())),
        }
    }
}

impl ToSql for TransactionKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// Whether the transaction is an income or an expense.
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// What the money was for, e.g. "Groceries".
    pub category: String,
    /// The amount of money spent or earned.
    pub amount: f64,
    /// Free-form text describing the transaction.
    pub note: Option<String>,
    /// When the transaction happened.
    #[serde(with = "iso_date")]
    pub transaction_date: Date,
}

/// A validated transaction that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// Whether the transaction is an income or an expense.
    pub kind: TransactionKind,
    /// What the money was for.
    pub category: String,
    /// The amount of money spent or earned.
    pub amount: f64,
    /// Free-form text describing the transaction.
    pub note: Option<String>,
    /// When the transaction happened.
    pub transaction_date: Date,
}

impl MapRow for Transaction {
    fn map_row(row: &Row) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get(0)?,
            kind: row.get(1)?,
            category: row.get(2)?,
            amount: row.get(3)?,
            note: row.get(4)?,
            transaction_date: row.get(5)?,
        })
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

const SELECT_TRANSACTION: &str =
    "SELECT id, type, category, amount, note, transaction_date FROM \"transaction\"";

/// Insert `transaction` into the database.
///
/// The new row's ID is in [WriteOutcome::last_insert_id].
///
/// # Errors
/// This function will return a:
/// - [DbError::ConstraintViolated] if a column constraint rejects a value,
/// - or [DbError::QueryFailed] if there is some other SQL error.
pub fn create_transaction(
    transaction: &NewTransaction,
    connection: &Connection,
) -> Result<WriteOutcome, DbError> {
    execute_write(
        connection,
        "INSERT INTO \"transaction\" (type, category, amount, note, transaction_date)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        (
            transaction.kind,
            &transaction.category,
            transaction.amount,
            &transaction.note,
            transaction.transaction_date,
        ),
    )
}

/// Retrieve the transactions with the ID `id`.
///
/// There is at most one, an empty `Vec` means the ID does not exist.
///
/// # Errors
/// This function will return a [DbError::QueryFailed] if there is an SQL error.
pub fn get_transactions_by_id(
    id: TransactionId,
    connection: &Connection,
) -> Result<Vec<Transaction>, DbError> {
    query_rows(
        connection,
        &format!("{SELECT_TRANSACTION} WHERE id = ?1"),
        (id,),
    )
}

/// Retrieve every transaction, most recent first.
///
/// Transactions are ordered by date, and transactions on the same date by
/// when they were created.
///
/// # Errors
/// This function will return a [DbError::QueryFailed] if there is an SQL error.
pub fn list_transactions(connection: &Connection) -> Result<Vec<Transaction>, DbError> {
    query_rows(
        connection,
        &format!("{SELECT_TRANSACTION} ORDER BY transaction_date DESC, created_at DESC, id DESC"),
        [],
    )
}

/// Delete the transaction with the ID `id`.
///
/// Deleting an ID that does not exist is not an error, the outcome reports
/// zero rows affected.
///
/// # Errors
/// This function will return a [DbError::QueryFailed] if there is an SQL error.
pub fn delete_transaction(
    id: TransactionId,
    connection: &Connection,
) -> Result<WriteOutcome, DbError> {
    execute_write(connection, "DELETE FROM \"transaction\" WHERE id = ?1", (id,))
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                type TEXT NOT NULL CHECK (type IN ('income', 'expense')),
                category TEXT NOT NULL,
                amount REAL NOT NULL,
                note TEXT,
                transaction_date TEXT NOT NULL,
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
                )",
        (),
    )?;

    // Used by the listing order.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_date_created ON \"transaction\"(transaction_date, created_at);",
        (),
    )?;

    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
