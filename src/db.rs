//! Connection pooling, schema set up and the query executors used by the
//! route handlers.
//!
//! Every request checks out at most one [DbConnection] from the [DbPool] and
//! hands it to [query_rows] and [execute_write]. The connection goes back to
//! the pool when it is dropped, on every exit path.

use std::{path::PathBuf, time::Duration};

use r2d2::ManageConnection;
use rusqlite::{Connection, ErrorCode, Params};

use crate::{
    database_id::DatabaseId,
    row::{MapRow, format_row},
    settings::{Settings, create_settings_table, seed_settings},
    transaction::create_transaction_table,
};

/// A pool of SQLite connections.
pub type DbPool = r2d2::Pool<SqliteConnectionManager>;

/// A connection checked out from a [DbPool].
pub type DbConnection = r2d2::PooledConnection<SqliteConnectionManager>;

/// Errors originating from operations on the app's database.
#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum DbError {
    /// A connection could not be opened or checked out of the pool in time.
    #[error("could not connect to the database: {0}")]
    ConnectionFailed(String),

    /// A `CHECK`, `NOT NULL`, `UNIQUE` or other constraint rejected a write.
    #[error("a database constraint was violated: {0}")]
    ConstraintViolated(String),

    /// Any other error that occurred while preparing or running a statement.
    #[error("the query failed: {0}")]
    QueryFailed(String),
}

impl From<rusqlite::Error> for DbError {
    fn from(error: rusqlite::Error) -> Self {
        match error {
            rusqlite::Error::SqliteFailure(ref sql_error, _)
                if sql_error.code == ErrorCode::ConstraintViolation =>
            {
                DbError::ConstraintViolated(error.to_string())
            }
            rusqlite::Error::SqliteFailure(ref sql_error, _)
                if matches!(
                    sql_error.code,
                    ErrorCode::CannotOpen | ErrorCode::NotADatabase | ErrorCode::PermissionDenied
                ) =>
            {
                DbError::ConnectionFailed(error.to_string())
            }
            error => DbError::QueryFailed(error.to_string()),
        }
    }
}

impl From<r2d2::Error> for DbError {
    fn from(error: r2d2::Error) -> Self {
        DbError::ConnectionFailed(error.to_string())
    }
}

/// Opens SQLite connections for a [DbPool].
#[derive(Debug, Clone, PartialEq)]
pub enum SqliteConnectionManager {
    /// Connections to a database file, created if it does not exist.
    File(PathBuf),
    /// A private in-memory database per connection.
    ///
    /// Only useful with a pool of size one, e.g. in tests.
    Memory,
}

impl ManageConnection for SqliteConnectionManager {
    type Connection = Connection;
    type Error = rusqlite::Error;

    fn connect(&self) -> Result<Connection, rusqlite::Error> {
        let connection = match self {
            SqliteConnectionManager::File(path) => Connection::open(path)?,
            SqliteConnectionManager::Memory => Connection::open_in_memory()?,
        };

        connection.busy_timeout(Duration::from_secs(5))?;

        Ok(connection)
    }

    fn is_valid(&self, connection: &mut Connection) -> Result<(), rusqlite::Error> {
        connection.query_row("SELECT 1", [], |_| Ok(()))
    }

    fn has_broken(&self, _connection: &mut Connection) -> bool {
        false
    }
}

/// Create a pool of at most `max_size` connections using `manager`.
///
/// Checking out a connection waits at most `connection_timeout` before
/// failing with [DbError::ConnectionFailed].
///
/// # Errors
/// Returns an error if the initial connections cannot be opened.
pub fn create_pool(
    manager: SqliteConnectionManager,
    max_size: u32,
    connection_timeout: Duration,
) -> Result<DbPool, DbError> {
    r2d2::Pool::builder()
        .max_size(max_size)
        .connection_timeout(connection_timeout)
        .build(manager)
        .map_err(DbError::from)
}

/// Check out a connection from `pool`.
///
/// # Errors
/// Returns [DbError::ConnectionFailed] if no connection became available
/// before the pool's timeout.
pub fn acquire(pool: &DbPool) -> Result<DbConnection, DbError> {
    pool.get().map_err(DbError::from)
}

/// Check whether a connection can be checked out of `pool` and used.
///
/// # Errors
/// Returns an error if a connection cannot be acquired or a trivial query fails.
pub fn check_connection(pool: &DbPool) -> Result<(), DbError> {
    let connection = acquire(pool)?;
    connection.query_row("SELECT 1", [], |_| Ok(()))?;

    Ok(())
}

/// Run a read query with positionally bound `params` and map every row.
///
/// An empty result is `Ok(vec![])`, never an error.
///
/// # Errors
/// Returns [DbError::QueryFailed] if the query cannot be prepared or run, or
/// if a row cannot be mapped to `T`.
pub fn query_rows<T: MapRow, P: Params>(
    connection: &Connection,
    sql: &str,
    params: P,
) -> Result<Vec<T>, DbError> {
    let mut statement = connection.prepare(sql)?;
    let mut rows = statement.query(params)?;
    let mut records = Vec::new();

    while let Some(record) = format_row::<T>(rows.next()?)? {
        records.push(record);
    }

    Ok(records)
}

/// The result of a successful [execute_write].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOutcome {
    /// The number of rows inserted, updated or deleted.
    pub rows_affected: usize,
    /// The ID of the most recently inserted row on this connection.
    ///
    /// Only meaningful for `INSERT` statements.
    pub last_insert_id: Option<DatabaseId>,
}

/// Run a single write statement with positionally bound `params` in its own
/// transaction.
///
/// The transaction is committed on success. If the statement fails the
/// transaction is rolled back before the error is returned.
///
/// # Errors
/// Returns [DbError::ConstraintViolated] if the write breaks a table
/// constraint, otherwise [DbError::QueryFailed].
pub fn execute_write<P: Params>(
    connection: &Connection,
    sql: &str,
    params: P,
) -> Result<WriteOutcome, DbError> {
    let transaction = connection.unchecked_transaction()?;

    // Dropping `transaction` on the error path rolls it back.
    let rows_affected = transaction.execute(sql, params)?;
    let last_insert_id = match transaction.last_insert_rowid() {
        0 => None,
        id => Some(id),
    };

    transaction.commit()?;

    Ok(WriteOutcome {
        rows_affected,
        last_insert_id,
    })
}

/// Create the app's tables and the settings row if they do not exist.
///
/// An existing settings row is left untouched, `default_settings` is only used
/// for a fresh database.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn initialize(connection: &Connection, default_settings: &Settings) -> Result<(), DbError> {
    let transaction = connection.unchecked_transaction()?;

    create_transaction_table(&transaction)?;
    create_settings_table(&transaction)?;
    seed_settings(default_settings, &transaction)?;

    transaction.commit()?;

    Ok(())
}
