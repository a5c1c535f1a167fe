//! Implements a struct that holds the state of the REST server.

use crate::{
    db::{DbError, DbPool, acquire, initialize},
    settings::Settings,
};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The pool that route handlers check database connections out of.
    pub db_pool: DbPool,
}

impl AppState {
    /// Create a new [AppState] with a pool of SQLite connections.
    ///
    /// This function will initialize the database by adding the tables for
    /// the domain models, and the settings row from `default_settings` if it
    /// does not exist yet.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(db_pool: DbPool, default_settings: &Settings) -> Result<Self, DbError> {
        initialize(&*acquire(&db_pool)?, default_settings)?;

        Ok(Self { db_pool })
    }
}
