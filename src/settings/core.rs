//! The singleton settings row and its database queries.

use rusqlite::{Connection, Row, params_from_iter, types::Value};
use serde::{Deserialize, Serialize};

use crate::{
    database_id::DatabaseId,
    db::{DbError, WriteOutcome, execute_write, query_rows},
    row::MapRow,
};

/// The fixed key of the only row in the settings table.
pub const SETTINGS_ID: DatabaseId = 1;

/// The user's preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// The name to greet the user with.
    pub username: String,
    /// The symbol shown in front of amounts, e.g. "$".
    pub currency_symbol: String,
    /// How much the user plans to spend each month.
    pub monthly_budget: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            username: "User".to_owned(),
            currency_symbol: "$".to_owned(),
            monthly_budget: 0.0,
        }
    }
}

impl MapRow for Settings {
    fn map_row(row: &Row) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            username: row.get(0)?,
            currency_symbol: row.get(1)?,
            monthly_budget: row.get(2)?,
        })
    }
}

/// A partial update of [Settings], `None` fields are left unchanged.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SettingsUpdate {
    /// The new username.
    pub username: Option<String>,
    /// The new currency symbol.
    pub currency_symbol: Option<String>,
    /// The new monthly budget.
    pub monthly_budget: Option<f64>,
}

impl SettingsUpdate {
    /// Whether the update would not change any field.
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.currency_symbol.is_none() && self.monthly_budget.is_none()
    }

    /// Build the `UPDATE` statement and its positional parameters.
    ///
    /// Assignments are added in the order username, currency_symbol,
    /// monthly_budget, skipping fields that are `None`.
    pub(crate) fn to_statement(&self) -> (String, Vec<Value>) {
        let mut assignments = Vec::new();
        let mut params = Vec::new();

        let fields = [
            ("username", self.username.clone().map(Value::from)),
            (
                "currency_symbol",
                self.currency_symbol.clone().map(Value::from),
            ),
            ("monthly_budget", self.monthly_budget.map(Value::from)),
        ];

        for (column, value) in fields {
            if let Some(value) = value {
                params.push(value);
                assignments.push(format!("{column} = ?{}", params.len()));
            }
        }

        params.push(Value::from(SETTINGS_ID));
        let sql = format!(
            "UPDATE settings SET {} WHERE setting_id = ?{}",
            assignments.join(", "),
            params.len()
        );

        (sql, params)
    }
}

/// Retrieve the settings rows.
///
/// There is at most one row, an empty `Vec` means the settings have not been
/// created.
///
/// # Errors
/// This function will return a [DbError::QueryFailed] if there is an SQL error.
pub fn get_settings(connection: &Connection) -> Result<Vec<Settings>, DbError> {
    query_rows(
        connection,
        "SELECT username, currency_symbol, monthly_budget FROM settings WHERE setting_id = ?1",
        (SETTINGS_ID,),
    )
}

/// Apply `update` to the settings row.
///
/// An empty update does not touch the database and affects zero rows.
///
/// # Errors
/// This function will return a:
/// - [DbError::ConstraintViolated] if a column constraint rejects a value,
/// - or [DbError::QueryFailed] if there is some other SQL error.
pub fn update_settings(
    update: &SettingsUpdate,
    connection: &Connection,
) -> Result<WriteOutcome, DbError> {
    if update.is_empty() {
        return Ok(WriteOutcome {
            rows_affected: 0,
            last_insert_id: None,
        });
    }

    let (sql, params) = update.to_statement();

    execute_write(connection, &sql, params_from_iter(params))
}

/// Create the settings table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_settings_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS settings (
                setting_id INTEGER PRIMARY KEY CHECK (setting_id = 1),
                username TEXT NOT NULL,
                currency_symbol TEXT NOT NULL,
                monthly_budget REAL NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Insert the settings row with `defaults` unless it already exists.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn seed_settings(defaults: &Settings, connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "INSERT OR IGNORE INTO settings (setting_id, username, currency_symbol, monthly_budget)
         VALUES (?1, ?2, ?3, ?4)",
        (
            SETTINGS_ID,
            &defaults.username,
            &defaults.currency_symbol,
            defaults.monthly_budget,
        ),
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use rusqlite::{Connection, types::Value};

    use crate::{
        db::initialize,
        settings::{Settings, SettingsUpdate, get_settings, seed_settings, update_settings},
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn, &Settings::default()).unwrap();
        conn
    }

    #[test]
    fn initialize_seeds_default_settings() {
        let conn = get_test_connection();

        assert_eq!(get_settings(&conn), Ok(vec![Settings::default()]));
    }

    #[test]
    fn seeding_keeps_existing_settings() {
        let conn = get_test_connection();
        let other = Settings {
            username: "Bob".to_owned(),
            currency_symbol: "€".to_owned(),
            monthly_budget: 10.0,
        };

        seed_settings(&other, &conn).unwrap();

        assert_eq!(get_settings(&conn), Ok(vec![Settings::default()]));
    }

    #[test]
    fn missing_row_returns_no_settings() {
        let conn = get_test_connection();
        conn.execute("DELETE FROM settings", ()).unwrap();

        assert_eq!(get_settings(&conn), Ok(vec![]));
    }

    #[test]
    fn statement_only_assigns_given_fields() {
        let update = SettingsUpdate {
            username: Some("Alice".to_owned()),
            currency_symbol: None,
            monthly_budget: Some(1500.0),
        };

        let (sql, params) = update.to_statement();

        assert_eq!(
            sql,
            "UPDATE settings SET username = ?1, monthly_budget = ?2 WHERE setting_id = ?3"
        );
        assert_eq!(
            params,
            vec![
                Value::Text("Alice".to_owned()),
                Value::Real(1500.0),
                Value::Integer(1)
            ]
        );
    }

    #[test]
    fn update_changes_only_given_fields() {
        let conn = get_test_connection();
        let update = SettingsUpdate {
            currency_symbol: Some("£".to_owned()),
            ..Default::default()
        };

        let outcome = update_settings(&update, &conn).unwrap();

        assert_eq!(outcome.rows_affected, 1);
        assert_eq!(
            get_settings(&conn),
            Ok(vec![Settings {
                currency_symbol: "£".to_owned(),
                ..Settings::default()
            }])
        );
    }

    #[test]
    fn empty_update_is_a_no_op() {
        let conn = get_test_connection();

        let outcome = update_settings(&SettingsUpdate::default(), &conn).unwrap();

        assert_eq!(outcome.rows_affected, 0);
        assert_eq!(get_settings(&conn), Ok(vec![Settings::default()]));
    }
}
