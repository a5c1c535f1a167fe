//! Converts rows read from SQLite into JSON-ready models.
//!
//! SQLite hands back amounts as `REAL`/`INTEGER` values and dates as
//! `YYYY-MM-DD` text. Models implementing [MapRow] read those into `f64` and
//! [Date] fields, and serialize dates back out as ISO-8601 strings via
//! `iso_date`.

use rusqlite::Row;
use time::{Date, macros::format_description};

/// A trait for mapping from a `rusqlite::Row` to a concrete rust type.
pub trait MapRow: Sized {
    /// Convert a row into a concrete type.
    ///
    /// **Note:** This function expects that the row contains the columns in
    /// the order listed by the query that produced it.
    ///
    /// # Errors
    /// Returns an error if a row item cannot be converted into the
    /// corresponding rust type, or if an invalid column index was used.
    fn map_row(row: &Row) -> Result<Self, rusqlite::Error>;
}

/// Format a single, possibly absent, row.
///
/// An absent row maps to `None` so that callers can drain a
/// [rusqlite::Rows] cursor with `while let Some(..)`.
///
/// # Errors
/// Returns an error if the row cannot be mapped, see [MapRow::map_row].
pub fn format_row<T: MapRow>(row: Option<&Row>) -> Result<Option<T>, rusqlite::Error> {
    row.map(T::map_row).transpose()
}

/// Parse an ISO-8601 calendar date, e.g. "2024-01-03".
pub fn parse_iso_date(text: &str) -> Result<Date, time::error::Parse> {
    Date::parse(text, format_description!("[year]-[month]-[day]"))
}

// Serde helpers for writing a [Date] as an ISO-8601 calendar date string.
time::serde::format_description!(pub iso_date, Date, "[year]-[month]-[day]");
