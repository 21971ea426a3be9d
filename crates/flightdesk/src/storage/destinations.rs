//! Statements over the `destinations` table.

use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::Result;
use crate::model::Destination;

/// Insert a destination.
///
/// # Errors
///
/// Returns an error if the statement fails, including on a duplicate code.
pub fn insert(conn: &Connection, destination: &Destination) -> Result<()> {
    conn.execute(
        "INSERT INTO destinations (short_code, full_name) VALUES (?1, ?2)",
        params![destination.short_code, destination.full_name],
    )?;
    Ok(())
}

/// Look up a destination by short code.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn get(conn: &Connection, short_code: &str) -> Result<Option<Destination>> {
    let destination = conn
        .query_row(
            "SELECT short_code, full_name FROM destinations WHERE short_code = ?1",
            [short_code],
            row_to_destination,
        )
        .optional()?;
    Ok(destination)
}

/// Check whether a short code is registered.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn exists(conn: &Connection, short_code: &str) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM destinations WHERE short_code = ?1",
        [short_code],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// All destinations ordered by short code.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn list(conn: &Connection) -> Result<Vec<Destination>> {
    let mut stmt =
        conn.prepare("SELECT short_code, full_name FROM destinations ORDER BY short_code")?;
    let destinations = stmt
        .query_map([], row_to_destination)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(destinations)
}

fn row_to_destination(row: &Row<'_>) -> rusqlite::Result<Destination> {
    Ok(Destination {
        short_code: row.get(0)?,
        full_name: row.get(1)?,
    })
}
