//! Statements over the `pilots` table.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::Result;
use crate::model::Pilot;

use super::encode_timestamp;

/// Insert a pilot and return its generated id.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn insert(conn: &Connection, first_name: &str, last_name: &str, flight_hours: u32) -> Result<i64> {
    conn.execute(
        "INSERT INTO pilots (first_name, last_name, flight_hours) VALUES (?1, ?2, ?3)",
        params![first_name, last_name, flight_hours],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Look up a pilot by id.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn get(conn: &Connection, id: i64) -> Result<Option<Pilot>> {
    let pilot = conn
        .query_row(
            "SELECT id, first_name, last_name, flight_hours FROM pilots WHERE id = ?1",
            [id],
            row_to_pilot,
        )
        .optional()?;
    Ok(pilot)
}

/// All pilots ordered by id.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn list(conn: &Connection) -> Result<Vec<Pilot>> {
    let mut stmt =
        conn.prepare("SELECT id, first_name, last_name, flight_hours FROM pilots ORDER BY id")?;
    let pilots = stmt
        .query_map([], row_to_pilot)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(pilots)
}

/// Add `hours` to a pilot's accumulated flight hours.
///
/// Returns `false` if no such pilot exists.
///
/// # Errors
///
/// Returns an error if the database operation fails, including when the new
/// total would not fit in a `u32`.
pub fn add_flight_hours(conn: &Connection, id: i64, hours: u32) -> Result<bool> {
    let affected = conn.execute(
        "UPDATE pilots SET flight_hours = flight_hours + ?1 WHERE id = ?2",
        params![hours, id],
    )?;
    Ok(affected > 0)
}

/// Pilots not committed to any flight other than `flight_id` that conflicts
/// with the padded window `[window_start, window_end]`.
///
/// Another flight conflicts when its scheduled departure falls inside the
/// window, or when its own scheduled span overlaps the window. Flights
/// without a pilot never block anyone.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn available_for_window(
    conn: &Connection,
    flight_id: i64,
    window_start: &DateTime<Utc>,
    window_end: &DateTime<Utc>,
) -> Result<Vec<Pilot>> {
    let mut stmt = conn.prepare(
        r"
        SELECT p.id, p.first_name, p.last_name, p.flight_hours
        FROM pilots AS p
        WHERE p.id NOT IN (
            SELECT o.pilot_id FROM flights AS o
            WHERE o.pilot_id IS NOT NULL
              AND o.id <> ?1
              AND (
                  o.scheduled_departure BETWEEN ?2 AND ?3
                  OR (o.scheduled_departure <= ?3 AND o.expected_arrival >= ?2)
              )
        )
        ORDER BY p.id
        ",
    )?;

    let pilots = stmt
        .query_map(
            params![
                flight_id,
                encode_timestamp(window_start),
                encode_timestamp(window_end)
            ],
            row_to_pilot,
        )?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(pilots)
}

fn row_to_pilot(row: &Row<'_>) -> rusqlite::Result<Pilot> {
    Ok(Pilot {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        flight_hours: row.get(3)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Storage;

    #[test]
    fn test_insert_and_get() {
        let storage = Storage::open_in_memory().unwrap();
        let conn = storage.connection();
        let id = insert(conn, "Amelia", "Earhart", 120).unwrap();

        let pilot = get(conn, id).unwrap().unwrap();
        assert_eq!(pilot.first_name, "Amelia");
        assert_eq!(pilot.last_name, "Earhart");
        assert_eq!(pilot.flight_hours, 120);
    }

    #[test]
    fn test_get_nonexistent() {
        let storage = Storage::open_in_memory().unwrap();
        assert!(get(storage.connection(), 99).unwrap().is_none());
    }

    #[test]
    fn test_list_in_id_order() {
        let storage = Storage::open_in_memory().unwrap();
        let conn = storage.connection();
        let first = insert(conn, "Chuck", "Yeager", 0).unwrap();
        let second = insert(conn, "Bessie", "Coleman", 0).unwrap();

        let ids: Vec<i64> = list(conn).unwrap().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![first, second]);
    }

    #[test]
    fn test_add_flight_hours() {
        let storage = Storage::open_in_memory().unwrap();
        let conn = storage.connection();
        let id = insert(conn, "Amelia", "Earhart", 10).unwrap();

        assert!(add_flight_hours(conn, id, 5).unwrap());
        assert_eq!(get(conn, id).unwrap().unwrap().flight_hours, 15);
        assert!(!add_flight_hours(conn, id + 100, 5).unwrap());
    }

    #[test]
    fn test_add_flight_hours_rejects_total_past_u32() {
        let storage = Storage::open_in_memory().unwrap();
        let conn = storage.connection();
        let id = insert(conn, "Amelia", "Earhart", u32::MAX - 1).unwrap();

        assert!(add_flight_hours(conn, id, 2).is_err());
        assert_eq!(get(conn, id).unwrap().unwrap().flight_hours, u32::MAX - 1);
        assert!(add_flight_hours(conn, id, 1).unwrap());
        assert_eq!(list(conn).unwrap()[0].flight_hours, u32::MAX);
    }
}
