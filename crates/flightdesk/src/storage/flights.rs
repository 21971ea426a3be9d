//! Statements over the `flights` table.
//!
//! Listing queries share one joined `SELECT` and differ only in a fixed
//! `WHERE` predicate; optional search criteria are bound as nullable
//! parameters rather than spliced into the SQL text.

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Params, Row};

use crate::error::Result;
use crate::model::{Flight, FlightFilter, FlightStatus, FlightView, NewFlight};

use super::{decode_optional_timestamp, decode_timestamp, encode_timestamp};

const SELECT_FLIGHT: &str = r"
SELECT id, status, scheduled_departure, expected_arrival, actual_departure,
       actual_arrival, from_destination, to_destination, pilot_id
FROM flights
";

const SELECT_VIEW: &str = r"
SELECT f.id, f.status, f.scheduled_departure, f.expected_arrival,
       f.actual_departure, f.actual_arrival, f.pilot_id,
       p.first_name || ' ' || p.last_name,
       f.from_destination, d1.full_name, f.to_destination, d2.full_name
FROM flights AS f
LEFT JOIN pilots AS p ON p.id = f.pilot_id
JOIN destinations AS d1 ON d1.short_code = f.from_destination
JOIN destinations AS d2 ON d2.short_code = f.to_destination
";

const MATCH_ALL: &str = "1 = 1";

const MATCH_FILTER: &str = r"
    (?1 IS NULL OR f.status = ?1)
    AND (?2 IS NULL OR date(f.scheduled_departure) = ?2)
    AND (?3 IS NULL OR f.pilot_id = ?3)
    AND (?4 IS NULL OR f.from_destination = ?4)
    AND (?5 IS NULL OR f.to_destination = ?5)
";

const MATCH_WITHOUT_PILOT: &str = "f.pilot_id IS NULL";

const MATCH_READY_TO_DEPART: &str = r"
    f.status = 'Scheduled'
    AND f.pilot_id IS NOT NULL
    AND date(f.scheduled_departure) = ?1
";

const MATCH_AWAITING_ARRIVAL: &str = "f.status = 'Departed'";

/// Insert a scheduled, unstaffed flight and return its generated id.
///
/// # Errors
///
/// Returns an error if the database operation fails, including a foreign key
/// violation for an unknown destination.
pub fn insert(conn: &Connection, flight: &NewFlight) -> Result<i64> {
    conn.execute(
        r"
        INSERT INTO flights (status, scheduled_departure, expected_arrival,
                             from_destination, to_destination)
        VALUES (?1, ?2, ?3, ?4, ?5)
        ",
        params![
            FlightStatus::Scheduled.as_str(),
            encode_timestamp(&flight.scheduled_departure),
            encode_timestamp(&flight.expected_arrival),
            flight.from_destination,
            flight.to_destination,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Look up a flight by id.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn get(conn: &Connection, id: i64) -> Result<Option<Flight>> {
    let sql = format!("{SELECT_FLIGHT} WHERE id = ?1");
    let flight = conn.query_row(&sql, [id], row_to_flight).optional()?;
    Ok(flight)
}

/// Assign a pilot to a flight that is still scheduled and unstaffed.
///
/// Returns `false` if the flight no longer qualifies.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn set_pilot(conn: &Connection, flight_id: i64, pilot_id: i64) -> Result<bool> {
    let affected = conn.execute(
        r"
        UPDATE flights SET pilot_id = ?2
        WHERE id = ?1 AND pilot_id IS NULL AND status = 'Scheduled'
        ",
        params![flight_id, pilot_id],
    )?;
    Ok(affected > 0)
}

/// Move a scheduled flight to departed, stamping `actual_departure`.
///
/// Returns `false` if the flight was not in the scheduled state.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn mark_departed(conn: &Connection, flight_id: i64, at: &DateTime<Utc>) -> Result<bool> {
    let affected = conn.execute(
        r"
        UPDATE flights SET status = 'Departed', actual_departure = ?2
        WHERE id = ?1 AND status = 'Scheduled' AND pilot_id IS NOT NULL
        ",
        params![flight_id, encode_timestamp(at)],
    )?;
    Ok(affected > 0)
}

/// Move a departed flight to arrived, stamping `actual_arrival`.
///
/// Returns `false` if the flight was not in the departed state.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn mark_arrived(conn: &Connection, flight_id: i64, at: &DateTime<Utc>) -> Result<bool> {
    let affected = conn.execute(
        r"
        UPDATE flights SET status = 'Arrived', actual_arrival = ?2
        WHERE id = ?1 AND status = 'Departed'
        ",
        params![flight_id, encode_timestamp(at)],
    )?;
    Ok(affected > 0)
}

/// Every flight with pilot and destination names.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn list_views(conn: &Connection) -> Result<Vec<FlightView>> {
    query_views(conn, MATCH_ALL, [])
}

/// Flights matching every criterion set in `filter`.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn search_views(conn: &Connection, filter: &FlightFilter) -> Result<Vec<FlightView>> {
    query_views(
        conn,
        MATCH_FILTER,
        params![
            filter.status.map(FlightStatus::as_str),
            filter.departure_date.map(|date| encode_date(&date)),
            filter.pilot_id,
            filter.from_destination,
            filter.to_destination,
        ],
    )
}

/// Flights that still need a pilot.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn views_without_pilot(conn: &Connection) -> Result<Vec<FlightView>> {
    query_views(conn, MATCH_WITHOUT_PILOT, [])
}

/// Staffed, scheduled flights departing on `date`.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn views_ready_to_depart(conn: &Connection, date: NaiveDate) -> Result<Vec<FlightView>> {
    query_views(conn, MATCH_READY_TO_DEPART, [encode_date(&date)])
}

/// Flights currently in the air.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn views_awaiting_arrival(conn: &Connection) -> Result<Vec<FlightView>> {
    query_views(conn, MATCH_AWAITING_ARRIVAL, [])
}

fn query_views<P: Params>(conn: &Connection, predicate: &str, params: P) -> Result<Vec<FlightView>> {
    let sql = format!("{SELECT_VIEW} WHERE {predicate} ORDER BY f.scheduled_departure, f.id");
    let mut stmt = conn.prepare(&sql)?;
    let views = stmt
        .query_map(params, row_to_view)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(views)
}

fn encode_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn decode_status(row: &Row<'_>, idx: usize) -> rusqlite::Result<FlightStatus> {
    let raw: String = row.get(idx)?;
    raw.parse().map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Text,
            format!("unknown flight status: {raw}").into(),
        )
    })
}

fn row_to_flight(row: &Row<'_>) -> rusqlite::Result<Flight> {
    Ok(Flight {
        id: row.get(0)?,
        status: decode_status(row, 1)?,
        scheduled_departure: decode_timestamp(row, 2)?,
        expected_arrival: decode_timestamp(row, 3)?,
        actual_departure: decode_optional_timestamp(row, 4)?,
        actual_arrival: decode_optional_timestamp(row, 5)?,
        from_destination: row.get(6)?,
        to_destination: row.get(7)?,
        pilot_id: row.get(8)?,
    })
}

fn row_to_view(row: &Row<'_>) -> rusqlite::Result<FlightView> {
    Ok(FlightView {
        id: row.get(0)?,
        status: decode_status(row, 1)?,
        scheduled_departure: decode_timestamp(row, 2)?,
        expected_arrival: decode_timestamp(row, 3)?,
        actual_departure: decode_optional_timestamp(row, 4)?,
        actual_arrival: decode_optional_timestamp(row, 5)?,
        pilot_id: row.get(6)?,
        pilot_name: row.get(7)?,
        from_code: row.get(8)?,
        from_name: row.get(9)?,
        to_code: row.get(10)?,
        to_name: row.get(11)?,
    })
}
