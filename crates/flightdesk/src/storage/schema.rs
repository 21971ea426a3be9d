//! `SQLite` schema definitions for flightdesk.
//!
//! This module contains the SQL statements for creating and managing
//! the database schema.

/// SQL statement to create the destinations table.
pub const CREATE_DESTINATIONS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS destinations (
    short_code TEXT PRIMARY KEY,
    full_name TEXT NOT NULL
)
";

/// SQL statement to create the pilots table.
pub const CREATE_PILOTS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS pilots (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    flight_hours INTEGER NOT NULL DEFAULT 0 CHECK (flight_hours BETWEEN 0 AND 4294967295)
)
";

/// SQL statement to create the flights table.
///
/// Instants are stored as `YYYY-MM-DDTHH:MM:SSZ` text so that string
/// comparison orders them chronologically.
pub const CREATE_FLIGHTS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS flights (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    status TEXT NOT NULL DEFAULT 'Scheduled'
        CHECK (status IN ('Scheduled', 'Departed', 'Arrived')),
    scheduled_departure TEXT NOT NULL,
    expected_arrival TEXT NOT NULL,
    actual_departure TEXT,
    actual_arrival TEXT,
    from_destination TEXT NOT NULL REFERENCES destinations(short_code),
    to_destination TEXT NOT NULL REFERENCES destinations(short_code),
    pilot_id INTEGER REFERENCES pilots(id),
    CHECK (pilot_id IS NOT NULL OR status = 'Scheduled')
)
";

/// SQL statement to create an index on scheduled departure for window queries.
pub const CREATE_DEPARTURE_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_flights_departure ON flights(scheduled_departure)
";

/// SQL statement to create an index on `pilot_id` for availability checks.
pub const CREATE_PILOT_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_flights_pilot ON flights(pilot_id)
";

/// SQL statement to create an index on `status` for lifecycle listings.
pub const CREATE_STATUS_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_flights_status ON flights(status)
";

/// SQL statement to create the metadata table for storing key-value pairs.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    CREATE_DESTINATIONS_TABLE,
    CREATE_PILOTS_TABLE,
    CREATE_FLIGHTS_TABLE,
    CREATE_DEPARTURE_INDEX,
    CREATE_PILOT_INDEX,
    CREATE_STATUS_INDEX,
    CREATE_METADATA_TABLE,
];
