//! Error types for flightdesk.
//!
//! This module defines all error types used throughout the flightdesk crate.
//! Domain errors carry enough context to tell the operator what to correct;
//! storage and configuration errors wrap their underlying causes.

use std::path::PathBuf;
use thiserror::Error;

use crate::model::FlightStatus;

/// The main error type for flightdesk operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Domain Errors ===
    /// A referenced record does not exist.
    #[error("{entity} {id} not found")]
    NotFound {
        /// Kind of record that was looked up.
        entity: &'static str,
        /// The identifier that was not found.
        id: String,
    },

    /// A status transition was requested whose preconditions do not hold.
    #[error("flight {flight_id} cannot move from {status}: {reason}")]
    InvalidTransition {
        /// The flight being transitioned.
        flight_id: i64,
        /// The flight's status at the time of the request.
        status: FlightStatus,
        /// Which precondition failed.
        reason: String,
    },

    /// The pilot cannot be assigned to the flight.
    #[error("pilot {pilot_id} cannot be assigned to flight {flight_id}: {reason}")]
    InvalidAssignment {
        /// The flight being staffed.
        flight_id: i64,
        /// The pilot that was requested.
        pilot_id: i64,
        /// Why the assignment was refused.
        reason: String,
    },

    /// A destination short code does not exist.
    #[error("unknown destination: {code}")]
    UnknownDestination {
        /// The unrecognised short code.
        code: String,
    },

    /// A destination short code is already registered.
    #[error("destination {code} already exists")]
    DuplicateDestination {
        /// The duplicated short code.
        code: String,
    },

    /// The flight's scheduled times are inconsistent.
    #[error("invalid schedule: {message}")]
    InvalidSchedule {
        /// Description of the inconsistency.
        message: String,
    },

    /// User input could not be parsed.
    #[error("malformed input '{input}', expected {expected}")]
    MalformedInput {
        /// The raw input as entered.
        input: String,
        /// Description of the accepted format.
        expected: String,
    },

    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O Errors ===
    /// File system or terminal operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Generic Errors ===
    /// A stored invariant was found broken (bug or external tampering).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for flightdesk operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a not-found error for the given kind of record.
    #[must_use]
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Create an invalid transition error.
    #[must_use]
    pub fn invalid_transition(
        flight_id: i64,
        status: FlightStatus,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidTransition {
            flight_id,
            status,
            reason: reason.into(),
        }
    }

    /// Create an invalid assignment error.
    #[must_use]
    pub fn invalid_assignment(flight_id: i64, pilot_id: i64, reason: impl Into<String>) -> Self {
        Self::InvalidAssignment {
            flight_id,
            pilot_id,
            reason: reason.into(),
        }
    }

    /// Create a malformed input error.
    #[must_use]
    pub fn malformed_input(input: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::MalformedInput {
            input: input.into(),
            expected: expected.into(),
        }
    }

    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this error means a referenced record is missing.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this error is a rejected request the operator can correct,
    /// as opposed to a storage or configuration failure.
    #[must_use]
    pub fn is_domain_error(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. }
                | Self::InvalidTransition { .. }
                | Self::InvalidAssignment { .. }
                | Self::UnknownDestination { .. }
                | Self::DuplicateDestination { .. }
                | Self::InvalidSchedule { .. }
                | Self::MalformedInput { .. }
        )
    }
}
