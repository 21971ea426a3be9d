//! Core record types for flightdesk.
//!
//! These mirror the three stored relations (destinations, pilots, flights)
//! plus the joined [`FlightView`] used by listings and the [`FlightFilter`]
//! accepted by search.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Lifecycle state of a flight.
///
/// Flights only ever move forward: `Scheduled` to `Departed` to `Arrived`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FlightStatus {
    /// Created and awaiting departure.
    Scheduled,
    /// Airborne; `actual_departure` is set.
    Departed,
    /// Landed; `actual_arrival` is set and the record is history.
    Arrived,
}

impl FlightStatus {
    /// All statuses in lifecycle order.
    pub const ALL: [Self; 3] = [Self::Scheduled, Self::Departed, Self::Arrived];

    /// The stored text form of this status.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Scheduled => "Scheduled",
            Self::Departed => "Departed",
            Self::Arrived => "Arrived",
        }
    }

    /// The status that follows this one, if any.
    #[must_use]
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Scheduled => Some(Self::Departed),
            Self::Departed => Some(Self::Arrived),
            Self::Arrived => None,
        }
    }
}

impl fmt::Display for FlightStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FlightStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::malformed_input(s, "one of Scheduled, Departed, Arrived"))
    }
}

/// An airport or other place flights leave from and arrive at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
    /// Unique short code, e.g. `LHR`.
    pub short_code: String,
    /// Human-readable name.
    pub full_name: String,
}

/// A pilot who can be assigned to flights.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pilot {
    /// Identifier assigned by storage.
    pub id: i64,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Accumulated whole flight hours.
    pub flight_hours: u32,
}

impl Pilot {
    /// First and last name joined by a space.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A stored flight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flight {
    /// Identifier assigned by storage.
    pub id: i64,
    /// Current lifecycle state.
    pub status: FlightStatus,
    /// Planned departure instant.
    pub scheduled_departure: DateTime<Utc>,
    /// Planned arrival instant.
    pub expected_arrival: DateTime<Utc>,
    /// Set when the flight departs.
    pub actual_departure: Option<DateTime<Utc>>,
    /// Set when the flight arrives.
    pub actual_arrival: Option<DateTime<Utc>>,
    /// Short code of the origin.
    pub from_destination: String,
    /// Short code of the destination.
    pub to_destination: String,
    /// Assigned pilot, if any.
    pub pilot_id: Option<i64>,
}

/// Parameters for scheduling a new flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFlight {
    /// Short code of the origin.
    pub from_destination: String,
    /// Short code of the destination.
    pub to_destination: String,
    /// Planned departure instant.
    pub scheduled_departure: DateTime<Utc>,
    /// Planned arrival instant.
    pub expected_arrival: DateTime<Utc>,
}

/// A flight joined with its pilot's name and both destinations' names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightView {
    /// Flight identifier.
    pub id: i64,
    /// Current lifecycle state.
    pub status: FlightStatus,
    /// Planned departure instant.
    pub scheduled_departure: DateTime<Utc>,
    /// Planned arrival instant.
    pub expected_arrival: DateTime<Utc>,
    /// Set when the flight departs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_departure: Option<DateTime<Utc>>,
    /// Set when the flight arrives.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_arrival: Option<DateTime<Utc>>,
    /// Assigned pilot, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pilot_id: Option<i64>,
    /// Assigned pilot's full name, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pilot_name: Option<String>,
    /// Origin short code.
    pub from_code: String,
    /// Origin full name.
    pub from_name: String,
    /// Destination short code.
    pub to_code: String,
    /// Destination full name.
    pub to_name: String,
}

/// Optional search criteria for flights.
///
/// Every `None` field matches all rows; provided fields are combined with
/// logical AND. `departure_date` compares the UTC calendar date of the
/// scheduled departure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlightFilter {
    /// Match this status only.
    pub status: Option<FlightStatus>,
    /// Match flights scheduled to depart on this date.
    pub departure_date: Option<NaiveDate>,
    /// Match flights assigned to this pilot.
    pub pilot_id: Option<i64>,
    /// Match flights leaving this destination.
    pub from_destination: Option<String>,
    /// Match flights arriving at this destination.
    pub to_destination: Option<String>,
}

impl FlightFilter {
    /// A filter matching every flight.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to a status.
    #[must_use]
    pub fn status(mut self, status: FlightStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Restrict to a departure date.
    #[must_use]
    pub fn departure_date(mut self, date: NaiveDate) -> Self {
        self.departure_date = Some(date);
        self
    }

    /// Restrict to a pilot.
    #[must_use]
    pub fn pilot_id(mut self, pilot_id: i64) -> Self {
        self.pilot_id = Some(pilot_id);
        self
    }

    /// Restrict to an origin.
    #[must_use]
    pub fn from_destination(mut self, code: impl Into<String>) -> Self {
        self.from_destination = Some(code.into());
        self
    }

    /// Restrict to a destination.
    #[must_use]
    pub fn to_destination(mut self, code: impl Into<String>) -> Self {
        self.to_destination = Some(code.into());
        self
    }

    /// Whether no criteria are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trips_through_text() {
        for status in FlightStatus::ALL {
            assert_eq!(status.as_str().parse::<FlightStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_status_parse_is_case_insensitive() {
        assert_eq!(
            " departed ".parse::<FlightStatus>().unwrap(),
            FlightStatus::Departed
        );
    }

    #[test]
    fn test_status_parse_rejects_unknown() {
        let err = "Cancelled".parse::<FlightStatus>().unwrap_err();
        assert!(matches!(err, Error::MalformedInput { .. }));
    }

    #[test]
    fn test_status_progression() {
        assert_eq!(FlightStatus::Scheduled.next(), Some(FlightStatus::Departed));
        assert_eq!(FlightStatus::Departed.next(), Some(FlightStatus::Arrived));
        assert_eq!(FlightStatus::Arrived.next(), None);
        assert!(FlightStatus::Scheduled < FlightStatus::Arrived);
    }

    #[test]
    fn test_pilot_full_name() {
        let pilot = Pilot {
            id: 1,
            first_name: "Amelia".to_string(),
            last_name: "Earhart".to_string(),
            flight_hours: 0,
        };
        assert_eq!(pilot.full_name(), "Amelia Earhart");
    }

    #[test]
    fn test_filter_builder() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let filter = FlightFilter::new()
            .status(FlightStatus::Scheduled)
            .departure_date(date)
            .from_destination("LHR");

        assert_eq!(filter.status, Some(FlightStatus::Scheduled));
        assert_eq!(filter.departure_date, Some(date));
        assert_eq!(filter.from_destination.as_deref(), Some("LHR"));
        assert!(filter.to_destination.is_none());
        assert!(!filter.is_empty());
        assert!(FlightFilter::new().is_empty());
    }

    #[test]
    fn test_flight_view_json_skips_missing_fields() {
        let view = FlightView {
            id: 1,
            status: FlightStatus::Scheduled,
            scheduled_departure: Utc::now(),
            expected_arrival: Utc::now(),
            actual_departure: None,
            actual_arrival: None,
            pilot_id: None,
            pilot_name: None,
            from_code: "LHR".to_string(),
            from_name: "London Heathrow".to_string(),
            to_code: "JFK".to_string(),
            to_name: "New York JFK".to_string(),
        };
        let json = serde_json::to_string(&view).unwrap();
        assert!(json.contains("\"status\":\"Scheduled\""));
        assert!(!json.contains("pilot_name"));
        assert!(!json.contains("actual_departure"));
    }
}
