//! Pilot availability and assignment.
//!
//! A flight's padded window is its scheduled span widened by the rest buffer
//! on both sides. A pilot is unavailable for a flight while committed to any
//! other flight that departs inside, or overlaps, that window.

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use tracing::{info, warn};

use crate::clock::Clock;
use crate::config::ScheduleConfig;
use crate::error::{Error, Result};
use crate::model::{Flight, FlightStatus, Pilot};
use crate::storage::{flights, pilots};

use super::FlightDesk;

/// The padded window `[departure - buffer, arrival + buffer]` of a flight.
///
/// # Errors
///
/// Returns [`Error::InvalidSchedule`] if either bound falls outside the range
/// of representable instants.
pub fn padded_window(
    flight: &Flight,
    schedule: &ScheduleConfig,
) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    let buffer = schedule.rest_buffer();
    let start = flight.scheduled_departure.checked_sub_signed(buffer);
    let end = flight.expected_arrival.checked_add_signed(buffer);
    match (start, end) {
        (Some(start), Some(end)) => Ok((start, end)),
        _ => Err(Error::InvalidSchedule {
            message: format!(
                "rest buffer of {} hours around flight {} is out of range",
                schedule.rest_buffer_hours, flight.id
            ),
        }),
    }
}

fn available_for(conn: &Connection, flight: &Flight, schedule: &ScheduleConfig) -> Result<Vec<Pilot>> {
    let (start, end) = padded_window(flight, schedule)?;
    pilots::available_for_window(conn, flight.id, &start, &end)
}

impl<C: Clock> FlightDesk<C> {
    /// Pilots free to fly `flight_id`, ordered by pilot id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the flight does not exist.
    pub fn available_pilots(&self, flight_id: i64) -> Result<Vec<Pilot>> {
        let conn = self.storage.connection();
        let flight = flights::get(conn, flight_id)?.ok_or_else(|| Error::not_found("flight", flight_id))?;
        available_for(conn, &flight, &self.schedule)
    }

    /// Assign `pilot_id` to the unstaffed, scheduled flight `flight_id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the flight or pilot does not exist, and
    /// [`Error::InvalidAssignment`] if the flight already has a pilot, is no
    /// longer scheduled, or the pilot is committed to a conflicting flight.
    pub fn assign_pilot(&mut self, flight_id: i64, pilot_id: i64) -> Result<()> {
        let schedule = self.schedule;
        let result = self.storage.transaction(|tx| {
            let flight = flights::get(tx, flight_id)?.ok_or_else(|| Error::not_found("flight", flight_id))?;
            if pilots::get(tx, pilot_id)?.is_none() {
                return Err(Error::not_found("pilot", pilot_id));
            }

            if flight.status != FlightStatus::Scheduled {
                return Err(Error::invalid_assignment(
                    flight_id,
                    pilot_id,
                    format!("flight is already {}", flight.status),
                ));
            }
            if let Some(current) = flight.pilot_id {
                return Err(Error::invalid_assignment(
                    flight_id,
                    pilot_id,
                    format!("flight is already staffed by pilot {current}"),
                ));
            }
            if !available_for(tx, &flight, &schedule)?
                .iter()
                .any(|pilot| pilot.id == pilot_id)
            {
                return Err(Error::invalid_assignment(
                    flight_id,
                    pilot_id,
                    "pilot is committed to a flight within the rest buffer",
                ));
            }

            if !flights::set_pilot(tx, flight_id, pilot_id)? {
                return Err(Error::invalid_assignment(
                    flight_id,
                    pilot_id,
                    "flight was staffed concurrently",
                ));
            }
            Ok(())
        });

        match &result {
            Ok(()) => info!("Assigned pilot {} to flight {}", pilot_id, flight_id),
            Err(e @ Error::InvalidAssignment { .. }) => warn!("{}", e),
            Err(_) => {}
        }
        result
    }
}
