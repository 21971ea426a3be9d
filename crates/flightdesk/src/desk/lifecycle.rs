//! Flight status transitions.
//!
//! `Scheduled -> Departed -> Arrived`, never backwards and never skipping.
//! Departure stamps `actual_departure`; arrival stamps `actual_arrival` and
//! credits the pilot with the elapsed time rounded to whole hours, in the
//! same transaction.

use chrono::{DateTime, SubsecRound, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::clock::Clock;
use crate::error::{Error, Result};
use crate::model::{Flight, FlightStatus};
use crate::storage::{flights, pilots};

use super::FlightDesk;

const SECONDS_PER_HOUR: i64 = 3600;

/// Outcome of a completed flight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Arrival {
    /// The flight after the transition.
    pub flight: Flight,
    /// The pilot credited with the flight.
    pub pilot_id: i64,
    /// Whole hours added to the pilot's total.
    pub hours_credited: u32,
}

/// Elapsed time between two instants rounded to the nearest whole hour,
/// halves rounding up. Negative spans count as zero.
#[must_use]
pub fn rounded_flight_hours(departure: &DateTime<Utc>, arrival: &DateTime<Utc>) -> u32 {
    let seconds = (*arrival - *departure).num_seconds().max(0);
    let hours = (seconds + SECONDS_PER_HOUR / 2) / SECONDS_PER_HOUR;
    u32::try_from(hours).unwrap_or(u32::MAX)
}

impl<C: Clock> FlightDesk<C> {
    /// Mark a staffed flight scheduled for today as departed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown flight, and
    /// [`Error::InvalidTransition`] unless the flight is scheduled, has a
    /// pilot, and is scheduled to depart on the current UTC date.
    pub fn depart(&mut self, flight_id: i64) -> Result<Flight> {
        let now = self.clock.now().trunc_subsecs(0);
        let today = now.date_naive();

        let result = self.storage.transaction(|tx| {
            let flight = flights::get(tx, flight_id)?.ok_or_else(|| Error::not_found("flight", flight_id))?;

            if flight.status.next() != Some(FlightStatus::Departed) {
                return Err(Error::invalid_transition(
                    flight_id,
                    flight.status,
                    "only scheduled flights can depart",
                ));
            }
            if flight.pilot_id.is_none() {
                return Err(Error::invalid_transition(
                    flight_id,
                    flight.status,
                    "no pilot is assigned",
                ));
            }
            let scheduled_date = flight.scheduled_departure.date_naive();
            if scheduled_date != today {
                return Err(Error::invalid_transition(
                    flight_id,
                    flight.status,
                    format!("scheduled to depart on {scheduled_date}, not today ({today})"),
                ));
            }

            if !flights::mark_departed(tx, flight_id, &now)? {
                return Err(Error::invalid_transition(
                    flight_id,
                    flight.status,
                    "flight changed state concurrently",
                ));
            }
            flights::get(tx, flight_id)?.ok_or_else(|| Error::not_found("flight", flight_id))
        });

        match &result {
            Ok(flight) => info!("Flight {} departed at {}", flight.id, now),
            Err(e @ Error::InvalidTransition { .. }) => warn!("{}", e),
            Err(_) => {}
        }
        result
    }

    /// Mark a departed flight as arrived and credit its pilot's hours.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown flight, and
    /// [`Error::InvalidTransition`] unless the flight is departed or if the
    /// pilot's total would overflow. The flight stays departed on any error.
    pub fn arrive(&mut self, flight_id: i64) -> Result<Arrival> {
        let now = self.clock.now().trunc_subsecs(0);

        let result = self.storage.transaction(|tx| {
            let flight = flights::get(tx, flight_id)?.ok_or_else(|| Error::not_found("flight", flight_id))?;

            if flight.status.next() != Some(FlightStatus::Arrived) {
                return Err(Error::invalid_transition(
                    flight_id,
                    flight.status,
                    "only departed flights can arrive",
                ));
            }
            let departed_at = flight.actual_departure.ok_or_else(|| {
                Error::internal(format!("departed flight {flight_id} has no departure time"))
            })?;
            let pilot_id = flight.pilot_id.ok_or_else(|| {
                Error::internal(format!("departed flight {flight_id} has no pilot"))
            })?;

            if !flights::mark_arrived(tx, flight_id, &now)? {
                return Err(Error::invalid_transition(
                    flight_id,
                    flight.status,
                    "flight changed state concurrently",
                ));
            }

            let hours_credited = rounded_flight_hours(&departed_at, &now);
            let pilot = pilots::get(tx, pilot_id)?.ok_or_else(|| Error::not_found("pilot", pilot_id))?;
            if pilot.flight_hours.checked_add(hours_credited).is_none() {
                return Err(Error::invalid_transition(
                    flight_id,
                    flight.status,
                    format!(
                        "crediting {hours_credited} hours would overflow pilot {pilot_id}'s total of {}",
                        pilot.flight_hours
                    ),
                ));
            }
            if !pilots::add_flight_hours(tx, pilot_id, hours_credited)? {
                return Err(Error::not_found("pilot", pilot_id));
            }

            let flight = flights::get(tx, flight_id)?.ok_or_else(|| Error::not_found("flight", flight_id))?;
            Ok(Arrival {
                flight,
                pilot_id,
                hours_credited,
            })
        });

        match &result {
            Ok(arrival) => info!(
                "Flight {} arrived at {}; pilot {} credited {} hours",
                flight_id, now, arrival.pilot_id, arrival.hours_credited
            ),
            Err(e @ Error::InvalidTransition { .. }) => warn!("{}", e),
            Err(_) => {}
        }
        result
    }
}
