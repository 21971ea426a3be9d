//! Read-only lookups and listings.
//!
//! Nothing here writes; listings are ordered by scheduled departure, then id.

use tracing::debug;

use crate::clock::Clock;
use crate::error::{Error, Result};
use crate::model::{Destination, Flight, FlightFilter, FlightView, Pilot};
use crate::storage::{destinations, flights, pilots};

use super::FlightDesk;

impl<C: Clock> FlightDesk<C> {
    /// Look up a flight.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the flight does not exist.
    pub fn flight(&self, id: i64) -> Result<Flight> {
        flights::get(self.storage.connection(), id)?.ok_or_else(|| Error::not_found("flight", id))
    }

    /// Look up a pilot.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the pilot does not exist.
    pub fn pilot(&self, id: i64) -> Result<Pilot> {
        pilots::get(self.storage.connection(), id)?.ok_or_else(|| Error::not_found("pilot", id))
    }

    /// Look up a destination by short code.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownDestination`] if the code is not registered.
    pub fn destination(&self, short_code: &str) -> Result<Destination> {
        destinations::get(self.storage.connection(), short_code)?.ok_or_else(|| {
            Error::UnknownDestination {
                code: short_code.to_string(),
            }
        })
    }

    /// All pilots ordered by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn pilots(&self) -> Result<Vec<Pilot>> {
        pilots::list(self.storage.connection())
    }

    /// All destinations ordered by short code.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn destinations(&self) -> Result<Vec<Destination>> {
        destinations::list(self.storage.connection())
    }

    /// Every flight with pilot and destination names.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn list_flights(&self) -> Result<Vec<FlightView>> {
        flights::list_views(self.storage.connection())
    }

    /// Flights matching every criterion set in `filter`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn search_flights(&self, filter: &FlightFilter) -> Result<Vec<FlightView>> {
        debug!(?filter, "Searching flights");
        flights::search_views(self.storage.connection(), filter)
    }

    /// Flights that still need a pilot.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn flights_without_pilot(&self) -> Result<Vec<FlightView>> {
        flights::views_without_pilot(self.storage.connection())
    }

    /// Staffed, scheduled flights whose departure date is today.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn flights_departing_today(&self) -> Result<Vec<FlightView>> {
        flights::views_ready_to_depart(self.storage.connection(), self.clock.today())
    }

    /// Flights that have departed and not yet arrived.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn flights_awaiting_arrival(&self) -> Result<Vec<FlightView>> {
        flights::views_awaiting_arrival(self.storage.connection())
    }
}
