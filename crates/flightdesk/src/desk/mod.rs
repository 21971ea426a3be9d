//! The flight desk service.
//!
//! [`FlightDesk`] is the entry point presentation layers talk to. It owns
//! the [`Storage`] handle, the scheduling rules and a [`Clock`], and exposes:
//!
//! - **Onboarding**: destinations, pilots and new flights (this module)
//! - **Availability**: which pilots can take a flight, and assignment
//!   ([`availability`])
//! - **Lifecycle**: departure and arrival with derived fields ([`lifecycle`])
//! - **Queries**: read-only listings and search ([`query`])
//!
//! Every mutating operation runs in a single transaction.
//!
//! # Example
//!
//! ```
//! use chrono::{Duration, Utc};
//! use flightdesk::{FlightDesk, NewFlight};
//!
//! let mut desk = FlightDesk::open_in_memory()?;
//! desk.add_destination("LHR", "London Heathrow")?;
//! desk.add_destination("JFK", "New York JFK")?;
//!
//! let departure = Utc::now() + Duration::days(3);
//! let flight = desk.create_flight(&NewFlight {
//!     from_destination: "LHR".to_string(),
//!     to_destination: "JFK".to_string(),
//!     scheduled_departure: departure,
//!     expected_arrival: departure + Duration::hours(8),
//! })?;
//! let pilot = desk.create_pilot("Amelia", "Earhart", 0)?;
//!
//! desk.assign_pilot(flight.id, pilot.id)?;
//! assert_eq!(desk.flight(flight.id)?.pilot_id, Some(pilot.id));
//! # Ok::<(), flightdesk::Error>(())
//! ```

pub mod availability;
pub mod lifecycle;
pub mod query;

use tracing::info;

use crate::clock::{Clock, SystemClock};
use crate::config::{Config, ScheduleConfig};
use crate::error::{Error, Result};
use crate::model::{Destination, Flight, NewFlight, Pilot};
use crate::storage::{self, destinations, flights, pilots, Storage};

pub use lifecycle::Arrival;

/// Flight scheduling, staffing and status tracking over a [`Storage`].
#[derive(Debug)]
pub struct FlightDesk<C: Clock = SystemClock> {
    storage: Storage,
    schedule: ScheduleConfig,
    clock: C,
}

impl FlightDesk<SystemClock> {
    /// Open the database named by `config` with the system clock.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened.
    pub fn from_config(config: &Config) -> Result<Self> {
        let storage = Storage::open(config.database_path())?;
        Ok(Self::new(storage, config.schedule, SystemClock))
    }

    /// An in-memory desk with default rules and the system clock.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self::new(
            Storage::open_in_memory()?,
            ScheduleConfig::default(),
            SystemClock,
        ))
    }
}

impl<C: Clock> FlightDesk<C> {
    /// Build a desk from its parts.
    #[must_use]
    pub fn new(storage: Storage, schedule: ScheduleConfig, clock: C) -> Self {
        Self {
            storage,
            schedule,
            clock,
        }
    }

    /// The underlying storage.
    #[must_use]
    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// The scheduling rules in force.
    #[must_use]
    pub fn schedule(&self) -> &ScheduleConfig {
        &self.schedule
    }

    /// The clock used for "now" and "today".
    #[must_use]
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Register a destination.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateDestination`] if the short code is taken.
    pub fn add_destination(&mut self, short_code: &str, full_name: &str) -> Result<Destination> {
        let destination = Destination {
            short_code: short_code.to_string(),
            full_name: full_name.to_string(),
        };

        self.storage.transaction(|tx| {
            if destinations::exists(tx, short_code)? {
                return Err(Error::DuplicateDestination {
                    code: short_code.to_string(),
                });
            }
            destinations::insert(tx, &destination)
        })?;

        info!("Added destination {} ({})", short_code, full_name);
        Ok(destination)
    }

    /// Onboard a pilot with an initial flight-hour total.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn create_pilot(
        &mut self,
        first_name: &str,
        last_name: &str,
        initial_flight_hours: u32,
    ) -> Result<Pilot> {
        let id = self.storage.transaction(|tx| {
            pilots::insert(tx, first_name, last_name, initial_flight_hours)
        })?;

        info!(
            "Onboarded pilot {} {} {} with {} hours",
            id, first_name, last_name, initial_flight_hours
        );
        Ok(Pilot {
            id,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            flight_hours: initial_flight_hours,
        })
    }

    /// Schedule a new flight without a pilot.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownDestination`] if either short code is not
    /// registered, and [`Error::InvalidSchedule`] if either instant lies
    /// outside the years 0 to 9999 or if strict scheduling is enabled and the
    /// expected arrival is not after the departure. Nothing is written on
    /// error.
    pub fn create_flight(&mut self, new_flight: &NewFlight) -> Result<Flight> {
        for instant in [&new_flight.scheduled_departure, &new_flight.expected_arrival] {
            if !storage::is_storable(instant) {
                return Err(Error::InvalidSchedule {
                    message: format!(
                        "{instant} is outside the supported years {}..={}",
                        storage::STORABLE_YEARS.start(),
                        storage::STORABLE_YEARS.end()
                    ),
                });
            }
        }
        if self.schedule.require_arrival_after_departure
            && new_flight.expected_arrival <= new_flight.scheduled_departure
        {
            return Err(Error::InvalidSchedule {
                message: format!(
                    "expected arrival {} is not after scheduled departure {}",
                    new_flight.expected_arrival, new_flight.scheduled_departure
                ),
            });
        }

        let flight = self.storage.transaction(|tx| {
            for code in [&new_flight.from_destination, &new_flight.to_destination] {
                if !destinations::exists(tx, code)? {
                    return Err(Error::UnknownDestination { code: code.clone() });
                }
            }
            let id = flights::insert(tx, new_flight)?;
            flights::get(tx, id)?
                .ok_or_else(|| Error::internal(format!("flight {id} vanished after insert")))
        })?;

        info!(
            "Scheduled flight {} {} -> {} departing {}",
            flight.id, flight.from_destination, flight.to_destination, flight.scheduled_departure
        );
        Ok(flight)
    }
}
