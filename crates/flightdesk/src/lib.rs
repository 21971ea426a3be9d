//! `flightdesk` - Flight scheduling, pilot staffing and status tracking
//!
//! This library keeps flights, pilots and destinations in SQLite, assigns
//! pilots only when they are rested, and moves flights through
//! `Scheduled -> Departed -> Arrived`, crediting pilots' flight hours on
//! arrival.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod clock;
pub mod config;
pub mod desk;
pub mod error;
pub mod logging;
pub mod model;
pub mod storage;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use desk::{Arrival, FlightDesk};
pub use error::{Error, Result};
pub use logging::init_logging;
pub use model::{Destination, Flight, FlightFilter, FlightStatus, FlightView, NewFlight, Pilot};
pub use storage::Storage;
