//! Handlers for the non-interactive subcommands.
//!
//! Each handler runs one command against a [`FlightDesk`] and writes the
//! result to `out`.

use std::io::Write;

use crate::clock::Clock;
use crate::config::{Config, DisplayConfig};
use crate::desk::FlightDesk;
use crate::error::Result;
use crate::model::{FlightFilter, NewFlight};

use super::input::{parse_date, parse_datetime};
use super::render;
use super::{
    ConfigCommand, CreateFlightCommand, DestinationsCommand, FlightsCommand, PilotsCommand,
    SearchCommand,
};

/// Run a `flights` subcommand.
///
/// # Errors
///
/// Returns an error if input is malformed, the desk rejects the request, or
/// writing to `out` fails.
pub fn flights<C: Clock, W: Write>(
    desk: &mut FlightDesk<C>,
    display: &DisplayConfig,
    command: FlightsCommand,
    out: &mut W,
) -> Result<()> {
    match command {
        FlightsCommand::List(list) => {
            let views = desk.list_flights()?;
            write!(out, "{}", render::flights(&views, list.format, display)?)?;
        }
        FlightsCommand::Search(search) => {
            let filter = search_filter(&search, display)?;
            let views = desk.search_flights(&filter)?;
            write!(out, "{}", render::flights(&views, search.list.format, display)?)?;
        }
        FlightsCommand::Create(create) => {
            let new_flight = new_flight(&create, display)?;
            let flight = desk.create_flight(&new_flight)?;
            writeln!(out, "Flight {} scheduled", flight.id)?;
        }
        FlightsCommand::Unassigned(list) => {
            let views = desk.flights_without_pilot()?;
            write!(out, "{}", render::flights(&views, list.format, display)?)?;
        }
        FlightsCommand::Today(list) => {
            let views = desk.flights_departing_today()?;
            write!(out, "{}", render::flights(&views, list.format, display)?)?;
        }
        FlightsCommand::Airborne(list) => {
            let views = desk.flights_awaiting_arrival()?;
            write!(out, "{}", render::flights(&views, list.format, display)?)?;
        }
        FlightsCommand::Available { flight, list } => {
            let pilots = desk.available_pilots(flight)?;
            write!(out, "{}", render::pilots(&pilots, list.format)?)?;
        }
        FlightsCommand::Assign { flight, pilot } => {
            desk.assign_pilot(flight, pilot)?;
            writeln!(out, "Pilot {pilot} assigned to flight {flight}")?;
        }
        FlightsCommand::Depart { flight } => {
            let flight = desk.depart(flight)?;
            writeln!(out, "Flight {} set to departed", flight.id)?;
        }
        FlightsCommand::Arrive { flight } => {
            let arrival = desk.arrive(flight)?;
            writeln!(
                out,
                "Flight {} set to arrived; pilot {} credited {} hours",
                arrival.flight.id, arrival.pilot_id, arrival.hours_credited
            )?;
        }
    }
    Ok(())
}

/// Run a `pilots` subcommand.
///
/// # Errors
///
/// Returns an error if the desk rejects the request or writing fails.
pub fn pilots<C: Clock, W: Write>(
    desk: &mut FlightDesk<C>,
    command: PilotsCommand,
    out: &mut W,
) -> Result<()> {
    match command {
        PilotsCommand::List(list) => {
            let pilots = desk.pilots()?;
            write!(out, "{}", render::pilots(&pilots, list.format)?)?;
        }
        PilotsCommand::Add {
            first_name,
            last_name,
            hours,
        } => {
            let pilot = desk.create_pilot(&first_name, &last_name, hours)?;
            writeln!(out, "Pilot {} added", pilot.id)?;
        }
    }
    Ok(())
}

/// Run a `destinations` subcommand.
///
/// # Errors
///
/// Returns an error if the desk rejects the request or writing fails.
pub fn destinations<C: Clock, W: Write>(
    desk: &mut FlightDesk<C>,
    command: DestinationsCommand,
    out: &mut W,
) -> Result<()> {
    match command {
        DestinationsCommand::List(list) => {
            let destinations = desk.destinations()?;
            write!(out, "{}", render::destinations(&destinations, list.format)?)?;
        }
        DestinationsCommand::Add { code, name } => {
            desk.add_destination(&code, &name)?;
            writeln!(out, "Destination {code} added")?;
        }
    }
    Ok(())
}

/// Run a `config` subcommand. Never touches the database.
///
/// # Errors
///
/// Returns an error if serialization or writing fails. An invalid file
/// passed to `validate` is reported in the output, not as an error.
pub fn config<W: Write>(config: &Config, command: ConfigCommand, out: &mut W) -> Result<()> {
    match command {
        ConfigCommand::Show { json } => {
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(config)?)?;
            } else {
                writeln!(out, "Current Configuration")?;
                writeln!(out, "=====================")?;
                writeln!(out)?;
                writeln!(out, "[Storage]")?;
                writeln!(out, "  Database path:      {}", config.database_path().display())?;
                writeln!(out)?;
                writeln!(out, "[Schedule]")?;
                writeln!(out, "  Rest buffer (h):    {}", config.schedule.rest_buffer_hours)?;
                writeln!(
                    out,
                    "  Strict arrival:     {}",
                    config.schedule.require_arrival_after_departure
                )?;
                writeln!(out)?;
                writeln!(out, "[Display]")?;
                writeln!(out, "  Date/time format:   {}", config.display.datetime_format)?;
                writeln!(out, "  Date format:        {}", config.display.date_format)?;
            }
        }
        ConfigCommand::Path => {
            writeln!(out, "{}", Config::default_config_path().display())?;
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            writeln!(out, "Validating configuration: {}", path.display())?;
            match Config::load_from(Some(path)) {
                Ok(_) => writeln!(out, "Configuration is valid.")?,
                Err(e) => writeln!(out, "Configuration error: {e}")?,
            }
        }
    }
    Ok(())
}

fn search_filter(search: &SearchCommand, display: &DisplayConfig) -> Result<FlightFilter> {
    let mut filter = FlightFilter::new();
    if let Some(status) = search.status {
        filter = filter.status(status.into());
    }
    if let Some(date) = &search.date {
        filter = filter.departure_date(parse_date(date, &display.date_format)?);
    }
    if let Some(pilot) = search.pilot {
        filter = filter.pilot_id(pilot);
    }
    if let Some(from) = &search.from {
        filter = filter.from_destination(from.as_str());
    }
    if let Some(to) = &search.to {
        filter = filter.to_destination(to.as_str());
    }
    Ok(filter)
}

fn new_flight(create: &CreateFlightCommand, display: &DisplayConfig) -> Result<NewFlight> {
    Ok(NewFlight {
        from_destination: create.from.clone(),
        to_destination: create.to.clone(),
        scheduled_departure: parse_datetime(&create.departure, &display.datetime_format)?,
        expected_arrival: parse_datetime(&create.arrival, &display.datetime_format)?,
    })
}
