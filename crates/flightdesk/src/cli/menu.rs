//! Interactive numbered menu.
//!
//! The menu reads one answer per line and re-prompts on anything it cannot
//! use. Rejections from the desk are printed and the menu carries on; end
//! of input behaves like `q`.

use std::fmt;
use std::io::{self, BufRead, Write};

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::clock::Clock;
use crate::config::DisplayConfig;
use crate::desk::FlightDesk;
use crate::error::{Error, Result};
use crate::model::{FlightFilter, FlightView, NewFlight};

use super::input::{
    describe_format, optional, parse_date, parse_datetime, parse_hours, parse_id, parse_status,
};
use super::render::{destinations_table, flights_table, pilots_table};

const MAIN_MENU: &str = "\
1) Get all flights
2) Search for a flight
3) Create a new flight
4) Assign pilot to flight
5) Onboard a pilot
6) Update flight status
q) Quit
";

const STATUS_MENU: &str = "\
1) Flight departed
2) Flight arrived
";

/// A menu session over a desk, reading from `input` and writing to `out`.
pub struct Menu<'a, C: Clock, R, W> {
    desk: &'a mut FlightDesk<C>,
    display: &'a DisplayConfig,
    input: R,
    out: W,
}

impl<C: Clock, R, W> fmt::Debug for Menu<'_, C, R, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Menu")
            .field("desk", &self.desk)
            .finish_non_exhaustive()
    }
}

impl<'a, C: Clock, R: BufRead, W: Write> Menu<'a, C, R, W> {
    /// Create a menu session.
    pub fn new(desk: &'a mut FlightDesk<C>, display: &'a DisplayConfig, input: R, out: W) -> Self {
        Self {
            desk,
            display,
            input,
            out,
        }
    }

    /// Run until the user quits or input ends.
    ///
    /// # Errors
    ///
    /// Returns storage, configuration and I/O failures. Errors the user can
    /// correct are printed instead.
    pub fn run(&mut self) -> Result<()> {
        loop {
            write!(self.out, "{MAIN_MENU}")?;
            let outcome = match self.prompt("> ") {
                Ok(choice) => match choice.as_str() {
                    "1" => self.list_flights(),
                    "2" => self.search_flights(),
                    "3" => self.create_flight(),
                    "4" => self.assign_pilot(),
                    "5" => self.onboard_pilot(),
                    "6" => self.update_status(),
                    "q" | "Q" => return Ok(()),
                    _ => self.say("Unrecognised input"),
                },
                Err(e) => Err(e),
            };

            match outcome {
                Ok(()) => {}
                Err(Error::Io(e)) if e.kind() == io::ErrorKind::UnexpectedEof => {
                    debug!("Input closed, leaving menu");
                    return Ok(());
                }
                Err(e) if e.is_domain_error() => self.say(&format!("Error: {e}"))?,
                Err(e) => return Err(e),
            }
        }
    }

    fn say(&mut self, message: &str) -> Result<()> {
        writeln!(self.out, "{message}")?;
        Ok(())
    }

    /// Print `label` and read one trimmed line.
    fn prompt(&mut self, label: &str) -> Result<String> {
        write!(self.out, "{label}")?;
        self.out.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::from(io::ErrorKind::UnexpectedEof).into());
        }
        Ok(line.trim().to_string())
    }

    /// Prompt until `parse` accepts the answer.
    fn prompt_until<T>(
        &mut self,
        label: &str,
        mut parse: impl FnMut(&str) -> Result<T>,
    ) -> Result<T> {
        loop {
            let raw = self.prompt(label)?;
            match parse(&raw) {
                Ok(value) => return Ok(value),
                Err(Error::MalformedInput { expected, .. }) => {
                    self.say(&format!("Invalid input, please use format: {expected}"))?;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn prompt_destination(&mut self, label: &str) -> Result<String> {
        loop {
            let code = self.prompt(label)?;
            match self.desk.destination(&code) {
                Ok(destination) => return Ok(destination.short_code),
                Err(Error::UnknownDestination { .. }) => {
                    let valid = destinations_table(&self.desk.destinations()?);
                    self.say(&format!(
                        "{code} is not a valid short code, please choose from the following valid options:"
                    ))?;
                    write!(self.out, "{valid}")?;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn prompt_datetime(&mut self, label: &str) -> Result<DateTime<Utc>> {
        loop {
            let raw = self.prompt(label)?;
            match parse_datetime(&raw, &self.display.datetime_format) {
                Ok(instant) => return Ok(instant),
                Err(_) => {
                    let expected = describe_format(&self.display.datetime_format);
                    self.say(&format!("Invalid date supplied, please use format: {expected}"))?;
                }
            }
        }
    }

    /// Prompt until the answer is one of `ids`.
    fn choose_id(&mut self, label: &str, ids: &[i64]) -> Result<i64> {
        loop {
            let raw = self.prompt(label)?;
            match parse_id(&raw) {
                Ok(id) if ids.contains(&id) => return Ok(id),
                _ => {
                    let choices: Vec<String> = ids.iter().map(ToString::to_string).collect();
                    self.say(&format!("Choose from the values: {}", choices.join(", ")))?;
                }
            }
        }
    }

    fn show_flights(&mut self, heading: &str, views: &[FlightView]) -> Result<()> {
        let table = flights_table(views, self.display);
        self.say(heading)?;
        write!(self.out, "{table}")?;
        Ok(())
    }

    fn list_flights(&mut self) -> Result<()> {
        let views = self.desk.list_flights()?;
        let table = flights_table(&views, self.display);
        write!(self.out, "{table}")?;
        Ok(())
    }

    fn search_flights(&mut self) -> Result<()> {
        self.say("Leave blank if not required")?;
        let date_format = self.display.date_format.clone();

        let status = self.prompt_until("Status: ", |raw| optional(raw, parse_status))?;
        let date = self.prompt_until("Date of departure: ", |raw| {
            optional(raw, |raw| parse_date(raw, &date_format))
        })?;
        let pilot_id = self.prompt_until("Pilot ID: ", |raw| optional(raw, parse_id))?;
        let from = self.prompt("Departing from: ")?;
        let to = self.prompt("Flying to: ")?;

        let mut filter = FlightFilter::new();
        if let Some(status) = status {
            filter = filter.status(status);
        }
        if let Some(date) = date {
            filter = filter.departure_date(date);
        }
        if let Some(pilot_id) = pilot_id {
            filter = filter.pilot_id(pilot_id);
        }
        if !from.is_empty() {
            filter = filter.from_destination(from);
        }
        if !to.is_empty() {
            filter = filter.to_destination(to);
        }

        let views = self.desk.search_flights(&filter)?;
        if views.is_empty() {
            self.say("No matching flights")
        } else {
            let table = flights_table(&views, self.display);
            write!(self.out, "{table}")?;
            Ok(())
        }
    }

    fn create_flight(&mut self) -> Result<()> {
        let from_destination = self.prompt_destination("Leaving from: ")?;
        let to_destination = self.prompt_destination("Going to: ")?;
        let scheduled_departure = self.prompt_datetime("Scheduled departure time (UTC): ")?;
        let expected_arrival = self.prompt_datetime("Expected arrival time (UTC): ")?;

        let flight = self.desk.create_flight(&NewFlight {
            from_destination,
            to_destination,
            scheduled_departure,
            expected_arrival,
        })?;
        self.say(&format!("Flight {} scheduled", flight.id))
    }

    fn assign_pilot(&mut self) -> Result<()> {
        let flights = self.desk.flights_without_pilot()?;
        if flights.is_empty() {
            return self.say("No flights require pilots");
        }
        self.show_flights("The following flights have no pilot assigned:", &flights)?;
        let flight_ids: Vec<i64> = flights.iter().map(|f| f.id).collect();
        let flight_id = self.choose_id("Please enter flight ID: ", &flight_ids)?;

        let pilots = self.desk.available_pilots(flight_id)?;
        if pilots.is_empty() {
            return self.say("No available pilots");
        }
        self.say("Following pilots are available:")?;
        write!(self.out, "{}", pilots_table(&pilots))?;
        let pilot_ids: Vec<i64> = pilots.iter().map(|p| p.id).collect();
        let pilot_id = self.choose_id("Please enter pilot ID: ", &pilot_ids)?;

        self.desk.assign_pilot(flight_id, pilot_id)?;
        self.say(&format!("Pilot {pilot_id} assigned to flight {flight_id}"))
    }

    fn onboard_pilot(&mut self) -> Result<()> {
        let first_name = self.prompt("First name: ")?;
        let last_name = self.prompt("Last name: ")?;
        let hours = self.prompt_until("Flight hours: ", parse_hours)?;

        self.desk.create_pilot(&first_name, &last_name, hours)?;
        self.say("Pilot added")
    }

    fn update_status(&mut self) -> Result<()> {
        write!(self.out, "{STATUS_MENU}")?;
        match self.prompt("> ")?.as_str() {
            "1" => self.depart(),
            "2" => self.arrive(),
            _ => self.say("Unrecognised input"),
        }
    }

    fn depart(&mut self) -> Result<()> {
        let flights = self.desk.flights_departing_today()?;
        if flights.is_empty() {
            return self.say("No flights left to depart today");
        }
        self.show_flights("The following flights are scheduled today:", &flights)?;
        let ids: Vec<i64> = flights.iter().map(|f| f.id).collect();
        let flight_id = self.choose_id("Please enter flight ID: ", &ids)?;

        self.desk.depart(flight_id)?;
        self.say(&format!("Flight {flight_id} set to departed"))
    }

    fn arrive(&mut self) -> Result<()> {
        let flights = self.desk.flights_awaiting_arrival()?;
        if flights.is_empty() {
            return self.say("No flights waiting to arrive");
        }
        self.show_flights("The following flights are yet to arrive:", &flights)?;
        let ids: Vec<i64> = flights.iter().map(|f| f.id).collect();
        let flight_id = self.choose_id("Please enter flight ID: ", &ids)?;

        let arrival = self.desk.arrive(flight_id)?;
        self.say(&format!(
            "Flight {flight_id} set to arrived and pilot flight hours updated (+{})",
            arrival.hours_credited
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::config::ScheduleConfig;
    use crate::desk::test_support::{at, desk_at, desk_with, new_flight};
    use crate::model::FlightStatus;

    fn run(desk: &mut FlightDesk<ManualClock>, script: &str) -> String {
        let display = DisplayConfig::default();
        let mut out = Vec::new();
        Menu::new(desk, &display, script.as_bytes(), &mut out)
            .run()
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_quit_and_end_of_input() {
        let mut desk = desk_at(at(1, 8, 0));
        let output = run(&mut desk, "q\n");
        assert!(output.starts_with(MAIN_MENU));
        assert_eq!(output.matches("Get all flights").count(), 1);

        let output = run(&mut desk, "");
        assert_eq!(output.matches("Get all flights").count(), 1);
    }

    #[test]
    fn test_unrecognised_choice() {
        let mut desk = desk_at(at(1, 8, 0));
        let output = run(&mut desk, "7\nq\n");
        assert!(output.contains("Unrecognised input"));
        assert_eq!(output.matches("Get all flights").count(), 2);
    }

    #[test]
    fn test_create_flight_reprompts() {
        let mut desk = desk_at(at(1, 8, 0));
        let output = run(
            &mut desk,
            "3\nXYZ\nLHR\nJFK\ntomorrow\n09:00 11/06/2024\n17:00 11/06/2024\nq\n",
        );

        assert!(output.contains("XYZ is not a valid short code"));
        assert!(output.contains("| JFK        | New York JFK    |"));
        assert!(output.contains("Invalid date supplied, please use format: HH:MM dd/mm/YYYY"));
        assert!(output.contains("Flight 1 scheduled"));

        let flight = desk.flight(1).unwrap();
        assert_eq!(flight.from_destination, "LHR");
        assert_eq!(flight.scheduled_departure, at(11, 9, 0));
        assert_eq!(flight.expected_arrival, at(11, 17, 0));
    }

    #[test]
    fn test_create_flight_rejection_keeps_menu_running() {
        let schedule = ScheduleConfig {
            require_arrival_after_departure: true,
            ..ScheduleConfig::default()
        };
        let mut desk = desk_with(at(1, 8, 0), schedule);
        let output = run(
            &mut desk,
            "3\nLHR\nJFK\n17:00 11/06/2024\n09:00 11/06/2024\n1\nq\n",
        );

        assert!(output.contains("Error: "));
        assert!(output.contains("FLIGHT_ID"));
        assert!(desk.list_flights().unwrap().is_empty());
    }

    #[test]
    fn test_assign_pilot_flow() {
        let mut desk = desk_at(at(1, 8, 0));
        let pilot = desk.create_pilot("Amelia", "Earhart", 0).unwrap();
        let flight = desk
            .create_flight(&new_flight(at(5, 9, 0), at(5, 17, 0)))
            .unwrap();

        let output = run(&mut desk, "4\n99\n1\nabc\n1\nq\n");
        assert!(output.contains("The following flights have no pilot assigned:"));
        assert!(output.contains("Choose from the values: 1"));
        assert!(output.contains("Following pilots are available:"));
        assert!(output.contains("Pilot 1 assigned to flight 1"));
        assert_eq!(desk.flight(flight.id).unwrap().pilot_id, Some(pilot.id));

        let output = run(&mut desk, "4\nq\n");
        assert!(output.contains("No flights require pilots"));
    }

    #[test]
    fn test_assign_pilot_without_available_pilots() {
        let mut desk = desk_at(at(1, 8, 0));
        let pilot = desk.create_pilot("Amelia", "Earhart", 0).unwrap();
        let first = desk
            .create_flight(&new_flight(at(5, 9, 0), at(5, 17, 0)))
            .unwrap();
        desk.create_flight(&new_flight(at(5, 20, 0), at(6, 4, 0)))
            .unwrap();
        desk.assign_pilot(first.id, pilot.id).unwrap();

        let output = run(&mut desk, "4\n2\nq\n");
        assert!(output.contains("No available pilots"));
    }

    #[test]
    fn test_onboard_pilot() {
        let mut desk = desk_at(at(1, 8, 0));
        let output = run(&mut desk, "5\nChuck\nYeager\nlots\n12\nq\n");

        assert!(output.contains("Invalid input, please use format: a non-negative whole number of hours"));
        assert!(output.contains("Pilot added"));
        let pilot = desk.pilot(1).unwrap();
        assert_eq!(pilot.full_name(), "Chuck Yeager");
        assert_eq!(pilot.flight_hours, 12);
    }

    #[test]
    fn test_update_status_flow() {
        let mut desk = desk_at(at(10, 9, 5));
        let pilot = desk.create_pilot("Amelia", "Earhart", 10).unwrap();
        let flight = desk
            .create_flight(&new_flight(at(10, 9, 0), at(10, 12, 0)))
            .unwrap();

        let output = run(&mut desk, "6\n2\nq\n");
        assert!(output.contains("No flights waiting to arrive"));

        let output = run(&mut desk, "6\n1\nq\n");
        assert!(output.contains("No flights left to depart today"));

        desk.assign_pilot(flight.id, pilot.id).unwrap();
        let output = run(&mut desk, "6\n1\n1\nq\n");
        assert!(output.contains("The following flights are scheduled today:"));
        assert!(output.contains("Flight 1 set to departed"));

        desk.clock().set(at(10, 12, 40));
        let output = run(&mut desk, "6\n2\n1\nq\n");
        assert!(output.contains("The following flights are yet to arrive:"));
        assert!(output.contains("Flight 1 set to arrived and pilot flight hours updated (+4)"));
        assert_eq!(desk.flight(flight.id).unwrap().status, FlightStatus::Arrived);
        assert_eq!(desk.pilot(pilot.id).unwrap().flight_hours, 14);
    }

    #[test]
    fn test_search_flights() {
        let mut desk = desk_at(at(1, 8, 0));
        desk.create_flight(&new_flight(at(2, 9, 0), at(2, 17, 0)))
            .unwrap();
        desk.create_flight(&new_flight(at(3, 9, 0), at(3, 17, 0)))
            .unwrap();

        let output = run(&mut desk, "2\nlanded\nscheduled\n3/6\n03/06/2024\n\n\n\nq\n");
        assert!(output.contains("Invalid input, please use format: dd/mm/YYYY"));
        assert!(output.contains("09:00 03/06/2024"));
        assert!(!output.contains("09:00 02/06/2024"));

        let output = run(&mut desk, "2\narrived\n\n\n\n\nq\n");
        assert!(output.contains("No matching flights"));
    }

    #[test]
    fn test_end_of_input_mid_action() {
        let mut desk = desk_at(at(1, 8, 0));
        let output = run(&mut desk, "3\nLHR\n");
        assert!(output.ends_with("Going to: "));
        assert!(desk.list_flights().unwrap().is_empty());
    }
}
