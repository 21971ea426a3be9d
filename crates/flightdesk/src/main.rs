//! `flightdesk` - CLI for the flight desk
//!
//! This binary schedules flights, staffs them and records departures and
//! arrivals, either one command at a time or through the interactive menu.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::io::{self, Write};

use anyhow::Context;
use clap::Parser;

use flightdesk::cli::menu::Menu;
use flightdesk::cli::{handlers, Cli, Command};
use flightdesk::{init_logging, Config, FlightDesk};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone()).context("failed to load configuration")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        // Configuration commands never open the database
        Command::Config(config_cmd) => handlers::config(&config, config_cmd, &mut out)?,
        Command::Flights(flights_cmd) => {
            let mut desk = open_desk(&config)?;
            handlers::flights(&mut desk, &config.display, flights_cmd, &mut out)?;
        }
        Command::Pilots(pilots_cmd) => {
            let mut desk = open_desk(&config)?;
            handlers::pilots(&mut desk, pilots_cmd, &mut out)?;
        }
        Command::Destinations(destinations_cmd) => {
            let mut desk = open_desk(&config)?;
            handlers::destinations(&mut desk, destinations_cmd, &mut out)?;
        }
        Command::Menu => {
            let mut desk = open_desk(&config)?;
            let stdin = io::stdin();
            Menu::new(&mut desk, &config.display, stdin.lock(), &mut out).run()?;
        }
    }

    out.flush()?;
    Ok(())
}

fn open_desk(config: &Config) -> anyhow::Result<FlightDesk> {
    FlightDesk::from_config(config).with_context(|| {
        format!(
            "failed to open database {}",
            config.database_path().display()
        )
    })
}
