//! Command-line interface for flightdesk.
//!
//! This module provides the CLI structure, the command handlers and the
//! interactive menu of the `flightdesk` binary.

mod commands;
pub mod handlers;
pub mod input;
pub mod menu;
pub mod render;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::logging::Verbosity;

pub use commands::{
    ConfigCommand, CreateFlightCommand, DestinationsCommand, FlightsCommand, ListArgs,
    OutputFormat, PilotsCommand, SearchCommand, StatusArg,
};

/// flightdesk - Schedule flights, staff them with rested pilots and track
/// them from departure to arrival
#[derive(Debug, Parser)]
#[command(name = "flightdesk")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Schedule, staff and track flights
    #[command(subcommand)]
    Flights(FlightsCommand),

    /// Manage pilots
    #[command(subcommand)]
    Pilots(PilotsCommand),

    /// Manage destinations
    #[command(subcommand)]
    Destinations(DestinationsCommand),

    /// Run the interactive menu
    Menu,

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.verbose)
    }
}
