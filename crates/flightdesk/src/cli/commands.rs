//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::model::FlightStatus;

/// Flight scheduling and status commands.
#[derive(Debug, Subcommand)]
pub enum FlightsCommand {
    /// List every flight
    List(ListArgs),

    /// Search flights by status, date, pilot or destination
    Search(SearchCommand),

    /// Schedule a new flight
    Create(CreateFlightCommand),

    /// List flights that still need a pilot
    Unassigned(ListArgs),

    /// List staffed flights departing today
    Today(ListArgs),

    /// List flights that have departed and not yet arrived
    Airborne(ListArgs),

    /// List pilots available to fly a flight
    Available {
        /// Flight ID
        flight: i64,

        /// Output options
        #[command(flatten)]
        list: ListArgs,
    },

    /// Assign a pilot to a flight
    Assign {
        /// Flight ID
        flight: i64,

        /// Pilot ID
        pilot: i64,
    },

    /// Mark a flight as departed
    Depart {
        /// Flight ID
        flight: i64,
    },

    /// Mark a flight as arrived and credit the pilot's hours
    Arrive {
        /// Flight ID
        flight: i64,
    },
}

/// Flight search arguments. Every criterion is optional.
#[derive(Debug, Args)]
pub struct SearchCommand {
    /// Filter by status
    #[arg(short, long, value_enum)]
    pub status: Option<StatusArg>,

    /// Filter by departure date (e.g. "15/08/2024")
    #[arg(short, long)]
    pub date: Option<String>,

    /// Filter by assigned pilot ID
    #[arg(short, long)]
    pub pilot: Option<i64>,

    /// Filter by departure destination code
    #[arg(long)]
    pub from: Option<String>,

    /// Filter by arrival destination code
    #[arg(long)]
    pub to: Option<String>,

    /// Output options
    #[command(flatten)]
    pub list: ListArgs,
}

/// New flight arguments.
#[derive(Debug, Args)]
pub struct CreateFlightCommand {
    /// Departure destination code
    #[arg(long)]
    pub from: String,

    /// Arrival destination code
    #[arg(long)]
    pub to: String,

    /// Scheduled departure, UTC (e.g. "09:30 15/08/2024")
    #[arg(long)]
    pub departure: String,

    /// Expected arrival, UTC
    #[arg(long)]
    pub arrival: String,
}

/// Pilot commands.
#[derive(Debug, Subcommand)]
pub enum PilotsCommand {
    /// List every pilot
    List(ListArgs),

    /// Onboard a pilot
    Add {
        /// First name
        first_name: String,

        /// Last name
        last_name: String,

        /// Flight hours already logged
        #[arg(long, default_value_t = 0)]
        hours: u32,
    },
}

/// Destination commands.
#[derive(Debug, Subcommand)]
pub enum DestinationsCommand {
    /// List every destination
    List(ListArgs),

    /// Register a destination
    Add {
        /// Short code (e.g. "LHR")
        code: String,

        /// Full name
        name: String,
    },
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Options shared by listing commands.
#[derive(Debug, Clone, Copy, Default, Args)]
pub struct ListArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Flight status argument for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatusArg {
    /// Not yet departed
    Scheduled,
    /// In the air
    Departed,
    /// Landed
    Arrived,
}

impl From<StatusArg> for FlightStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Scheduled => Self::Scheduled,
            StatusArg::Departed => Self::Departed,
            StatusArg::Arrived => Self::Arrived,
        }
    }
}

/// Output format for listing commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Bordered table
    #[default]
    Table,
    /// One record per line
    Plain,
    /// JSON output
    Json,
}
