//! Text rendering of records as bordered tables, plain lines or JSON.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::DisplayConfig;
use crate::error::Result;
use crate::model::{Destination, FlightView, Pilot};

use super::commands::OutputFormat;

/// A grid of text cells with a header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Create an empty table with the given column headers.
    #[must_use]
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row; missing cells render empty and extra cells are dropped.
    pub fn add_row(&mut self, row: Vec<String>) {
        let mut row = row;
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
    }

    /// Number of data rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no data rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn widths(&self) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                self.rows
                    .iter()
                    .map(|row| row[i].chars().count())
                    .chain(std::iter::once(header.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let widths = self.widths();

        let border = |f: &mut fmt::Formatter<'_>| -> fmt::Result {
            for width in &widths {
                write!(f, "+{}", "-".repeat(width + 2))?;
            }
            writeln!(f, "+")
        };
        let line = |f: &mut fmt::Formatter<'_>, cells: &[String]| -> fmt::Result {
            for (cell, width) in cells.iter().zip(&widths) {
                write!(f, "| {cell:<width$} ")?;
            }
            writeln!(f, "|")
        };

        border(f)?;
        line(f, &self.headers)?;
        border(f)?;
        for row in &self.rows {
            line(f, row)?;
        }
        border(f)
    }
}

fn instant(value: &DateTime<Utc>, display: &DisplayConfig) -> String {
    value.format(&display.datetime_format).to_string()
}

fn optional_instant(value: Option<&DateTime<Utc>>, display: &DisplayConfig) -> String {
    value.map(|v| instant(v, display)).unwrap_or_default()
}

/// Flights as a table with the columns of the full listing.
#[must_use]
pub fn flights_table(views: &[FlightView], display: &DisplayConfig) -> Table {
    let mut table = Table::new([
        "FLIGHT_ID",
        "STATUS",
        "SCHEDULED_DEPARTURE",
        "EXPECTED_ARRIVAL",
        "PILOT",
        "FROM",
        "TO",
        "ACTUAL_DEPARTURE",
        "ACTUAL_ARRIVAL",
    ]);
    for view in views {
        table.add_row(vec![
            view.id.to_string(),
            view.status.to_string(),
            instant(&view.scheduled_departure, display),
            instant(&view.expected_arrival, display),
            view.pilot_name.clone().unwrap_or_default(),
            view.from_name.clone(),
            view.to_name.clone(),
            optional_instant(view.actual_departure.as_ref(), display),
            optional_instant(view.actual_arrival.as_ref(), display),
        ]);
    }
    table
}

/// Pilots as an id/name/hours table.
#[must_use]
pub fn pilots_table(pilots: &[Pilot]) -> Table {
    let mut table = Table::new(["PILOT_ID", "NAME", "FLIGHT_HOURS"]);
    for pilot in pilots {
        table.add_row(vec![
            pilot.id.to_string(),
            pilot.full_name(),
            pilot.flight_hours.to_string(),
        ]);
    }
    table
}

/// Destinations as a code/name table.
#[must_use]
pub fn destinations_table(destinations: &[Destination]) -> Table {
    let mut table = Table::new(["SHORT_CODE", "FULL_NAME"]);
    for destination in destinations {
        table.add_row(vec![
            destination.short_code.clone(),
            destination.full_name.clone(),
        ]);
    }
    table
}

/// One line per flight.
#[must_use]
pub fn flights_plain(views: &[FlightView], display: &DisplayConfig) -> String {
    views
        .iter()
        .map(|view| {
            let pilot = view.pilot_name.as_deref().unwrap_or("no pilot");
            format!(
                "#{} {} {} -> {} {} - {} ({})\n",
                view.id,
                view.status,
                view.from_code,
                view.to_code,
                instant(&view.scheduled_departure, display),
                instant(&view.expected_arrival, display),
                pilot
            )
        })
        .collect()
}

/// One line per pilot.
#[must_use]
pub fn pilots_plain(pilots: &[Pilot]) -> String {
    pilots
        .iter()
        .map(|p| format!("#{} {} ({} hours)\n", p.id, p.full_name(), p.flight_hours))
        .collect()
}

/// One line per destination.
#[must_use]
pub fn destinations_plain(destinations: &[Destination]) -> String {
    destinations
        .iter()
        .map(|d| format!("{} {}\n", d.short_code, d.full_name))
        .collect()
}

fn json<T: Serialize + ?Sized>(records: &T) -> Result<String> {
    Ok(format!("{}\n", serde_json::to_string_pretty(records)?))
}

/// Render flights in the requested format.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn flights(views: &[FlightView], format: OutputFormat, display: &DisplayConfig) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(flights_table(views, display).to_string()),
        OutputFormat::Plain => Ok(flights_plain(views, display)),
        OutputFormat::Json => json(views),
    }
}

/// Render pilots in the requested format.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn pilots(pilots: &[Pilot], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(pilots_table(pilots).to_string()),
        OutputFormat::Plain => Ok(pilots_plain(pilots)),
        OutputFormat::Json => json(pilots),
    }
}

/// Render destinations in the requested format.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn destinations(destinations: &[Destination], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(destinations_table(destinations).to_string()),
        OutputFormat::Plain => Ok(destinations_plain(destinations)),
        OutputFormat::Json => json(destinations),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FlightStatus;
    use chrono::TimeZone;

    fn view() -> FlightView {
        FlightView {
            id: 7,
            status: FlightStatus::Departed,
            scheduled_departure: Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap(),
            expected_arrival: Utc.with_ymd_and_hms(2024, 6, 1, 17, 5, 0).unwrap(),
            actual_departure: Some(Utc.with_ymd_and_hms(2024, 6, 1, 9, 12, 0).unwrap()),
            actual_arrival: None,
            pilot_id: Some(1),
            pilot_name: Some("Amelia Earhart".to_string()),
            from_code: "LHR".to_string(),
            from_name: "London Heathrow".to_string(),
            to_code: "JFK".to_string(),
            to_name: "New York JFK".to_string(),
        }
    }

    #[test]
    fn test_table_layout() {
        let mut table = Table::new(["ID", "NAME"]);
        table.add_row(vec!["1".to_string(), "Amelia".to_string()]);
        table.add_row(vec!["22".to_string()]);

        let expected = "\
+----+--------+
| ID | NAME   |
+----+--------+
| 1  | Amelia |
| 22 |        |
+----+--------+
";
        assert_eq!(table.to_string(), expected);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_empty_table_has_header() {
        let table = Table::new(["A"]);
        assert!(table.is_empty());
        assert_eq!(table.to_string(), "+---+\n| A |\n+---+\n+---+\n");
    }

    #[test]
    fn test_flights_table_uses_display_format() {
        let rendered = flights_table(&[view()], &DisplayConfig::default()).to_string();
        assert!(rendered.contains("09:00 01/06/2024"));
        assert!(rendered.contains("09:12 01/06/2024"));
        assert!(rendered.contains("Amelia Earhart"));
        assert!(rendered.contains("London Heathrow"));
        assert!(rendered.contains("Departed"));
    }

    #[test]
    fn test_flights_plain() {
        let rendered = flights_plain(&[view()], &DisplayConfig::default());
        assert_eq!(
            rendered,
            "#7 Departed LHR -> JFK 09:00 01/06/2024 - 17:05 01/06/2024 (Amelia Earhart)\n"
        );
    }

    #[test]
    fn test_flights_json() {
        let rendered = flights(&[view()], OutputFormat::Json, &DisplayConfig::default()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed[0]["id"], 7);
        assert_eq!(parsed[0]["from_code"], "LHR");
    }

    #[test]
    fn test_pilots_and_destinations() {
        let pilot = Pilot {
            id: 3,
            first_name: "Chuck".to_string(),
            last_name: "Yeager".to_string(),
            flight_hours: 12,
        };
        assert_eq!(pilots_plain(&[pilot.clone()]), "#3 Chuck Yeager (12 hours)\n");
        assert!(pilots(&[pilot], OutputFormat::Table)
            .unwrap()
            .contains("FLIGHT_HOURS"));

        let destination = Destination {
            short_code: "CDG".to_string(),
            full_name: "Paris".to_string(),
        };
        assert_eq!(destinations_plain(&[destination.clone()]), "CDG Paris\n");
        assert!(destinations(&[destination], OutputFormat::Json)
            .unwrap()
            .contains("\"short_code\": \"CDG\""));
    }
}
