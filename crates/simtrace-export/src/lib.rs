//! # simtrace-export
//!
//! CSV export of location observation views.
//!
//! The export consumes the store's query interface: callers pass whatever
//! filtered, ordered slice of the log they are looking at, plus a device
//! name lookup, and get back a CSV document with one row per observation.
//! Text fields (including the address) are quoted; latitude and longitude
//! stay bare numbers.

use chrono::{NaiveDate, SecondsFormat};
use csv::{QuoteStyle, WriterBuilder};
use simtrace_core::LocationEntry;
use std::collections::HashMap;
use std::io::Write;
use thiserror::Error;
use uuid::Uuid;

/// Column order of the export.
pub const CSV_HEADER: [&str; 8] = [
    "Timestamp",
    "Phone Number",
    "Device Name",
    "IMSI",
    "IMEI",
    "Latitude",
    "Longitude",
    "Address",
];

/// Name shown for observations whose device no longer exists.
const UNKNOWN_DEVICE: &str = "Unknown";

/// Errors that can occur while exporting.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV writing failed.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Underlying writer failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Write `entries` as CSV in the given (filtered-view) order.
///
/// `device_names` maps device IDs to display names; observations for
/// devices missing from the map fall back to `"Unknown"`.
pub fn write_csv<W: Write>(
    writer: W,
    entries: &[LocationEntry],
    device_names: &HashMap<Uuid, String>,
) -> Result<(), ExportError> {
    let mut csv = WriterBuilder::new()
        .quote_style(QuoteStyle::NonNumeric)
        .from_writer(writer);

    csv.write_record(CSV_HEADER)?;
    for entry in entries {
        let name = device_names
            .get(&entry.sim_id)
            .map(String::as_str)
            .unwrap_or(UNKNOWN_DEVICE);
        csv.write_record([
            entry
                .timestamp
                .to_rfc3339_opts(SecondsFormat::Secs, true)
                .as_str(),
            entry.phone_number.as_str(),
            name,
            entry.imsi.as_str(),
            entry.imei.as_str(),
            entry.latitude.to_string().as_str(),
            entry.longitude.to_string().as_str(),
            entry.address.as_str(),
        ])?;
    }
    csv.flush()?;
    Ok(())
}

/// Render `entries` to a CSV string.
pub fn to_csv_string(
    entries: &[LocationEntry],
    device_names: &HashMap<Uuid, String>,
) -> Result<String, ExportError> {
    let mut buf = Vec::new();
    write_csv(&mut buf, entries, device_names)?;
    // The writer only ever produces UTF-8.
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Export filename for a given date: `location-history-YYYY-MM-DD.csv`.
pub fn export_filename(date: NaiveDate) -> String {
    format!("location-history-{}.csv", date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn entry(sim_id: Uuid, address: &str) -> LocationEntry {
        LocationEntry {
            id: Uuid::new_v4(),
            sim_id,
            phone_number: "+1234567890".to_string(),
            imsi: "310260123456789".to_string(),
            imei: "123456789012345".to_string(),
            latitude: 40.7128,
            longitude: -74.006,
            address: address.to_string(),
            timestamp: "2024-01-15T10:30:00Z".parse::<DateTime<Utc>>().unwrap(),
        }
    }

    #[test]
    fn test_two_rows_produce_three_lines() {
        let sim_id = Uuid::new_v4();
        let entries = vec![entry(sim_id, "New York, NY, USA"), entry(sim_id, "Boston")];
        let names = HashMap::from([(sim_id, "Primary Device".to_string())]);

        let out = to_csv_string(&entries, &names).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);

        // Header order matches the documented columns.
        assert_eq!(
            lines[0],
            r#""Timestamp","Phone Number","Device Name","IMSI","IMEI","Latitude","Longitude","Address""#
        );
    }

    #[test]
    fn test_address_is_quoted_and_coordinates_are_bare() {
        let sim_id = Uuid::new_v4();
        let entries = vec![entry(sim_id, "New York, NY, USA")];
        let names = HashMap::from([(sim_id, "Primary Device".to_string())]);

        let out = to_csv_string(&entries, &names).unwrap();
        let row = out.lines().nth(1).unwrap();

        assert!(row.contains(r#""New York, NY, USA""#));
        assert!(row.contains("40.7128"));
        assert!(!row.contains(r#""40.7128""#));
    }

    #[test]
    fn test_unknown_device_fallback() {
        let entries = vec![entry(Uuid::new_v4(), "Somewhere")];
        let out = to_csv_string(&entries, &HashMap::new()).unwrap();
        assert!(out.lines().nth(1).unwrap().contains(r#""Unknown""#));
    }

    #[test]
    fn test_export_filename() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(export_filename(date), "location-history-2024-01-15.csv");
    }
}
