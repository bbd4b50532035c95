//! Observation log commands.
//!
//! `simtrace history list|recent|search` - Inspect the log.
//! `simtrace history export` - Write the filtered view as CSV.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Subcommand;
use simtrace_core::LocationEntry;
use simtrace_export::{export_filename, write_csv};
use simtrace_store::SimStore;
use std::collections::HashMap;
use std::fs::File;
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Subcommand, Debug)]
pub enum HistoryCommand {
    /// List observations, optionally filtered to one device or date.
    List {
        /// Only observations for this device.
        #[arg(long)]
        sim: Option<Uuid>,
        /// Only observations on this date (YYYY-MM-DD).
        #[arg(long)]
        date: Option<String>,
    },

    /// The newest observations.
    Recent {
        #[arg(default_value_t = 5)]
        count: usize,
    },

    /// Search by phone number, IMSI, IMEI or address.
    Search { query: String },

    /// Export the filtered view as CSV.
    Export {
        /// Substring filter, as in `history search`.
        #[arg(long)]
        query: Option<String>,
        /// Date filter (YYYY-MM-DD).
        #[arg(long)]
        date: Option<String>,
        /// Device filter.
        #[arg(long)]
        sim: Option<Uuid>,
        /// Output path; defaults to location-history-<today>.csv.
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

pub fn run(store: &SimStore, cmd: HistoryCommand) -> Result<()> {
    match cmd {
        HistoryCommand::List { sim, date } => {
            let entries = match (sim, date) {
                (Some(id), None) => store.history_for_sim(id),
                (None, Some(date)) => store.history_on_date(&date),
                (Some(id), Some(date)) => filtered_view(store, None, Some(&date), Some(id)),
                (None, None) => store.history(),
            };
            print_entries(&entries);
        }
        HistoryCommand::Recent { count } => print_entries(&store.recent_history(count)),
        HistoryCommand::Search { query } => print_entries(&store.search_history(&query)),
        HistoryCommand::Export {
            query,
            date,
            sim,
            out,
        } => {
            let entries = filtered_view(store, query.as_deref(), date.as_deref(), sim);
            let names: HashMap<Uuid, String> = store
                .sims()
                .into_iter()
                .map(|sim| (sim.id, sim.name))
                .collect();

            let path = out.unwrap_or_else(|| PathBuf::from(export_filename(Utc::now().date_naive())));
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            write_csv(file, &entries, &names)?;
            println!("Exported {} observations to {}", entries.len(), path.display());
        }
    }
    Ok(())
}

/// Compose the view filters the way the history page does: substring
/// search first, then date prefix, then device.
fn filtered_view(
    store: &SimStore,
    query: Option<&str>,
    date: Option<&str>,
    sim: Option<Uuid>,
) -> Vec<LocationEntry> {
    let mut entries = match query {
        Some(q) => store.search_history(q),
        None => store.history(),
    };
    if let Some(date) = date {
        entries.retain(|e| {
            e.timestamp
                .to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
                .starts_with(date)
        });
    }
    if let Some(id) = sim {
        entries.retain(|e| e.sim_id == id);
    }
    entries
}

fn print_entries(entries: &[LocationEntry]) {
    if entries.is_empty() {
        println!("No observations found");
        return;
    }
    for entry in entries {
        println!(
            "{}  {:<14} {:>9.4} {:>9.4}  {}",
            entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
            entry.phone_number,
            entry.latitude,
            entry.longitude,
            entry.address
        );
    }
}
