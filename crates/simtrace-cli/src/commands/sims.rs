//! Device roster commands.
//!
//! `simtrace sims list|search|add|update|delete|stats` plus the top-level
//! `simtrace track <id>` workflow.

use anyhow::{Result, bail};
use clap::Subcommand;
use simtrace_core::{NewSim, SimCard, SimPatch, SimStatus};
use simtrace_store::SimStore;
use std::time::Duration;
use uuid::Uuid;

#[derive(Subcommand, Debug)]
pub enum SimsCommand {
    /// List all devices.
    List,

    /// Search devices by phone number, name or remarks.
    Search { query: String },

    /// Register a new device.
    Add {
        phone_number: String,
        name: String,
        #[arg(long, default_value = "")]
        remarks: String,
        /// Initial status: 'active', 'inactive' or 'tracking'.
        #[arg(long, default_value = "inactive")]
        status: SimStatus,
        #[arg(long)]
        imsi: Option<String>,
        #[arg(long)]
        imei: Option<String>,
    },

    /// Update fields of a device.
    Update {
        id: Uuid,
        #[arg(long)]
        phone_number: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        remarks: Option<String>,
        #[arg(long)]
        status: Option<SimStatus>,
        #[arg(long)]
        imsi: Option<String>,
        #[arg(long)]
        imei: Option<String>,
    },

    /// Delete a device and its observations.
    Delete { id: Uuid },

    /// Device counts by status.
    Stats,
}

pub fn run(store: &SimStore, cmd: SimsCommand) -> Result<()> {
    match cmd {
        SimsCommand::List => print_sims(&store.sims()),
        SimsCommand::Search { query } => print_sims(&store.search_sims(&query)),
        SimsCommand::Add {
            phone_number,
            name,
            remarks,
            status,
            imsi,
            imei,
        } => {
            let sim = store.add_sim(NewSim {
                phone_number,
                name,
                remarks,
                status,
                last_location: None,
                imsi,
                imei,
            });
            println!("Registered device '{}' ({})", sim.name, sim.id);
        }
        SimsCommand::Update {
            id,
            phone_number,
            name,
            remarks,
            status,
            imsi,
            imei,
        } => {
            let patch = SimPatch {
                phone_number,
                name,
                remarks,
                status,
                last_location: None,
                imsi,
                imei,
            };
            if patch.is_empty() {
                bail!("nothing to update: supply at least one field");
            }
            if store.get_sim(id).is_none() {
                bail!("no device with id {}", id);
            }
            store.update_sim(id, patch);
            println!("Updated device {}", id);
        }
        SimsCommand::Delete { id } => {
            store.delete_sim(id);
            println!("Deleted device {}", id);
        }
        SimsCommand::Stats => {
            let stats = store.stats();
            println!("Total:    {}", stats.total);
            println!("Active:   {}", stats.active);
            println!("Inactive: {}", stats.inactive);
            println!("Tracking: {}", stats.tracking);
        }
    }
    Ok(())
}

/// Request a tracking fix and wait past the configured delay for it to land.
pub async fn track(store: &SimStore, id: Uuid, delay: Duration) -> Result<()> {
    if store.get_sim(id).is_none() {
        bail!("no device with id {}", id);
    }

    store.start_tracking(id);
    println!("Tracking requested, waiting {:?} for a fix...", delay);
    tokio::time::sleep(delay + Duration::from_millis(250)).await;

    let sim = store
        .get_sim(id)
        .ok_or_else(|| anyhow::anyhow!("device {} disappeared while tracking", id))?;
    match &sim.last_location {
        Some(location) => println!(
            "Fix for '{}': {:.4}, {:.4} ({}) at {}",
            sim.name,
            location.latitude,
            location.longitude,
            location.address,
            location.timestamp.to_rfc3339()
        ),
        None => println!("No fix landed for '{}'", sim.name),
    }
    Ok(())
}

fn print_sims(sims: &[SimCard]) {
    if sims.is_empty() {
        println!("No devices found");
        return;
    }
    for sim in sims {
        let location = sim
            .last_location
            .as_ref()
            .map(|l| format!("{:.4}, {:.4}", l.latitude, l.longitude))
            .unwrap_or_else(|| "no fix".to_string());
        println!(
            "{}  {:<14} {:<10} {:<16} {}",
            sim.id, sim.phone_number, sim.status, location, sim.name
        );
    }
}
