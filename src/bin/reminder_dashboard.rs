//! # Reminder Dashboard
//!
//! Seeds a few medication reminders, prints them in urgency order, then
//! acknowledges the most urgent one.
//!
//! Usage: `cargo run --bin reminder-dashboard [-- --json]`

use anyhow::Result;
use chrono::{Duration, Utc};
use dotenvy::dotenv;
use log::{error, info};
use serde::Serialize;

use meditrack::core::{Config, SchedulerConfig, SystemClock};
use meditrack::features::reminders::{ReminderScheduler, ReminderView};

/// Caller-owned record the scheduler carries as an opaque payload
#[derive(Debug, Serialize)]
struct Medication {
    name: String,
    dosage: String,
}

impl Medication {
    fn new(name: &str, dosage: &str) -> Self {
        Self {
            name: name.to_string(),
            dosage: dosage.to_string(),
        }
    }
}

fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let mut config = Config::from_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    info!("Starting reminder dashboard...");

    match SchedulerConfig::load(&config.scheduler_config_path) {
        Ok(scheduler_config) => {
            info!("Loaded scheduler config from {}", config.scheduler_config_path);
            config.scheduler = scheduler_config;
        }
        Err(e) => {
            if std::path::Path::new(&config.scheduler_config_path).exists() {
                error!(
                    "Failed to load scheduler config from {}: {e}",
                    config.scheduler_config_path
                );
                return Err(e);
            }
            info!(
                "No {} found - using environment settings",
                config.scheduler_config_path
            );
        }
    }

    let json = std::env::args().skip(1).any(|arg| arg == "--json");

    let mut scheduler = ReminderScheduler::with_config(&config.scheduler, SystemClock);
    let now = Utc::now();
    scheduler.schedule(
        Medication::new("Lisinopril", "10mg"),
        now + Duration::hours(1),
        3,
    )?;
    scheduler.schedule(
        Medication::new("Metformin", "500mg"),
        now + Duration::hours(2),
        4,
    )?;
    scheduler.schedule(
        Medication::new("Ibuprofen", "200mg"),
        now + Duration::hours(4),
        2,
    )?;

    let rows = scheduler.listing();
    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        print_table(&rows);
    }

    let due_soon = scheduler.due_soon();
    println!(
        "\n{} reminder(s) due within {} minutes",
        due_soon.len(),
        config.scheduler.due_soon_minutes
    );

    if let Some(taken) = scheduler.acknowledge_highest() {
        println!("Took {} ({})", taken.name, taken.dosage);
    }
    println!("{} reminder(s) remaining", scheduler.len());

    Ok(())
}

fn print_table(rows: &[ReminderView<'_, Medication>]) {
    println!(
        "{:<17} {:<12} {:<8} {:>8} {:>6}",
        "Due", "Medication", "Dosage", "Priority", "Rank"
    );
    for row in rows {
        let flag = if row.overdue { " (overdue)" } else { "" };
        println!(
            "{:<17} {:<12} {:<8} {:>8} {:>6}{}",
            row.due_at.format("%Y-%m-%d %H:%M"),
            row.payload.name,
            row.payload.dosage,
            row.base_level,
            row.rank,
            flag
        );
    }
}
