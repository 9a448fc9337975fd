//! # Slot Availability Report
//!
//! Prints which delivery slots can still be ordered, and whether the store
//! is closed or in the fasting period.
//!
//! ## Usage
//! ```bash
//! # Evaluate now, with the default config file
//! cargo run -p foodrun-engine --bin slots
//!
//! # Use a specific config file
//! cargo run -p foodrun-engine --bin slots -- --config ./engine.toml
//!
//! # Evaluate at a fixed instant, as JSON
//! cargo run -p foodrun-engine --bin slots -- --at 2024-06-03T02:00:00Z --json
//! ```

use std::env;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use foodrun_engine::{init_tracing, Clock, EngineConfig, FixedClock, OrderEngine};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut config_path: Option<PathBuf> = None;
    let mut at: Option<DateTime<Utc>> = None;
    let mut json = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--at" | "-a" => {
                if i + 1 < args.len() {
                    let parsed = DateTime::parse_from_rfc3339(&args[i + 1])?;
                    at = Some(parsed.with_timezone(&Utc));
                    i += 1;
                }
            }
            "--json" => json = true,
            "--help" | "-h" => {
                println!("FoodRun Slot Availability");
                println!();
                println!("Usage: slots [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --config <PATH>   Config file (default: platform config dir)");
                println!("  -a, --at <RFC3339>    Evaluate at this instant instead of now");
                println!("      --json            Print the report as JSON");
                println!("  -h, --help            Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    init_tracing();

    let config = EngineConfig::load(config_path)?;
    match at {
        Some(instant) => report(&OrderEngine::new(config, FixedClock::new(instant))?, json),
        None => report(&OrderEngine::with_system_clock(config)?, json),
    }
}

fn report<C: Clock>(engine: &OrderEngine<C>, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let availability = engine.availability()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&availability)?);
        return Ok(());
    }

    let tz = engine.config().schedule.timezone()?;
    let local = availability.evaluated_at.with_timezone(&tz);

    println!("FoodRun Slot Availability");
    println!("=========================");
    println!("Local time: {}", local.format("%A, %d %B %Y %H:%M"));
    println!(
        "Closing:    {}{}",
        engine.config().schedule.closing_time.format("%H:%M"),
        if availability.closed { " (closed)" } else { "" }
    );
    if availability.fasting_period {
        println!("Fasting period: yes");
    }
    println!();

    for slot in &engine.config().slots {
        let open = availability.open_slots.contains(slot);
        println!(
            "  {} {:<14} order by {}",
            if open { "✓" } else { "✗" },
            slot.period,
            slot.order_by.format("%H:%M")
        );
    }

    if !availability.accepts_orders() {
        println!();
        println!("No orders can be placed right now.");
    }

    Ok(())
}
