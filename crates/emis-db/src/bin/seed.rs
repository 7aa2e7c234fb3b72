//! # Seed Data Generator
//!
//! Creates the shop locations and, optionally, a demo day for development.
//!
//! ## Usage
//! ```bash
//! # Seed the default shops
//! cargo run -p emis-db --bin seed
//!
//! # Custom shop list and database path
//! cargo run -p emis-db --bin seed -- --db ./data/emis.db -l Murray -l Midvale
//!
//! # Also open a demo day with a few sales and print its balance
//! cargo run -p emis-db --bin seed -- --demo
//! ```
//!
//! Seeding is idempotent: existing shops are left alone.

use chrono::Local;
use std::env;
use tracing_subscriber::EnvFilter;

use emis_core::{validation, Money, TransactionDraft};
use emis_db::migrations::migration_status;
use emis_db::{Database, DbConfig};

/// Shops created when no `--location` is given.
const DEFAULT_LOCATIONS: &[&str] = &["Taylorsville", "West Jordan", "Sandy", "Draper"];

/// `(vehicle, dollars, method, dmv, safety)` for the demo day.
const DEMO_SALES: &[(&str, f64, &str, bool, bool)] = &[
    ("2015 Honda Civic", 40.0, "CASH", false, false),
    ("2018 Toyota Tacoma", 25.0, "CC", true, false),
    ("2012 Ford Transit", 50.0, "FLEET", false, true),
    ("2009 Subaru Outback", 32.5, "CHECK", true, true),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./emis_dev.db");
    let mut locations: Vec<String> = Vec::new();
    let mut demo = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--location" | "-l" => {
                if i + 1 < args.len() {
                    locations.push(args[i + 1].clone());
                    i += 1;
                }
            }
            "--demo" => demo = true,
            "--help" | "-h" => {
                println!("Emissions Tracker Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>         Database file path (default: ./emis_dev.db)");
                println!("  -l, --location <NAME>   Shop to create (repeatable; default: built-in list)");
                println!("      --demo              Open a demo day with sample sales");
                println!("  -h, --help              Show this help message");
                return Ok(());
            }
            other => eprintln!("Ignoring unknown argument: {}", other),
        }
        i += 1;
    }

    if locations.is_empty() {
        locations = DEFAULT_LOCATIONS.iter().map(|s| s.to_string()).collect();
    }

    println!("🌱 Emissions Tracker Seed Data Generator");
    println!("========================================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    let (total, applied) = migration_status(db.pool()).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied ({}/{})", applied, total);
    println!();

    for name in &locations {
        match db.locations().ensure(name).await {
            Ok(location) => println!("  #{:<3} {}", location.id, location.name),
            Err(e) => eprintln!("Failed to create location '{}': {}", name, e),
        }
    }

    if demo {
        run_demo(&db, &locations[0]).await?;
    }

    db.close().await;
    Ok(())
}

/// Opens a day at the first shop, rings up the demo sales, prints the
/// balance, and leaves the day OPEN.
async fn run_demo(db: &Database, shop: &str) -> Result<(), Box<dyn std::error::Error>> {
    let location = db.locations().ensure(shop).await?;
    let log = db
        .daily_logs()
        .open(location.id, Money::from_cents(10_000), Local::now().date_naive())
        .await?;

    println!();
    println!("Demo day #{} at {} (starting cash {})", log.id, location.name, log.starting_cash());

    for (vehicle, dollars, method, dmv, safety) in DEMO_SALES {
        let draft = TransactionDraft {
            daily_log_id: log.id,
            vehicle_make: vehicle.to_string(),
            is_dmv: *dmv,
            is_safety: *safety,
            total_amount: *dollars,
            payment_method: method.to_string(),
            ..Default::default()
        };
        let tx = db
            .transactions()
            .insert(&validation::validate_new_transaction(&draft)?)
            .await?;
        println!("  + {:<22} {:>9} {}", tx.vehicle_make, tx.total_amount().to_string(), tx.payment_method);
    }

    let balance = db.daily_logs().balance(log.id).await?;
    println!();
    println!("  Total sales:      {}", balance.total_sales);
    println!("  Cash sales:       {}", balance.cash_sales);
    println!("  Card sales:       {}", balance.credit_card_sales);
    println!("  Fleet sales:      {}", balance.fleet_sales);
    println!("  Check sales:      {}", balance.check_sales);
    println!("  Expected drawer:  {}", balance.expected_drawer_cash);

    Ok(())
}
