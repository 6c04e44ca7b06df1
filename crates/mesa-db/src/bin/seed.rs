//! # Seed Data Generator
//!
//! Populates the database with a demo floor plan for development.
//!
//! ## Usage
//! ```bash
//! # Seed the full demo floor plan (default)
//! cargo run -p mesa-db --bin seed
//!
//! # Seed a smaller floor plan
//! cargo run -p mesa-db --bin seed -- --tables 6
//!
//! # Specify database path
//! cargo run -p mesa-db --bin seed -- --db ./data/mesa.db
//! ```
//!
//! ## Generated Data
//! - A floor plan of tables across every location (indoor, outdoor, window,
//!   VIP) with capacities from 2 to 10
//! - A handful of demo guests
//! - A few reservations for tomorrow's service, one of them confirmed so the
//!   table flips to `reserved`

use std::env;

use chrono::{Local, NaiveTime};
use mesa_core::{NewReservation, NewTable, ReservationStatus, TableLocation, TableStatus};
use mesa_db::{Database, DbConfig};
use tracing_subscriber::EnvFilter;

/// Demo floor plan: (table number, capacity, location, description).
const FLOOR_PLAN: &[(i32, i32, TableLocation, Option<&str>)] = &[
    (1, 2, TableLocation::Window, Some("quiet corner by the front window")),
    (2, 2, TableLocation::Window, None),
    (3, 4, TableLocation::Indoor, None),
    (4, 4, TableLocation::Indoor, None),
    (5, 4, TableLocation::Indoor, Some("near the open kitchen")),
    (6, 6, TableLocation::Indoor, None),
    (7, 2, TableLocation::Outdoor, Some("patio, heated in winter")),
    (8, 4, TableLocation::Outdoor, None),
    (9, 6, TableLocation::Outdoor, None),
    (10, 8, TableLocation::Vip, Some("private alcove")),
    (11, 10, TableLocation::Vip, Some("chef's table")),
    (12, 6, TableLocation::Window, None),
];

/// Demo guests: (full name, phone).
const GUESTS: &[(&str, &str)] = &[
    ("Ava Thompson", "555-0101"),
    ("Noah Kim", "555-0102"),
    ("Priya Patel", "555-0103"),
    ("Luca Moretti", "555-0104"),
    ("Fatima Al-Sayed", "555-0105"),
    ("Marcus Webb", "555-0106"),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut table_count: usize = FLOOR_PLAN.len();
    let mut db_path = env::var("MESA_DB").unwrap_or_else(|_| String::from("./mesa_dev.db"));

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--tables" | "-t" => {
                if i + 1 < args.len() {
                    table_count = args[i + 1].parse().unwrap_or(FLOOR_PLAN.len());
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Mesa Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!(
                    "  -t, --tables <N>   Number of floor-plan tables to seed (default: {})",
                    FLOOR_PLAN.len()
                );
                println!("  -d, --db <PATH>    Database file path (default: $MESA_DB or ./mesa_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🍽 Mesa Seed Data Generator");
    println!("===========================");
    println!("Database: {}", db_path);
    println!("Tables:   {}", table_count.min(FLOOR_PLAN.len()));
    println!();

    // Connect to database
    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    // Check for existing data
    let existing = db.tables().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} tables", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    // Seed the floor plan
    println!();
    println!("Seeding floor plan...");

    let mut tables = Vec::new();
    for (number, capacity, location, description) in FLOOR_PLAN.iter().take(table_count) {
        let table = db
            .tables()
            .insert(&NewTable {
                table_number: *number,
                capacity: *capacity,
                location: *location,
                description: description.map(str::to_string),
            })
            .await?;
        tables.push(table);
    }
    println!("✓ Seeded {} tables", tables.len());

    // Seed guests
    let mut guests = Vec::new();
    for (name, phone) in GUESTS {
        guests.push(db.users().insert(name, phone).await?);
    }
    println!("✓ Seeded {} guests", guests.len());

    // Seed tomorrow's bookings (needs the full floor plan)
    if tables.len() >= 6 && !guests.is_empty() {
        let tomorrow = Local::now()
            .date_naive()
            .succ_opt()
            .ok_or("calendar overflow computing tomorrow")?;

        let bookings = [
            (guests[0].id, tables[2].id, hm(19, 0), 4),
            (guests[1].id, tables[5].id, hm(19, 30), 5),
            (guests[2].id, tables[0].id, hm(12, 30), 2),
        ];

        for (user_id, table_id, time, party) in bookings {
            db.reservations()
                .insert(&NewReservation {
                    user_id,
                    table_id,
                    reservation_date: tomorrow,
                    reservation_time: time,
                    guests: party,
                    special_requests: None,
                })
                .await?;
        }

        // Confirm the first booking so its table flips to reserved.
        let first = db.reservations().list_all_views().await?;
        if let Some(view) = first.first() {
            db.reservations()
                .set_status_with_table(
                    view.id,
                    ReservationStatus::Confirmed,
                    Some((view.table_id, TableStatus::Reserved)),
                )
                .await?;
        }

        println!("✓ Seeded {} reservations for {}", bookings.len(), tomorrow);
    }

    // Verify availability listings
    println!();
    println!("Verifying availability queries...");
    let free = db.tables().list_available().await?;
    println!("  Free tables: {}", free.len());
    let fits_six = db.tables().list_available_with_capacity(6).await?;
    println!("  Free tables seating 6+: {}", fits_six.len());

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Builds a time-of-day from the constant seed tables above.
fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=mesa=trace` - Show trace for mesa crates only
/// - Default: INFO level, repository spans at DEBUG
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,mesa=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
