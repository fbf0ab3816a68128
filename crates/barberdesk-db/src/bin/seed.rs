//! # Demo Shop Seeder
//!
//! Populates a database with a small barbershop for development.
//!
//! ## Usage
//! ```bash
//! # Seed ./barberdesk_dev.db
//! cargo run -p barberdesk-db --bin seed
//!
//! # Specify database path
//! cargo run -p barberdesk-db --bin seed -- --db ./data/barberdesk.db
//! ```
//!
//! ## Generated Data
//! - Three barbers working Mon-Sat 09:00-18:00 with lunch 13:00-14:00,
//!   Sunday off
//! - A handful of customers
//! - One week of bookings starting today, spread across the barbers
//! - One barber on time-off for two days next week

use std::env;

use barberdesk_core::time::TimeOfDay;
use barberdesk_core::{BookingStatus, NewBooking, TimeOff, WeeklySchedule};
use barberdesk_db::{Database, DbConfig, DbError};
use chrono::{Days, Local};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

const BARBERS: &[&str] = &["Marco Rossi", "Ana Lima", "Sam Okafor"];

const CUSTOMERS: &[(&str, Option<&str>)] = &[
    ("Jordan Blake", Some("555-0101")),
    ("Priya Shah", Some("555-0102")),
    ("Luis Ortega", None),
    ("Mei Chen", Some("555-0104")),
    ("Tom Becker", Some("555-0105")),
    ("Walk-in", None),
];

/// (start, minutes) offered each day, rotated across barbers.
const DAILY_BOOKINGS: &[(&str, u32)] = &[("09:30", 30), ("11:00", 60), ("14:30", 45), ("16:00", 30)];

fn hm(s: &str) -> Result<TimeOfDay, DbError> {
    Ok(TimeOfDay::parse(s)?)
}

fn week_for(barber_id: &str) -> Result<Vec<WeeklySchedule>, DbError> {
    (0u8..=6)
        .map(|day_of_week| {
            Ok(WeeklySchedule {
                barber_id: barber_id.to_string(),
                day_of_week,
                is_working: day_of_week != 0,
                start_time: hm("09:00")?,
                end_time: hm("18:00")?,
                break_start: Some(hm("13:00")?),
                break_end: Some(hm("14:00")?),
            })
        })
        .collect()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "barberdesk_db=info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = env::args().collect();
    let mut db_path = String::from("./barberdesk_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("BarberDesk Demo Shop Seeder");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./barberdesk_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    let db = Database::new(DbConfig::new(&db_path)).await?;
    info!(path = %db_path, "Connected, migrations applied");

    let existing = db.barbers().count().await?;
    if existing > 0 {
        warn!(existing, "Database already has barbers, skipping seed");
        return Ok(());
    }

    // Barbers and their weeks
    let mut barber_ids = Vec::with_capacity(BARBERS.len());
    for name in BARBERS {
        let barber = db.barbers().create(name).await?;
        db.schedules().replace_week(&barber.id, &week_for(&barber.id)?).await?;
        barber_ids.push(barber.id);
    }
    info!(count = barber_ids.len(), "Created barbers with Mon-Sat schedules");

    let mut customer_ids = Vec::with_capacity(CUSTOMERS.len());
    for (name, mobile) in CUSTOMERS {
        customer_ids.push(db.customers().create(name, *mobile).await?.id);
    }
    info!(count = customer_ids.len(), "Created customers");

    // A week of bookings from today
    let today = Local::now().date_naive();
    let mut created = 0usize;
    let mut skipped = 0usize;

    for offset in 0..7u64 {
        let Some(date) = today.checked_add_days(Days::new(offset)) else {
            break;
        };

        for (slot_idx, (start, minutes)) in DAILY_BOOKINGS.iter().enumerate() {
            let seq = offset as usize * DAILY_BOOKINGS.len() + slot_idx;
            let new = NewBooking {
                barber_id: barber_ids[seq % barber_ids.len()].clone(),
                customer_id: customer_ids[seq % customer_ids.len()].clone(),
                date,
                start_time: hm(start)?,
                duration_minutes: *minutes,
                status: if seq % 3 == 0 {
                    BookingStatus::Confirmed
                } else {
                    BookingStatus::Scheduled
                },
                notes: None,
            };

            match db.bookings().create(&new).await {
                Ok(_) => created += 1,
                Err(e) => {
                    skipped += 1;
                    warn!(%date, start, error = %e, "Skipped booking");
                }
            }
        }
    }
    info!(created, skipped, "Created bookings");

    // Two days off for the first barber next week
    if let (Some(start), Some(end)) = (
        today.checked_add_days(Days::new(8)),
        today.checked_add_days(Days::new(9)),
    ) {
        db.schedules()
            .add_time_off(&TimeOff {
                id: Uuid::new_v4().to_string(),
                barber_id: barber_ids[0].clone(),
                start_date: start,
                end_date: end,
                reason: "Training course".to_string(),
                notes: None,
            })
            .await?;
        info!(%start, %end, "Added time off");
    }

    println!("Seeded demo shop into {}", db_path);
    for id in &barber_ids {
        println!("  barber {}", id);
    }

    db.close().await;
    Ok(())
}
