//! # barberdesk-db: Database Layer for BarberDesk
//!
//! SQLite storage for the scheduling engine, using sqlx for async access.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      BarberDesk Data Flow                               │
//! │                                                                         │
//! │  GET /api/barbers/{id}/availability                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  AvailabilityEngine (barberdesk-core)                                  │
//! │       │ ScheduleStore / BookingStore                                    │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 barberdesk-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐   ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories  │   │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │                │   │  (embedded)  │  │   │
//! │  │   │               │    │ BarberRepo     │   │              │  │   │
//! │  │   │ SqlitePool    │◄───│ CustomerRepo   │   │ 001_initial  │  │   │
//! │  │   │               │    │ ScheduleRepo   │   │   _schema    │  │   │
//! │  │   │               │    │ BookingRepo    │   │              │  │   │
//! │  │   └───────────────┘    └────────────────┘   └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite file (DATABASE_PATH)                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Barbers, customers, schedules, bookings
//!
//! ## Usage
//!
//! ```rust,ignore
//! use barberdesk_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("./barberdesk.db")).await?;
//!
//! let engine = db.availability_engine(SystemClock);
//! let day = engine.evaluate_day(&barber_id, date, 30).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::barber::BarberRepository;
pub use repository::booking::BookingRepository;
pub use repository::customer::CustomerRepository;
pub use repository::schedule::ScheduleRepository;
