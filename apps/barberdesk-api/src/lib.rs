//! # BarberDesk API
//!
//! HTTP/JSON front for the availability engine.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        BarberDesk API                                   │
//! │                                                                         │
//! │  Client ──► axum Router ──► handler ──► AvailabilityEngine              │
//! │                 │              │             │                          │
//! │                 │              │             ▼                          │
//! │                 │              │    ScheduleRepository / BookingRepo    │
//! │                 │              │             │                          │
//! │                 │              ▼             ▼                          │
//! │                 │          ApiError ◄── CoreError / DbError             │
//! │                 ▼                                                       │
//! │            AppState { Database, Clock, default slot length }            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub use config::{ApiConfig, ConfigError};
pub use error::{ApiError, ErrorCode};
pub use routes::router;
pub use state::AppState;
