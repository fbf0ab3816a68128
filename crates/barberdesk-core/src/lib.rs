//! # barberdesk-core: Scheduling Logic for BarberDesk
//!
//! Computes when a barber can take an appointment: free and occupied slots
//! for a date or a range of dates, point availability checks and the
//! booking conflict gate. Everything here is pure logic over data handed in
//! through the store traits.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      BarberDesk Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 barberdesk-api (axum, JSON)                     │   │
//! │  │   /availability  /availability/range  /next  /check  /conflict  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ barberdesk-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌────────────┐  ┌───────────┐  │   │
//! │  │   │   slots   │  │ conflict  │  │availability│  │   range   │  │   │
//! │  │   │ generate  │  │ overlaps  │  │  Engine    │  │ compute   │  │   │
//! │  │   │           │  │           │  │ evaluate   │  │ next      │  │   │
//! │  │   └───────────┘  └───────────┘  └─────┬──────┘  └───────────┘  │   │
//! │  │                                        │ ScheduleStore          │   │
//! │  │   NO DATABASE • NO NETWORK             │ BookingStore  Clock    │   │
//! │  └────────────────────────────────────────┼────────────────────────┘   │
//! │                                           │                             │
//! │  ┌────────────────────────────────────────▼────────────────────────┐   │
//! │  │               barberdesk-db (SQLite repositories)               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Barber, WeeklySchedule, TimeOff, Booking, BookingStatus
//! - [`time`] - `HH:MM` times and `YYYY-MM-DD` dates
//! - [`slots`] - Slot generation from working hours
//! - [`conflict`] - The half-open overlap predicate
//! - [`availability`] - Per-day evaluation and point queries
//! - [`range`] - Multi-day ranges and next-available search
//! - [`store`] / [`memory`] - Store traits and an in-memory implementation
//! - [`clock`] - Injected "now"
//! - [`validation`] / [`error`] - Input rules and error types
//!
//! ## Example Usage
//!
//! ```rust
//! use barberdesk_core::slots::generate_slots;
//! use barberdesk_core::time::TimeOfDay;
//!
//! let t = |s: &str| TimeOfDay::parse(s).unwrap();
//!
//! // 09:00-18:00 with lunch 13:00-14:00, 30 minute slots
//! let slots = generate_slots(t("09:00"), t("18:00"), 30, Some(t("13:00")), Some(t("14:00")));
//!
//! assert_eq!(slots.first(), Some(&t("09:00")));
//! assert!(!slots.contains(&t("13:00")));
//! assert!(slots.contains(&t("14:00")));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod availability;
pub mod clock;
pub mod conflict;
pub mod error;
pub mod memory;
pub mod range;
pub mod slots;
pub mod store;
pub mod time;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use availability::{AvailabilityEngine, DayAvailability};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{CoreError, CoreResult, StoreError, ValidationError};
pub use range::{compute_range, next_available, NextSlot, RangeAvailability};
pub use store::{BookingStore, ScheduleStore};
pub use time::TimeOfDay;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Slot length used when a request does not name one.
pub const DEFAULT_SLOT_DURATION_MINUTES: u32 = 30;

/// Shortest slot a request may ask for.
pub const MIN_SLOT_DURATION_MINUTES: u32 = 5;

/// Longest slot a request may ask for.
pub const MAX_SLOT_DURATION_MINUTES: u32 = 240;

/// Longest inclusive range `compute_range` accepts.
///
/// ## Business Reason
/// Each day costs a few store reads. 30 covers a month view; 31 is rejected
/// rather than silently truncated.
pub const MAX_RANGE_DAYS: u32 = 30;

/// How far ahead the next-available search looks.
pub const DEFAULT_LOOKAHEAD_DAYS: u32 = 30;

/// Slots returned by `next_available` when the caller gives no limit.
pub const DEFAULT_NEXT_LIMIT: usize = 10;

/// Largest `next_available` limit accepted; anything above is a validation error.
pub const MAX_NEXT_LIMIT: usize = 100;

/// Longest single booking (a full working day).
pub const MAX_BOOKING_DURATION_MINUTES: u32 = 480;
