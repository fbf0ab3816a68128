//! Shared handler state.

use std::sync::Arc;

use barberdesk_core::{AvailabilityEngine, Clock, SystemClock};
use barberdesk_db::{BookingRepository, Database, ScheduleRepository};

/// Engine type every handler queries.
pub type Engine = AvailabilityEngine<ScheduleRepository, BookingRepository, Arc<dyn Clock>>;

/// Cloned into each request by axum.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub clock: Arc<dyn Clock>,
    pub default_slot_duration: u32,
}

impl AppState {
    /// State reading the wall clock.
    pub fn new(db: Database, default_slot_duration: u32) -> Self {
        AppState::with_clock(db, Arc::new(SystemClock), default_slot_duration)
    }

    pub fn with_clock(db: Database, clock: Arc<dyn Clock>, default_slot_duration: u32) -> Self {
        AppState {
            db,
            clock,
            default_slot_duration,
        }
    }

    pub fn engine(&self) -> Engine {
        self.db.availability_engine(Arc::clone(&self.clock))
    }
}
