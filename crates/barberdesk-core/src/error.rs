//! # Error Types
//!
//! Domain-specific error types for barberdesk-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  barberdesk-core errors (this file)                                    │
//! │  ├── CoreError        - Terminal per-call failures                     │
//! │  ├── ValidationError  - Malformed input, range too long, etc.          │
//! │  └── StoreError       - A schedule/booking store read failed           │
//! │                                                                         │
//! │  barberdesk-db errors (separate crate)                                 │
//! │  └── DbError          - Database operation failures (→ StoreError)     │
//! │                                                                         │
//! │  barberdesk-api errors (in app)                                        │
//! │  └── ApiError         - What HTTP clients see (serialized)             │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → Client                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! None of these are retried inside the core. A store failure while
//! evaluating one day of a range is recorded on that day instead of being
//! returned (see [`crate::range`]).

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Errors returned by availability queries.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The barber id does not match any barber.
    ///
    /// ## When This Occurs
    /// - Typo in the id sent by the client
    /// - Barber was removed from the shop
    #[error("Barber not found: {0}")]
    BarberNotFound(String),

    /// Input failed validation before reaching the engine.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Underlying store read failed. Propagated as-is, the caller decides
    /// on retry policy.
    #[error("Data store error: {0}")]
    DataStore(#[from] StoreError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Invalid format (e.g., "9:00" instead of "09:00", "2026/01/02").
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// Two related values are inconsistent (end before start, break
    /// outside working hours, ...).
    #[error("Invalid {field}: {reason}")]
    InvalidRange { field: String, reason: String },
}

impl ValidationError {
    /// Creates an InvalidFormat error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates an InvalidRange error.
    pub fn invalid_range(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidRange {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Store Error
// =============================================================================

/// A read through [`crate::store::ScheduleStore`] or
/// [`crate::store::BookingStore`] failed.
///
/// Carries only a message so the core stays free of database types; the
/// db crate converts its `DbError` into this.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct StoreError(pub String);

impl StoreError {
    pub fn new(message: impl Into<String>) -> Self {
        StoreError(message.into())
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

/// Result type for store reads.
pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
