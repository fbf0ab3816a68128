//! # Overlap and Conflict Detection
//!
//! The single overlap predicate behind day classification, point
//! availability checks and the booking conflict gate.
//!
//! Intervals are half-open `[start, start + duration)`. Adjacent intervals,
//! where one ends exactly when the other starts, do NOT overlap.
//!
//! ```text
//!   slot     [09:30 ──── 10:00)
//!   booking               [10:00 ─────────── 11:00)     adjacent: free
//!
//!   slot                        [10:30 ── 11:00)
//!   booking               [10:00 ─────────── 11:00)     overlap: booked
//! ```

use crate::time::TimeOfDay;
use crate::types::Booking;

/// Whether `[a_start, a_start + a_duration)` and `[b_start, b_start +
/// b_duration)` share at least one minute. All values are minutes since
/// midnight; ends may run past 24h and are computed in `u64`, so any
/// stored duration is safe.
///
/// Symmetric: `overlaps(a, ad, b, bd) == overlaps(b, bd, a, ad)`.
#[inline]
pub fn overlaps(a_start: u32, a_duration: u32, b_start: u32, b_duration: u32) -> bool {
    let (a_start, b_start) = (u64::from(a_start), u64::from(b_start));
    a_start < b_start + u64::from(b_duration) && a_start + u64::from(a_duration) > b_start
}

/// Whether a candidate `[time, time + duration)` overlaps `booking`.
#[inline]
pub fn overlaps_booking(time: TimeOfDay, duration: u32, booking: &Booking) -> bool {
    overlaps(
        time.minutes(),
        duration,
        booking.start_time.minutes(),
        booking.duration_minutes,
    )
}

/// Returns the first booking (in slice order) that blocks the candidate
/// interval.
///
/// Bookings in a non-blocking status (completed, cancelled) and the booking
/// whose id equals `exclude_id` are skipped. Stores return bookings ordered
/// by start time, so "first" is the earliest-starting blocker.
pub fn find_conflict<'a>(
    bookings: &'a [Booking],
    time: TimeOfDay,
    duration: u32,
    exclude_id: Option<&str>,
) -> Option<&'a Booking> {
    bookings.iter().find(|booking| {
        booking.status.blocks_availability()
            && exclude_id != Some(booking.id.as_str())
            && overlaps_booking(time, duration, booking)
    })
}
