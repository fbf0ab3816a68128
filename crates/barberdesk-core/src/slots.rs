//! # Slot Generation
//!
//! Builds the day's grid of candidate appointment start times.
//!
//! ## Example: Mon 09:00–18:00, break 13:00–14:00, 30 min slots
//! ```text
//!  09:00 09:30 10:00 ... 12:30 │ 13:00 13:30 │ 14:00 14:30 ... 17:30
//!  ◄──────── emitted ────────► │  skipped    │ ◄────── emitted ──────►
//!                              └─ [13:00, 14:00) half-open
//! ```
//!
//! A slot is emitted purely on its start being before closing time, so the
//! last slot may run past `end` (e.g. 09:00–09:50 with 30 min slots yields
//! 09:00 and 09:30, the latter ending 10:00). Callers that need full slots
//! must filter.

use crate::time::TimeOfDay;

/// Generates slot start times for a working window.
///
/// Emits `start, start + d, start + 2d, ...` while the slot start is before
/// `end`, skipping any start inside the half-open break `[break_start,
/// break_end)`. A slot exactly at `break_end` is emitted, one exactly at
/// `break_start` is not. A break with only one bound is ignored.
///
/// Returns an empty list when `start >= end` or `slot_duration_minutes == 0`.
///
/// ## Example
/// ```rust
/// use barberdesk_core::slots::generate_slots;
/// use barberdesk_core::time::TimeOfDay;
///
/// let t = |s| TimeOfDay::parse(s).unwrap();
/// let slots = generate_slots(t("09:00"), t("11:00"), 30, Some(t("10:00")), Some(t("10:30")));
/// let labels: Vec<String> = slots.iter().map(|s| s.to_string()).collect();
/// assert_eq!(labels, ["09:00", "09:30", "10:30"]);
/// ```
pub fn generate_slots(
    start: TimeOfDay,
    end: TimeOfDay,
    slot_duration_minutes: u32,
    break_start: Option<TimeOfDay>,
    break_end: Option<TimeOfDay>,
) -> Vec<TimeOfDay> {
    if slot_duration_minutes == 0 || start >= end {
        return Vec::new();
    }

    let in_break = |minutes: u32| match (break_start, break_end) {
        (Some(bs), Some(be)) => bs.minutes() <= minutes && minutes < be.minutes(),
        _ => false,
    };

    let capacity = ((end.minutes() - start.minutes()) / slot_duration_minutes + 1) as usize;
    let mut slots = Vec::with_capacity(capacity);

    let mut cursor = start.minutes();
    while cursor < end.minutes() {
        if !in_break(cursor) {
            // cursor < end < 24h, so this always converts
            if let Some(slot) = TimeOfDay::from_minutes(cursor) {
                slots.push(slot);
            }
        }
        cursor += slot_duration_minutes;
    }

    slots
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> TimeOfDay {
        TimeOfDay::parse(s).unwrap()
    }

    fn labels(slots: &[TimeOfDay]) -> Vec<String> {
        slots.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_full_day_with_lunch_break() {
        let slots = generate_slots(t("09:00"), t("18:00"), 30, Some(t("13:00")), Some(t("14:00")));

        assert_eq!(slots.len(), 16);
        assert_eq!(slots.first(), Some(&t("09:00")));
        assert_eq!(slots.last(), Some(&t("17:30")));
        assert!(slots.contains(&t("12:30")));
        assert!(slots.contains(&t("14:00")));
        assert!(!slots.contains(&t("13:00")));
        assert!(!slots.contains(&t("13:30")));
    }

    #[test]
    fn test_no_break() {
        let slots = generate_slots(t("09:00"), t("10:30"), 30, None, None);
        assert_eq!(labels(&slots), ["09:00", "09:30", "10:00"]);
    }

    #[test]
    fn test_last_slot_may_overrun_closing() {
        let slots = generate_slots(t("09:00"), t("09:50"), 30, None, None);
        assert_eq!(labels(&slots), ["09:00", "09:30"]);
    }

    #[test]
    fn test_break_boundaries_are_half_open() {
        // 15 minute grid lands exactly on both break edges
        let slots = generate_slots(t("12:00"), t("15:00"), 15, Some(t("13:00")), Some(t("14:00")));
        assert!(slots.contains(&t("12:45")));
        assert!(!slots.contains(&t("13:00")));
        assert!(!slots.contains(&t("13:45")));
        assert!(slots.contains(&t("14:00")));
    }

    #[test]
    fn test_break_off_grid() {
        // Break 10:10–10:40 removes only the 10:30 start
        let slots = generate_slots(t("10:00"), t("11:00"), 30, Some(t("10:10")), Some(t("10:40")));
        assert_eq!(labels(&slots), ["10:00"]);
    }

    #[test]
    fn test_half_break_ignored() {
        let slots = generate_slots(t("09:00"), t("10:00"), 30, Some(t("09:00")), None);
        assert_eq!(labels(&slots), ["09:00", "09:30"]);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert!(generate_slots(t("10:00"), t("10:00"), 30, None, None).is_empty());
        assert!(generate_slots(t("11:00"), t("10:00"), 30, None, None).is_empty());
        assert!(generate_slots(t("09:00"), t("10:00"), 0, None, None).is_empty());
    }

    #[test]
    fn test_late_window_stays_in_day() {
        let slots = generate_slots(t("23:00"), t("23:59"), 45, None, None);
        assert_eq!(labels(&slots), ["23:00", "23:45"]);
    }
}
