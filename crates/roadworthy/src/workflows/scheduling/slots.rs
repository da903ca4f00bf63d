//! The bookable slot lattice: every whole hour from 09:00 to 17:00
//! inclusive, Monday through Friday.

use std::collections::HashSet;

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike, Weekday};
use serde::Serialize;

pub const OPENING_HOUR: u32 = 9;
pub const CLOSING_HOUR: u32 = 17;
pub const DEFAULT_WINDOW_DAYS: i64 = 30;

/// Free-slot report returned by the availability query.
#[derive(Debug, Serialize)]
pub struct SlotAvailability {
    pub slots: Vec<NaiveDateTime>,
    pub total: usize,
}

pub fn is_business_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Whether a timestamp lands on the lattice: a weekday, exactly on the hour,
/// within opening hours.
pub fn is_bookable_slot(at: NaiveDateTime) -> bool {
    is_business_day(at.date())
        && at.minute() == 0
        && at.second() == 0
        && (OPENING_HOUR..=CLOSING_HOUR).contains(&at.hour())
}

/// Lattice slots between `from` and `to` (both inclusive) that are neither
/// occupied nor earlier than `now`, in chronological order. A slot equal to
/// `now` is still offered.
pub fn free_slots(
    from: NaiveDate,
    to: NaiveDate,
    occupied: &HashSet<NaiveDateTime>,
    now: NaiveDateTime,
) -> Vec<NaiveDateTime> {
    let mut slots = Vec::new();
    let mut day = from;
    while day <= to {
        if is_business_day(day) {
            for hour in OPENING_HOUR..=CLOSING_HOUR {
                if let Some(slot) = day.and_hms_opt(hour, 0, 0) {
                    if slot >= now && !occupied.contains(&slot) {
                        slots.push(slot);
                    }
                }
            }
        }
        day = match day.succ_opt() {
            Some(next) => next,
            None => break,
        };
    }
    slots
}
