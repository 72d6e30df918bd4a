//! Day and week progress derived from a stored start date.
//!
//! All arithmetic is done on UTC calendar days. The start date itself is
//! day 1; days 1..=7 form week 1.

use super::foundation::{CalendarDate, Timestamp};

/// Days per cultivation week.
pub const DAYS_PER_WEEK: i64 = 7;

/// Inclusive count of days from `start_date` to the UTC day containing `now`.
///
/// Returns `None` when no date is set or it does not parse, `Some(0)` when the
/// start date is after today, and otherwise `Some(n)` with `n >= 1`.
pub fn days_since(start_date: Option<&str>, now: &Timestamp) -> Option<i64> {
    let raw = start_date?;
    if raw.is_empty() {
        return None;
    }
    let start = CalendarDate::parse(raw).ok()?;
    Some(days_since_date(&start, now))
}

/// Same as [`days_since`] for an already parsed date.
pub fn days_since_date(start: &CalendarDate, now: &Timestamp) -> i64 {
    let today = CalendarDate::of(now);
    if start > &today {
        return 0;
    }
    start.days_until(&today) + 1
}

/// Week containing the given day, or `None` when the day count has not
/// started (`days <= 0`).
pub fn week_for_day(days: i64) -> Option<u32> {
    if days <= 0 {
        return None;
    }
    u32::try_from((days - 1) / DAYS_PER_WEEK + 1).ok()
}

/// Day and week reached since a start date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Elapsed {
    pub day: i64,
    pub week: u32,
}

impl Elapsed {
    /// Combines [`days_since`] and [`week_for_day`]; `None` unless at least
    /// one day has elapsed.
    pub fn since(start_date: Option<&str>, now: &Timestamp) -> Option<Self> {
        let day = days_since(start_date, now)?;
        let week = week_for_day(day)?;
        Some(Self { day, week })
    }
}
