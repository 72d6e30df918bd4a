//! Date-only values anchored to UTC day boundaries.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use super::{Timestamp, ValidationError};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// A calendar day with no time-of-day, interpreted as UTC midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    /// Parses a `YYYY-MM-DD` string.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
            .map(Self)
            .map_err(|e| ValidationError::invalid_format("date", e.to_string()))
    }

    /// The UTC calendar day containing the given instant.
    pub fn of(instant: &Timestamp) -> Self {
        Self(instant.utc_date())
    }

    /// Creates a date from its components.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// Whole days from `self` to `later` (negative when `later` is earlier).
    pub fn days_until(&self, later: &CalendarDate) -> i64 {
        (later.0 - self.0).num_days()
    }

    /// Shifts the date by a signed number of days.
    pub fn plus_days(&self, days: i64) -> Self {
        Self(self.0 + chrono::Duration::days(days))
    }

    pub fn as_naive(&self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}

impl FromStr for CalendarDate {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for CalendarDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CalendarDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
