//! Timestamp - UTC instants stamped on logs and read by the clock.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A UTC instant with millisecond-or-better precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    pub fn now() -> Self {
        Self(Utc::now())
    }

    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// `None` outside chrono's representable range.
    pub fn from_unix_millis(millis: i64) -> Option<Self> {
        DateTime::<Utc>::from_timestamp_millis(millis).map(Self)
    }

    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    pub fn as_unix_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    pub fn is_after(&self, other: &Timestamp) -> bool {
        self.0 > other.0
    }

    /// The UTC calendar day this instant falls on.
    pub fn utc_date(&self) -> NaiveDate {
        self.0.date_naive()
    }

    /// Shifts by whole days; negative values go back.
    pub fn plus_days(&self, days: i64) -> Self {
        Self(self.0 + Duration::days(days))
    }

    pub fn plus_millis(&self, millis: i64) -> Self {
        Self(self.0 + Duration::milliseconds(millis))
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn now_falls_between_surrounding_reads() {
        let before = Utc::now();
        let ts = Timestamp::now();
        let after = Utc::now();

        assert!(ts.as_datetime() >= &before);
        assert!(ts.as_datetime() <= &after);
    }

    #[test]
    fn unix_millis_roundtrip() {
        // 2024-01-15T00:00:00Z
        let ts = Timestamp::from_unix_millis(1_705_276_800_000).unwrap();
        assert_eq!(ts.as_datetime().year(), 2024);
        assert_eq!(ts.as_datetime().day(), 15);
        assert_eq!(ts.as_unix_millis(), 1_705_276_800_000);
    }

    #[test]
    fn utc_date_ignores_time_of_day() {
        let dt = DateTime::parse_from_rfc3339("2024-03-10T23:59:59Z")
            .unwrap()
            .with_timezone(&Utc);
        let ts = Timestamp::from_datetime(dt);
        assert_eq!(ts.utc_date(), NaiveDate::from_ymd_opt(2024, 3, 10).unwrap());
    }

    #[test]
    fn plus_millis_orders_after_original() {
        let ts = Timestamp::from_unix_millis(1_000).unwrap();
        let later = ts.plus_millis(1);
        assert!(later.is_after(&ts));
        assert_eq!(later.as_unix_millis(), 1_001);
    }

    #[test]
    fn stored_rfc3339_text_deserializes() {
        let ts: Timestamp = serde_json::from_str("\"2024-01-15T10:30:00Z\"").unwrap();
        assert_eq!(ts.as_datetime().month(), 1);
    }
}
