//! Groups a cycle's logs under its flowering weeks.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use serde::Serialize;

use super::LogEntry;

/// Logs filed under one declared week, newest first.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekBucket {
    pub week_number: u32,
    pub logs: Vec<LogEntry>,
}

/// One bucket per declared week, in declared order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WeekBuckets {
    buckets: Vec<WeekBucket>,
    #[serde(skip)]
    excluded: usize,
}

impl WeekBuckets {
    /// Logs of a declared week; `None` for weeks the schedule does not list.
    pub fn get(&self, week_number: u32) -> Option<&[LogEntry]> {
        self.buckets
            .iter()
            .find(|b| b.week_number == week_number)
            .map(|b| b.logs.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = &WeekBucket> {
        self.buckets.iter()
    }

    pub fn week_numbers(&self) -> Vec<u32> {
        self.buckets.iter().map(|b| b.week_number).collect()
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn total_logs(&self) -> usize {
        self.buckets.iter().map(|b| b.logs.len()).sum()
    }

    /// Logs whose week is not declared; they are not shown.
    pub fn excluded(&self) -> usize {
        self.excluded
    }
}

/// Buckets `logs` by week and orders each bucket by date, newest first.
///
/// Duplicate week numbers collapse to one bucket. Logs with equal dates keep
/// their input order.
pub fn bucket_and_sort<I>(logs: I, week_numbers: &[u32]) -> WeekBuckets
where
    I: IntoIterator<Item = LogEntry>,
{
    let mut buckets: Vec<WeekBucket> = Vec::with_capacity(week_numbers.len());
    let mut index: HashMap<u32, usize> = HashMap::with_capacity(week_numbers.len());
    for &week_number in week_numbers {
        if let Entry::Vacant(slot) = index.entry(week_number) {
            slot.insert(buckets.len());
            buckets.push(WeekBucket {
                week_number,
                logs: Vec::new(),
            });
        }
    }

    let mut excluded = 0;
    for log in logs {
        match index.get(&log.week) {
            Some(&i) => buckets[i].logs.push(log),
            None => excluded += 1,
        }
    }

    for bucket in &mut buckets {
        bucket.logs.sort_by(|a, b| b.date.cmp(&a.date));
    }

    WeekBuckets { buckets, excluded }
}
