//! Weekly mood/energy trends within a month.

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::record::DailyRecord;

use super::monthly::round1;

/// Number of fixed week buckets a month partitions into.
const WEEK_BUCKETS: usize = 5;

/// Mean mood and energy for one week bucket of the month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyTrend {
    /// Week bucket index 0..=4, from `floor((day_of_month - 1) / 7)`.
    pub week: u32,
    /// Mean mood in this bucket, 1 decimal.
    pub mood: f64,
    /// Mean energy in this bucket, 1 decimal.
    pub energy: f64,
    /// Records contributing to this bucket.
    pub records: u32,
}

/// Partition the month's records into five fixed week buckets and
/// average mood and energy within each. Empty buckets are omitted.
///
/// Callers pass records already filtered to a single month; days 29-31
/// fall into bucket 4.
pub fn weekly_trends(month_records: &[&DailyRecord]) -> Vec<WeeklyTrend> {
    let mut mood_sums = [0u32; WEEK_BUCKETS];
    let mut energy_sums = [0u32; WEEK_BUCKETS];
    let mut counts = [0u32; WEEK_BUCKETS];

    for record in month_records {
        let bucket = ((record.date.day() - 1) / 7) as usize;
        if bucket < WEEK_BUCKETS {
            mood_sums[bucket] += record.mood_score() as u32;
            energy_sums[bucket] += record.energy_score() as u32;
            counts[bucket] += 1;
        }
    }

    (0..WEEK_BUCKETS)
        .filter(|&week| counts[week] > 0)
        .map(|week| WeeklyTrend {
            week: week as u32,
            mood: round1(mood_sums[week] as f64 / counts[week] as f64),
            energy: round1(energy_sums[week] as f64 / counts[week] as f64),
            records: counts[week],
        })
        .collect()
}
