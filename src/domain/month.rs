//! Calendar-month buckets for time-series reporting.

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Number of months shown on the dashboard chart.
pub const DEFAULT_MONTH_COUNT: usize = 6;

/// One calendar month, `[start, end)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthBucket {
    /// Short display form, e.g. "Feb". Not unique across years.
    pub label: String,
    /// Sortable unique key, e.g. "2024-02".
    pub key: String,
    /// First day of the month
    pub start: NaiveDate,
    /// First day of the following month (exclusive)
    pub end: NaiveDate,
}

impl MonthBucket {
    /// The bucket for the calendar month containing `date`.
    pub fn containing(date: NaiveDate) -> Self {
        let start = date - Days::new(u64::from(date.day0()));
        // Only the final month chrono can represent has no successor.
        let end = start
            .checked_add_months(Months::new(1))
            .unwrap_or(NaiveDate::MAX);
        Self {
            label: start.format("%b").to_string(),
            key: start.format("%Y-%m").to_string(),
            start,
            end,
        }
    }

    /// The bucket for the month before this one.
    pub fn previous(&self) -> Option<Self> {
        self.start.pred_opt().map(Self::containing)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }
}

/// Build the `count` consecutive calendar months ending at the month
/// containing `reference`, oldest first.
///
/// Each step back moves exactly one calendar month, so month lengths and year
/// rollovers need no special handling. Returns fewer buckets only when the
/// window would start before the earliest date chrono can represent.
pub fn build_months(reference: NaiveDate, count: usize) -> Vec<MonthBucket> {
    if count == 0 {
        return Vec::new();
    }

    let mut months: Vec<MonthBucket> =
        std::iter::successors(Some(MonthBucket::containing(reference)), MonthBucket::previous)
            .take(count)
            .collect();
    months.reverse();
    months
}

/// `[start, end)` spanned by a run of buckets from [`build_months`].
pub fn window_bounds(months: &[MonthBucket]) -> Option<(NaiveDate, NaiveDate)> {
    match (months.first(), months.last()) {
        (Some(first), Some(last)) => Some((first.start, last.end)),
        _ => None,
    }
}
