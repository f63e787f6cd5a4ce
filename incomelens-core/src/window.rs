//! Calendar-month evaluation windows anchored to an explicit report date.
//!
//! A window covers whole months only: it ends (exclusive) on the first day of
//! the month containing the report date and starts `months` months earlier.

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationWindow {
    /// First day included
    pub start: NaiveDate,
    /// First day excluded
    pub end: NaiveDate,
    pub months: u32,
}

impl EvaluationWindow {
    /// Trailing `months` complete calendar months before the month of `as_of`
    pub fn trailing_complete_months(as_of: NaiveDate, months: u32) -> Self {
        let end = month_start(as_of);
        let start = end.checked_sub_months(Months::new(months)).unwrap_or(NaiveDate::MIN);
        Self { start, end, months }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end
    }

    /// True when every day of `self` also falls in `other`
    pub fn is_within(&self, other: &EvaluationWindow) -> bool {
        self.start >= other.start && self.end <= other.end
    }

    /// Months of this window that the available history actually reaches.
    ///
    /// History starting mid-month counts that month once; never more than the
    /// window length, never less than one.
    pub fn covered_months(&self, data_start: Option<NaiveDate>) -> u32 {
        let Some(data_start) = data_start else {
            return self.months.max(1);
        };
        let from = month_start(data_start).max(self.start);
        if from >= self.end {
            return 1;
        }
        months_between(from, self.end).clamp(1, self.months.max(1))
    }
}

/// First day of the month containing `date`
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.checked_sub_days(Days::new(u64::from(date.day0())))
        .unwrap_or(date)
}

/// Whole months from `from` to `to`, both month starts
fn months_between(from: NaiveDate, to: NaiveDate) -> u32 {
    let diff = (to.year() - from.year()) * 12 + to.month() as i32 - from.month() as i32;
    diff.max(0) as u32
}
