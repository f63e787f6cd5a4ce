//! Income-side derived types: confidence, pay cadence, recurring source groups

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Qualitative reliability of an income estimate.
///
/// Ordered `Low < Medium < High` so comparisons read naturally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    pub const fn label(self) -> &'static str {
        match self {
            Confidence::Low => "low",
            Confidence::Medium => "medium",
            Confidence::High => "high",
        }
    }
}

/// Pay cadence inferred from the gaps between deposits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayFrequency {
    Weekly,
    Biweekly,
    SemiMonthly,
    Monthly,
    Irregular,
}

impl PayFrequency {
    /// Classify a median gap (in days) between consecutive deposits
    pub fn from_median_gap(days: i64) -> Self {
        match days {
            5..=9 => PayFrequency::Weekly,
            10..=14 => PayFrequency::Biweekly,
            15..=17 => PayFrequency::SemiMonthly,
            26..=35 => PayFrequency::Monthly,
            _ => PayFrequency::Irregular,
        }
    }

    /// Expected days between deposits, `None` for irregular
    pub fn expected_gap_days(self) -> Option<i64> {
        match self {
            PayFrequency::Weekly => Some(7),
            PayFrequency::Biweekly => Some(14),
            PayFrequency::SemiMonthly => Some(15),
            PayFrequency::Monthly => Some(30),
            PayFrequency::Irregular => None,
        }
    }

    /// Slack allowed around the expected gap (weekends, bank holidays, short months)
    pub fn tolerance_days(self) -> i64 {
        match self {
            PayFrequency::Weekly => 2,
            PayFrequency::Biweekly | PayFrequency::SemiMonthly => 3,
            PayFrequency::Monthly => 5,
            PayFrequency::Irregular => 0,
        }
    }

    pub fn is_on_schedule(self, gap_days: i64) -> bool {
        self.expected_gap_days()
            .is_some_and(|expected| (gap_days - expected).abs() <= self.tolerance_days())
    }
}

/// How a recurring source behaves over the window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncomeType {
    /// Two or more deposits on a detectable schedule
    Recurring,
    /// Two or more deposits without a schedule
    Irregular,
    OneTime,
}

/// Payroll deposits attributed to one payer.
///
/// `occurrences` is sorted ascending and owned by the group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringSourceGroup {
    /// Normalized payer key the deposits were grouped under
    pub source_key: String,
    /// Original name of the most recent deposit
    pub display_name: String,
    pub occurrences: Vec<NaiveDate>,
    pub occurrence_count: usize,
    pub total_amount: f64,
    /// Amount of the earliest deposit
    pub approximate_amount: f64,
    pub frequency: PayFrequency,
    pub on_schedule_count: usize,
    pub income_type: IncomeType,
    pub confidence: Confidence,
}

impl RecurringSourceGroup {
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.occurrences.last().copied()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.occurrences.first().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequency_from_gap() {
        assert_eq!(PayFrequency::from_median_gap(7), PayFrequency::Weekly);
        assert_eq!(PayFrequency::from_median_gap(14), PayFrequency::Biweekly);
        assert_eq!(PayFrequency::from_median_gap(16), PayFrequency::SemiMonthly);
        assert_eq!(PayFrequency::from_median_gap(31), PayFrequency::Monthly);
        assert_eq!(PayFrequency::from_median_gap(3), PayFrequency::Irregular);
        assert_eq!(PayFrequency::from_median_gap(60), PayFrequency::Irregular);
    }

    #[test]
    fn test_on_schedule_tolerance() {
        assert!(PayFrequency::Biweekly.is_on_schedule(13));
        assert!(PayFrequency::Biweekly.is_on_schedule(17));
        assert!(!PayFrequency::Biweekly.is_on_schedule(21));
        assert!(PayFrequency::Monthly.is_on_schedule(28));
        assert!(!PayFrequency::Irregular.is_on_schedule(14));
    }

    #[test]
    fn test_confidence_ordering_and_serde() {
        assert!(Confidence::Low < Confidence::Medium);
        assert!(Confidence::Medium < Confidence::High);
        let json = serde_json::to_string(&Confidence::High).unwrap();
        assert_eq!(json, "\"high\"");
        assert_eq!(Confidence::Medium.label(), "medium");
    }
}
