//! Recurring source grouping: cluster payroll deposits by payer and infer cadence.
//!
//! Keys come from a single pass over the deposits into a `HashMap`; nothing
//! compares deposits pairwise. A key is the case-folded name with reference
//! noise removed, truncated to a fixed prefix. Distinct payers sharing that
//! prefix (two "ADP WAGE PAYMENTS ..." employers) merge into one group.

use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::NaiveDate;
use regex::Regex;

use incomelens_core::{IncomeType, NormalizedTransaction, PayFrequency, RecurringSourceGroup};

use crate::confidence::{score, share_of};
use crate::config::{ConfidenceConfig, GroupingConfig};
use crate::error::EngineError;

/// `#12345` style references, runs of 4+ digits, `mm/dd` and `mm/dd/yy` dates
const REFERENCE_NOISE: &str = r"#\s*\S+|\d{4,}|\b\d{1,2}/\d{1,2}(?:/\d{2,4})?\b";

/// Folds payer names into grouping keys
#[derive(Debug, Clone)]
pub struct SourceKeyer {
    prefix_len: usize,
    noise: Option<Regex>,
}

impl SourceKeyer {
    pub fn new(config: &GroupingConfig) -> Result<Self, EngineError> {
        let noise = if config.strip_reference_numbers {
            Some(Regex::new(REFERENCE_NOISE)?)
        } else {
            None
        };
        Ok(Self {
            prefix_len: config.key_prefix_len,
            noise,
        })
    }

    pub fn key(&self, name: &str) -> String {
        let folded = name.to_lowercase();

        let stripped = match &self.noise {
            Some(re) => collapse_whitespace(&re.replace_all(&folded, " ")),
            None => collapse_whitespace(&folded),
        };
        // A name that was nothing but a reference keeps its raw form.
        let base = if stripped.is_empty() {
            collapse_whitespace(&folded)
        } else {
            stripped
        };

        let prefix: String = base.chars().take(self.prefix_len).collect();
        prefix.trim_end().to_string()
    }
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

struct Occurrence<'a> {
    date: NaiveDate,
    amount: f64,
    name: &'a str,
}

/// Group dated deposits by payer key and rank the groups.
///
/// `window_income` is all income in the same window; each group's share of
/// it feeds the group's confidence. Deposits without a readable date or
/// amount are ignored.
pub fn group_deposits(
    deposits: &[&NormalizedTransaction],
    keyer: &SourceKeyer,
    window_income: f64,
    config: &ConfidenceConfig,
) -> Vec<RecurringSourceGroup> {
    let mut buckets: HashMap<String, Vec<Occurrence<'_>>> = HashMap::new();

    for txn in deposits {
        let (Some(date), Some(amount)) = (txn.date, txn.amount) else {
            continue;
        };
        buckets.entry(keyer.key(&txn.name)).or_default().push(Occurrence {
            date,
            amount,
            name: &txn.name,
        });
    }

    let mut groups: Vec<RecurringSourceGroup> = buckets
        .into_iter()
        .map(|(key, items)| build_group(key, items, window_income, config))
        .collect();

    groups.sort_by(rank_cmp);
    groups
}

fn build_group(
    source_key: String,
    mut items: Vec<Occurrence<'_>>,
    window_income: f64,
    config: &ConfidenceConfig,
) -> RecurringSourceGroup {
    // Stable: same-day deposits keep input order.
    items.sort_by_key(|o| o.date);

    let occurrences: Vec<NaiveDate> = items.iter().map(|o| o.date).collect();
    let total_amount: f64 = items.iter().map(|o| o.amount).sum();
    let approximate_amount = items.first().map_or(0.0, |o| o.amount);
    let display_name = items.last().map_or_else(String::new, |o| o.name.to_string());

    let gaps: Vec<i64> = occurrences
        .windows(2)
        .map(|w| (w[1] - w[0]).num_days())
        .collect();
    let frequency = median_gap(&gaps).map_or(PayFrequency::Irregular, PayFrequency::from_median_gap);
    let on_schedule_count = if occurrences.is_empty() {
        0
    } else {
        1 + gaps.iter().filter(|g| frequency.is_on_schedule(**g)).count()
    };

    let occurrence_count = occurrences.len();
    let income_type = match (occurrence_count, frequency) {
        (0..=1, _) => IncomeType::OneTime,
        (_, PayFrequency::Irregular) => IncomeType::Irregular,
        _ => IncomeType::Recurring,
    };

    let confidence = score(
        occurrence_count,
        on_schedule_count,
        share_of(total_amount, window_income),
        config,
    );

    RecurringSourceGroup {
        source_key,
        display_name,
        occurrences,
        occurrence_count,
        total_amount,
        approximate_amount,
        frequency,
        on_schedule_count,
        income_type,
        confidence,
    }
}

/// Upper median of the gaps, `None` with fewer than two occurrences
fn median_gap(gaps: &[i64]) -> Option<i64> {
    if gaps.is_empty() {
        return None;
    }
    let mut sorted = gaps.to_vec();
    sorted.sort_unstable();
    Some(sorted[sorted.len() / 2])
}

/// Highest total first, then most deposits, then most recent, then key
pub fn rank_cmp(a: &RecurringSourceGroup, b: &RecurringSourceGroup) -> Ordering {
    b.total_amount
        .total_cmp(&a.total_amount)
        .then_with(|| b.occurrence_count.cmp(&a.occurrence_count))
        .then_with(|| b.last_date().cmp(&a.last_date()))
        .then_with(|| a.source_key.cmp(&b.source_key))
}

/// The primary income source: the best-ranked group
pub fn primary_source(groups: &[RecurringSourceGroup]) -> Option<&RecurringSourceGroup> {
    groups.iter().min_by(|a, b| rank_cmp(a, b))
}
