//! Confidence scoring from recurrence evidence.
//!
//! `high`: the source carries at least `dominant_share` of window income and
//! has `min_on_schedule` deposits on its cadence. `low`: no payroll source,
//! or a single deposit. Everything in between is `medium`.

use incomelens_core::{Confidence, RecurringSourceGroup};

use crate::config::ConfidenceConfig;

/// Reports without recurrence data never claim more than this
pub const LEGACY_CONFIDENCE: Confidence = Confidence::Low;

pub fn score(
    occurrences: usize,
    on_schedule: usize,
    share: f64,
    config: &ConfidenceConfig,
) -> Confidence {
    if occurrences < 2 {
        return Confidence::Low;
    }
    if share >= config.dominant_share && on_schedule >= config.min_on_schedule {
        return Confidence::High;
    }
    Confidence::Medium
}

/// Confidence of the whole estimate: that of the primary source, `low` without one
pub fn overall(primary: Option<&RecurringSourceGroup>) -> Confidence {
    primary.map_or(Confidence::Low, |g| g.confidence)
}

/// `part / whole`, zero when there is nothing to share
pub fn share_of(part: f64, whole: f64) -> f64 {
    if whole > 0.0 { part / whole } else { 0.0 }
}
