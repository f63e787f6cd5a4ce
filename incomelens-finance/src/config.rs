//! Engine configuration. Every field has a default so a partial TOML
//! `[engine]` table is enough.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::payroll_rules::PayrollRules;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub rules: PayrollRules,
    pub grouping: GroupingConfig,
    pub confidence: ConfidenceConfig,
    pub windows: WindowConfig,
}

/// How payer names are folded into grouping keys
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupingConfig {
    /// Characters of the folded name kept in the key
    pub key_prefix_len: usize,
    /// Drop `#ref` tokens, long digit runs and short dates before truncating
    pub strip_reference_numbers: bool,
}

impl Default for GroupingConfig {
    fn default() -> Self {
        Self {
            key_prefix_len: 20,
            strip_reference_numbers: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceConfig {
    /// Share of window income the primary source needs for `high`
    pub dominant_share: f64,
    /// On-schedule occurrences the primary source needs for `high`
    pub min_on_schedule: usize,
}

impl Default for ConfidenceConfig {
    fn default() -> Self {
        Self {
            dominant_share: 0.6,
            min_on_schedule: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub historical_months: u32,
    pub projected_months: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            historical_months: 12,
            projected_months: 3,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), EngineError> {
        if let Some(list) = self.rules.blank_keyword() {
            return Err(EngineError::InvalidConfig(format!(
                "payroll {list} contain a blank keyword"
            )));
        }
        if self.grouping.key_prefix_len == 0 {
            return Err(EngineError::InvalidConfig(
                "grouping.key_prefix_len must be at least 1".to_string(),
            ));
        }
        let share = self.confidence.dominant_share;
        if !(share > 0.0 && share <= 1.0) {
            return Err(EngineError::InvalidConfig(format!(
                "confidence.dominant_share must be in (0, 1], got {share}"
            )));
        }
        let w = &self.windows;
        if w.projected_months == 0 || w.historical_months == 0 {
            return Err(EngineError::InvalidConfig(
                "window lengths must be at least one month".to_string(),
            ));
        }
        if w.projected_months > w.historical_months {
            return Err(EngineError::InvalidConfig(format!(
                "projected window ({} months) cannot exceed historical window ({} months)",
                w.projected_months, w.historical_months
            )));
        }
        Ok(())
    }
}
