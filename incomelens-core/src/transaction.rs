//! Canonical transaction and account records produced by the normalizer

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Reason a record is kept for display but left out of every total
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum RecordIssue {
    InvalidDate(String),
    InvalidAmount(String),
    MalformedRecord(String),
}

/// A transaction in the provider-agnostic shape.
///
/// Sign convention: positive `amount` = money into the account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedTransaction {
    /// Provider id, or a positional id (`txn-0007`) when the provider sent none
    pub id: String,
    pub account_id: Option<String>,
    /// `None` when the provider date could not be parsed
    pub date: Option<NaiveDate>,
    /// `None` when the provider amount could not be parsed
    pub amount: Option<f64>,
    pub is_income: bool,
    /// Original name/description, untouched
    pub name: String,
    pub category: Option<String>,
    pub pending: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<RecordIssue>,
}

impl NormalizedTransaction {
    /// Create a settled transaction. `is_income` follows the sign of `amount`.
    pub fn new(
        id: impl Into<String>,
        date: Option<NaiveDate>,
        amount: Option<f64>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            account_id: None,
            date,
            amount,
            is_income: amount.is_some_and(|a| a > 0.0),
            name: name.into(),
            category: None,
            pending: false,
            issues: Vec::new(),
        }
    }

    pub fn with_account(mut self, account_id: impl Into<String>) -> Self {
        self.account_id = Some(account_id.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_pending(mut self, pending: bool) -> Self {
        self.pending = pending;
        self
    }

    pub fn with_issue(mut self, issue: RecordIssue) -> Self {
        self.issues.push(issue);
        self
    }

    /// Parsed date and amount, and nothing flagged
    pub fn is_valid(&self) -> bool {
        self.date.is_some() && self.amount.is_some() && self.issues.is_empty()
    }

    /// Counted toward totals and averages
    pub fn is_aggregatable(&self) -> bool {
        self.is_valid() && !self.pending
    }

    pub fn is_expense(&self) -> bool {
        !self.is_income
    }

    /// Signed amount, invalid amounts read as zero
    pub fn signed_amount(&self) -> f64 {
        self.amount.unwrap_or(0.0)
    }

    /// Get the absolute amount
    pub fn abs_amount(&self) -> f64 {
        self.signed_amount().abs()
    }

    pub fn category_label(&self) -> &str {
        self.category.as_deref().unwrap_or("Uncategorized")
    }
}

/// An account in the provider-agnostic shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedAccount {
    pub id: String,
    pub name: String,
    pub official_name: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    pub subtype: Option<String>,
    pub mask: Option<String>,
    pub current_balance: Option<f64>,
    pub available_balance: Option<f64>,
}

impl NormalizedAccount {
    pub fn current_or_zero(&self) -> f64 {
        self.current_balance.unwrap_or(0.0)
    }

    /// Available balance, falling back to the current balance
    pub fn available_or_current(&self) -> f64 {
        self.available_balance
            .or(self.current_balance)
            .unwrap_or(0.0)
    }
}
