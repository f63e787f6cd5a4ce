//! Raw snapshot envelopes as the bank-data collaborator delivers them.
//!
//! Every field is optional so a sparse record still deserializes; the
//! normalizer decides what a missing value means. Transactions and accounts
//! stay as `serde_json::Value` in the envelope so one malformed element can
//! never fail the whole snapshot.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Current provider snapshot
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawSnapshot {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub accounts: Vec<Value>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub transactions: Vec<Value>,
    pub fetched_at: Option<String>,
    pub date_range: RawDateRange,
    pub provider: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawDateRange {
    pub start: Option<String>,
    pub end: Option<String>,
}

/// Pre-computed report stored before the engine existed
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawLegacyReport {
    pub total_income_12mo: RawAmount,
    pub total_income_3mo: Option<RawAmount>,
    pub monthly_income: Option<RawAmount>,
    pub total_balance: Option<RawAmount>,
    pub total_available: Option<RawAmount>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub accounts: Vec<Value>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub transactions: Vec<Value>,
    pub generated_at: Option<String>,
}

/// An explicit `null` list reads the same as a missing one
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Amounts arrive as JSON numbers (Plaid) or strings (Teller, legacy exports)
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RawAmount {
    Number(f64),
    Text(String),
}

/// Plaid's legacy category hierarchy is a list; some feeds send a single string
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RawCategory {
    List(Vec<String>),
    Single(String),
}

impl RawCategory {
    /// Top-level category name, if any
    pub fn primary(&self) -> Option<&str> {
        match self {
            RawCategory::List(items) => items.first().map(String::as_str),
            RawCategory::Single(value) => Some(value.as_str()),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PersonalFinanceCategory {
    pub primary: Option<String>,
    pub detailed: Option<String>,
}

/// Teller's enrichment block
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TellerDetails {
    pub category: Option<String>,
    pub counterparty: Option<TellerCounterparty>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TellerCounterparty {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// Union of the Plaid and Teller transaction fields the engine reads
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawTransaction {
    #[serde(alias = "transaction_id")]
    pub id: Option<String>,
    pub account_id: Option<String>,
    pub date: Option<String>,
    pub amount: Option<RawAmount>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub merchant_name: Option<String>,
    pub category: Option<RawCategory>,
    pub personal_finance_category: Option<PersonalFinanceCategory>,
    pub details: Option<TellerDetails>,
    pub pending: Option<bool>,
    pub status: Option<String>,
}

impl RawTransaction {
    /// First non-blank of name, description, merchant name, counterparty
    pub fn display_name(&self) -> Option<&str> {
        let counterparty = self
            .details
            .as_ref()
            .and_then(|d| d.counterparty.as_ref())
            .and_then(|c| c.name.as_deref());

        [
            self.name.as_deref(),
            self.description.as_deref(),
            self.merchant_name.as_deref(),
            counterparty,
        ]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawBalances {
    pub available: Option<RawAmount>,
    #[serde(alias = "ledger")]
    pub current: Option<RawAmount>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawAccount {
    #[serde(alias = "account_id")]
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(alias = "officialName")]
    pub official_name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub subtype: Option<String>,
    #[serde(alias = "last_four")]
    pub mask: Option<String>,
    #[serde(default)]
    pub balances: RawBalances,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_accepts_number_or_string() {
        let n: RawAmount = serde_json::from_str("12.5").unwrap();
        let s: RawAmount = serde_json::from_str("\"-12.50\"").unwrap();
        assert_eq!(n, RawAmount::Number(12.5));
        assert_eq!(s, RawAmount::Text("-12.50".to_string()));
    }

    #[test]
    fn test_display_name_falls_through_blank_fields() {
        let txn: RawTransaction = serde_json::from_value(serde_json::json!({
            "name": "  ",
            "details": { "counterparty": { "name": "ACME Corp", "type": "organization" } }
        }))
        .unwrap();
        assert_eq!(txn.display_name(), Some("ACME Corp"));
    }

    #[test]
    fn test_null_lists_read_as_empty() {
        let raw: RawSnapshot = serde_json::from_value(serde_json::json!({
            "provider": "teller",
            "date_range": { "start": "2026-01-01" },
            "accounts": null,
            "transactions": null
        }))
        .unwrap();
        assert!(raw.accounts.is_empty());
        assert!(raw.transactions.is_empty());

        let legacy: RawLegacyReport = serde_json::from_value(serde_json::json!({
            "total_income_12mo": 1200.0,
            "transactions": null
        }))
        .unwrap();
        assert!(legacy.accounts.is_empty());
        assert!(legacy.transactions.is_empty());
    }

    #[test]
    fn test_transaction_id_alias() {
        let txn: RawTransaction =
            serde_json::from_value(serde_json::json!({ "transaction_id": "tx_1" })).unwrap();
        assert_eq!(txn.id.as_deref(), Some("tx_1"));
    }
}
