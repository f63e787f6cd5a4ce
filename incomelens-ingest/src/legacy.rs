//! Legacy pre-computed reports
//!
//! Reports stored before recurrence detection existed carry flat totals and
//! no grouping data. Their totals are taken as-is; transactions, when present,
//! were stored in Plaid's sign convention.

use chrono::{DateTime, NaiveTime, Utc};
use tracing::warn;

use incomelens_core::time::{parse_provider_date, parse_provider_timestamp};
use incomelens_core::{NormalizedAccount, NormalizedTransaction};

use crate::normalize::{normalize_accounts, normalize_transactions, parse_amount};
use crate::providers::Provider;
use crate::types::{RawAmount, RawLegacyReport};

/// Totals fixed when the legacy report was generated
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LegacyTotals {
    pub total_income_12mo: f64,
    pub total_income_3mo: f64,
    pub monthly_income: f64,
    pub total_balance: Option<f64>,
    pub total_available: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct LegacySnapshot {
    pub totals: LegacyTotals,
    pub accounts: Vec<NormalizedAccount>,
    pub transactions: Vec<NormalizedTransaction>,
    pub generated_at: Option<DateTime<Utc>>,
}

pub fn normalize_legacy(raw: &RawLegacyReport) -> LegacySnapshot {
    let totals = LegacyTotals {
        total_income_12mo: legacy_total("total_income_12mo", Some(&raw.total_income_12mo)).unwrap_or(0.0),
        total_income_3mo: legacy_total("total_income_3mo", raw.total_income_3mo.as_ref()).unwrap_or(0.0),
        monthly_income: legacy_total("monthly_income", raw.monthly_income.as_ref()).unwrap_or(0.0),
        total_balance: legacy_total("total_balance", raw.total_balance.as_ref()),
        total_available: legacy_total("total_available", raw.total_available.as_ref()),
    };

    LegacySnapshot {
        totals,
        accounts: normalize_accounts(&raw.accounts),
        transactions: normalize_transactions(&raw.transactions, Provider::Plaid),
        generated_at: raw.generated_at.as_deref().and_then(parse_generated_at),
    }
}

fn legacy_total(field: &str, raw: Option<&RawAmount>) -> Option<f64> {
    let raw = raw?;
    let parsed = parse_amount(raw);
    if parsed.is_none() {
        warn!(field, value = ?raw, "unreadable legacy total, using zero");
    }
    parsed
}

/// RFC 3339, or a bare date read as midnight UTC
fn parse_generated_at(raw: &str) -> Option<DateTime<Utc>> {
    parse_provider_timestamp(raw).or_else(|| {
        parse_provider_date(raw).map(|d| d.and_time(NaiveTime::MIN).and_utc())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_legacy_totals_and_transactions() {
        let raw: RawLegacyReport = serde_json::from_value(json!({
            "total_income_12mo": 52000.0,
            "total_income_3mo": "13,000.00",
            "monthly_income": 4333.33,
            "total_balance": 1520.5,
            "accounts": [{ "account_id": "a1", "name": "Checking", "type": "depository" }],
            "transactions": [
                { "date": "2024-03-01", "amount": -2000.0, "name": "PAYROLL" },
                { "date": "2024-03-02", "amount": 40.0, "name": "GAS" }
            ],
            "generated_at": "2024-03-15T12:00:00Z"
        }))
        .unwrap();

        let legacy = normalize_legacy(&raw);
        assert_eq!(legacy.totals.total_income_12mo, 52000.0);
        assert_eq!(legacy.totals.total_income_3mo, 13000.0);
        assert_eq!(legacy.totals.total_balance, Some(1520.5));
        assert_eq!(legacy.totals.total_available, None);
        assert_eq!(legacy.accounts[0].id, "a1");
        assert!(legacy.transactions[0].is_income);
        assert!(legacy.transactions[1].is_expense());
        assert_eq!(
            legacy.generated_at,
            Some(Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_legacy_generated_at_accepts_bare_date() {
        assert_eq!(
            parse_generated_at("2024-03-15"),
            Some(Utc.with_ymd_and_hms(2024, 3, 15, 0, 0, 0).unwrap())
        );
        assert_eq!(parse_generated_at("yesterday"), None);
    }
}
