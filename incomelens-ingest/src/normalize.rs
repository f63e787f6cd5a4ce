//! Record normalizer: provider records to the canonical transaction/account shape.
//!
//! Failures are isolated per record. A transaction whose date or amount cannot
//! be read still comes out the other side, carrying a [`RecordIssue`] so the
//! aggregator skips it and the ledger can still show it.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;
use tracing::{debug, warn};

use incomelens_core::time::{parse_provider_date, parse_provider_timestamp};
use incomelens_core::{NormalizedAccount, NormalizedTransaction, RecordIssue};

use crate::error::{IngestError, Result};
use crate::legacy::LegacySnapshot;
use crate::providers::Provider;
use crate::types::{RawAccount, RawAmount, RawSnapshot, RawTransaction};

/// A snapshot resolved once at the ingest boundary.
///
/// Consumers match on this instead of probing fields themselves.
#[derive(Debug, Clone)]
pub enum SnapshotInput {
    Current(NormalizedSnapshot),
    Legacy(LegacySnapshot),
}

/// Current-schema snapshot after normalization
#[derive(Debug, Clone)]
pub struct NormalizedSnapshot {
    pub provider: Provider,
    pub accounts: Vec<NormalizedAccount>,
    pub transactions: Vec<NormalizedTransaction>,
    pub fetched_at: Option<DateTime<Utc>>,
    /// `date_range.start` as reported by the provider
    pub range_start: Option<NaiveDate>,
    pub range_end: Option<NaiveDate>,
}

impl NormalizedSnapshot {
    /// First day the history covers: the earlier of the reported range start
    /// and the earliest readable transaction date.
    pub fn history_start(&self) -> Option<NaiveDate> {
        self.range_start
            .into_iter()
            .chain(self.transactions.iter().filter_map(|t| t.date))
            .min()
    }
}

pub fn normalize_snapshot(raw: &RawSnapshot) -> Result<NormalizedSnapshot> {
    let provider: Provider = match raw.provider.as_deref() {
        Some(tag) => tag.parse()?,
        None => return Err(IngestError::UnknownProvider("(missing)".to_string())),
    };

    let accounts = normalize_accounts(&raw.accounts);
    let transactions = normalize_transactions(&raw.transactions, provider);

    let invalid = transactions.iter().filter(|t| !t.is_valid()).count();
    debug!(
        provider = %provider,
        accounts = accounts.len(),
        transactions = transactions.len(),
        invalid,
        "normalized snapshot"
    );

    Ok(NormalizedSnapshot {
        provider,
        accounts,
        transactions,
        fetched_at: raw.fetched_at.as_deref().and_then(parse_provider_timestamp),
        range_start: raw.date_range.start.as_deref().and_then(parse_provider_date),
        range_end: raw.date_range.end.as_deref().and_then(parse_provider_date),
    })
}

/// One output per input element, in input order
pub fn normalize_transactions(raw: &[Value], provider: Provider) -> Vec<NormalizedTransaction> {
    raw.iter()
        .enumerate()
        .map(|(index, value)| normalize_transaction(index, value, provider))
        .collect()
}

pub fn normalize_transaction(index: usize, value: &Value, provider: Provider) -> NormalizedTransaction {
    let fallback_id = format!("txn-{:04}", index);

    let raw: RawTransaction = match serde_json::from_value(value.clone()) {
        Ok(raw) => raw,
        Err(e) => {
            warn!(index, error = %e, "unreadable transaction record");
            let name = value
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or("Unreadable record");
            return NormalizedTransaction::new(fallback_id, None, None, name)
                .with_issue(RecordIssue::MalformedRecord(e.to_string()));
        }
    };

    let id = raw
        .id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or(fallback_id);

    let mut issues = Vec::new();

    let date = raw.date.as_deref().and_then(parse_provider_date);
    if date.is_none() {
        let shown = raw.date.clone().unwrap_or_else(|| "missing".to_string());
        warn!(index, id = %id, date = %shown, "invalid transaction date");
        issues.push(RecordIssue::InvalidDate(shown));
    }

    let amount = raw
        .amount
        .as_ref()
        .and_then(parse_amount)
        .map(|a| canonical_zero(provider.inflow_amount(a)));
    if amount.is_none() {
        let shown = match &raw.amount {
            Some(RawAmount::Number(n)) => n.to_string(),
            Some(RawAmount::Text(s)) => s.clone(),
            None => "missing".to_string(),
        };
        warn!(index, id = %id, amount = %shown, "invalid transaction amount");
        issues.push(RecordIssue::InvalidAmount(shown));
    }

    let name = raw.display_name().unwrap_or("Unknown").to_string();

    let mut txn = NormalizedTransaction::new(id, date, amount, name)
        .with_pending(provider.is_pending(&raw));
    if let Some(account_id) = raw.account_id.as_deref() {
        txn = txn.with_account(account_id);
    }
    if let Some(category) = provider.category(&raw) {
        txn = txn.with_category(category);
    }
    for issue in issues {
        txn = txn.with_issue(issue);
    }
    txn
}

pub fn normalize_accounts(raw: &[Value]) -> Vec<NormalizedAccount> {
    raw.iter()
        .enumerate()
        .map(|(index, value)| {
            let account: RawAccount = serde_json::from_value(value.clone()).unwrap_or_else(|e| {
                warn!(index, error = %e, "unreadable account record");
                RawAccount::default()
            });
            normalize_account(index, account)
        })
        .collect()
}

fn normalize_account(index: usize, raw: RawAccount) -> NormalizedAccount {
    NormalizedAccount {
        id: raw.id.unwrap_or_else(|| format!("acct-{:02}", index)),
        name: raw.name.unwrap_or_else(|| "Account".to_string()),
        official_name: raw.official_name,
        kind: raw.kind.unwrap_or_else(|| "unknown".to_string()),
        subtype: raw.subtype,
        mask: raw.mask,
        current_balance: raw.balances.current.as_ref().and_then(parse_amount),
        available_balance: raw.balances.available.as_ref().and_then(parse_amount),
    }
}

/// Parse a provider amount: numbers as-is, strings with `$`, thousands
/// separators and accounting-style parentheses for negatives.
pub fn parse_amount(raw: &RawAmount) -> Option<f64> {
    let value = match raw {
        RawAmount::Number(n) => *n,
        RawAmount::Text(text) => {
            let s = text.replace([',', '$'], "");
            let s = s.trim();
            match s.strip_prefix('(').and_then(|v| v.strip_suffix(')')) {
                Some(inner) => -inner.trim().parse::<f64>().ok()?,
                None => s.parse::<f64>().ok()?,
            }
        }
    };
    value.is_finite().then_some(value)
}

/// Fold `-0.0` into `0.0` so a zero Plaid amount does not print as negative
fn canonical_zero(amount: f64) -> f64 {
    if amount == 0.0 { 0.0 } else { amount }
}
