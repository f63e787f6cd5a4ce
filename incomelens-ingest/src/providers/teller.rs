//! Teller transactions
//!
//! Teller amounts are strings with the account's own sign: `"-12.00"` is a
//! debit, `"2200.00"` a deposit. Enrichment lives under `details`.

use super::non_blank;
use crate::types::RawTransaction;

pub fn inflow_amount(provider_amount: f64) -> f64 {
    provider_amount
}

pub fn category(txn: &RawTransaction) -> Option<String> {
    non_blank(txn.details.as_ref().and_then(|d| d.category.as_deref()))
}

pub fn is_pending(txn: &RawTransaction) -> bool {
    txn.status
        .as_deref()
        .is_some_and(|s| s.eq_ignore_ascii_case("pending"))
}
