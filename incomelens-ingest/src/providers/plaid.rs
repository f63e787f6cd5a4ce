//! Plaid transactions
//!
//! Plaid reports money leaving the account as a positive amount, so a
//! paycheck arrives as `-2200.00`.

use super::non_blank;
use crate::types::RawTransaction;

pub fn inflow_amount(provider_amount: f64) -> f64 {
    -provider_amount
}

/// `personal_finance_category.primary`, else the top of the legacy `category` list
pub fn category(txn: &RawTransaction) -> Option<String> {
    let pfc = txn
        .personal_finance_category
        .as_ref()
        .and_then(|p| p.primary.as_deref());

    non_blank(pfc).or_else(|| non_blank(txn.category.as_ref().and_then(|c| c.primary())))
}

pub fn is_pending(txn: &RawTransaction) -> bool {
    txn.pending.unwrap_or(false)
}
