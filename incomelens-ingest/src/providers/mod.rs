//! Provider adapters: sign convention, category and pending-state extraction.
//!
//! Each provider module exposes the same three functions; [`Provider`]
//! dispatches to them so the normalizer stays provider-agnostic.

pub mod plaid;
pub mod teller;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::IngestError;
use crate::types::RawTransaction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Plaid,
    Teller,
}

impl Provider {
    pub fn as_str(self) -> &'static str {
        match self {
            Provider::Plaid => "plaid",
            Provider::Teller => "teller",
        }
    }

    /// Convert a provider amount to the canonical sign (positive = inflow)
    pub fn inflow_amount(self, provider_amount: f64) -> f64 {
        match self {
            Provider::Plaid => plaid::inflow_amount(provider_amount),
            Provider::Teller => teller::inflow_amount(provider_amount),
        }
    }

    pub fn category(self, txn: &RawTransaction) -> Option<String> {
        match self {
            Provider::Plaid => plaid::category(txn),
            Provider::Teller => teller::category(txn),
        }
    }

    pub fn is_pending(self, txn: &RawTransaction) -> bool {
        match self {
            Provider::Plaid => plaid::is_pending(txn),
            Provider::Teller => teller::is_pending(txn),
        }
    }
}

impl FromStr for Provider {
    type Err = IngestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "plaid" => Ok(Provider::Plaid),
            "teller" => Ok(Provider::Teller),
            other => Err(IngestError::UnknownProvider(other.to_string())),
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trimmed, non-empty copy of an optional provider string
pub(crate) fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
