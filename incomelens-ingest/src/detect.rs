//! Snapshot shape detection.
//!
//! The shape is decided once, here, from a single discriminating field:
//! a nested `date_range.start` marks the current provider envelope, a flat
//! `total_income_12mo` marks a legacy report. Anything else is rejected.

use serde_json::Value;
use tracing::debug;

use crate::error::{IngestError, Result};
use crate::legacy::normalize_legacy;
use crate::normalize::{SnapshotInput, normalize_snapshot};
use crate::types::{RawLegacyReport, RawSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotShape {
    Current,
    Legacy,
}

pub fn detect_shape(value: &Value) -> Result<SnapshotShape> {
    let obj = value.as_object().ok_or(IngestError::UnknownSchema)?;

    let has_range_start = obj
        .get("date_range")
        .and_then(Value::as_object)
        .is_some_and(|range| range.contains_key("start"));

    if has_range_start {
        Ok(SnapshotShape::Current)
    } else if obj.contains_key("total_income_12mo") {
        Ok(SnapshotShape::Legacy)
    } else {
        Err(IngestError::UnknownSchema)
    }
}

/// Parse and normalize a snapshot document
pub fn parse_snapshot(json: &str) -> Result<SnapshotInput> {
    let value: Value = serde_json::from_str(json)?;
    from_value(value)
}

pub fn from_value(value: Value) -> Result<SnapshotInput> {
    let shape = detect_shape(&value)?;
    debug!(?shape, "detected snapshot shape");

    match shape {
        SnapshotShape::Current => {
            let raw: RawSnapshot = serde_json::from_value(value)?;
            Ok(SnapshotInput::Current(normalize_snapshot(&raw)?))
        }
        SnapshotShape::Legacy => {
            let raw: RawLegacyReport = serde_json::from_value(value)?;
            Ok(SnapshotInput::Legacy(normalize_legacy(&raw)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_detect_current_and_legacy() {
        let current = json!({ "provider": "plaid", "date_range": { "start": "2025-10-01", "end": "2026-10-01" } });
        let legacy = json!({ "total_income_12mo": 1000.0, "accounts": [] });
        assert_eq!(detect_shape(&current).unwrap(), SnapshotShape::Current);
        assert_eq!(detect_shape(&legacy).unwrap(), SnapshotShape::Legacy);
    }

    #[test]
    fn test_unknown_shape_is_a_hard_failure() {
        for value in [
            json!({ "accounts": [], "transactions": [] }),
            json!({ "date_range": "2025-10-01..2026-10-01" }),
            json!([1, 2, 3]),
        ] {
            assert!(matches!(detect_shape(&value), Err(IngestError::UnknownSchema)));
        }
        assert!(matches!(
            parse_snapshot(r#"{"summary": {}}"#),
            Err(IngestError::UnknownSchema)
        ));
    }

    #[test]
    fn test_parse_snapshot_dispatches() {
        let current = r#"{
            "provider": "teller",
            "fetched_at": "2026-10-15T09:30:00Z",
            "date_range": { "start": "2025-10-01", "end": "2026-10-15" },
            "accounts": [],
            "transactions": [{ "id": "t1", "date": "2026-09-01", "amount": "100.00", "description": "GUSTO PAY" }]
        }"#;
        match parse_snapshot(current).unwrap() {
            SnapshotInput::Current(snap) => {
                assert_eq!(snap.transactions.len(), 1);
                assert_eq!(snap.transactions[0].amount, Some(100.0));
                assert!(snap.fetched_at.is_some());
            }
            SnapshotInput::Legacy(_) => panic!("expected current snapshot"),
        }

        let legacy = r#"{ "total_income_12mo": 48000, "monthly_income": 4000 }"#;
        assert!(matches!(parse_snapshot(legacy).unwrap(), SnapshotInput::Legacy(_)));
    }

    #[test]
    fn test_invalid_json_surfaces_as_json_error() {
        assert!(matches!(parse_snapshot("{not json"), Err(IngestError::Json(_))));
    }

    #[test]
    fn test_unknown_provider_in_current_shape() {
        let doc = json!({ "provider": "mx", "date_range": { "start": "2025-10-01" } });
        assert!(matches!(from_value(doc), Err(IngestError::UnknownProvider(_))));
    }
}
