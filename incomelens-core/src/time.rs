//! Time utilities: timezone-aware report dates and lenient provider date parsing.

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

/// Resolve the calendar date of `now` in an IANA tz like "America/Chicago".
pub fn report_date_in_tz(now: DateTime<Utc>, tz: &str) -> Result<NaiveDate> {
    let tz: Tz = tz
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid timezone: {tz}"))?;

    Ok(now.with_timezone(&tz).date_naive())
}

/// Parse a provider date: `YYYY-MM-DD` or a full RFC 3339 timestamp.
pub fn parse_provider_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }

    parse_provider_timestamp(trimmed).map(|dt| dt.date_naive())
}

/// Parse an RFC 3339 timestamp into UTC.
pub fn parse_provider_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_report_date_rolls_back_in_chicago() {
        // 03:00 UTC on Oct 1 is still Sep 30 in Chicago (CDT, UTC-5)
        let now = Utc.with_ymd_and_hms(2026, 10, 1, 3, 0, 0).unwrap();
        let date = report_date_in_tz(now, "America/Chicago").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2026, 9, 30).unwrap());
    }

    #[test]
    fn test_report_date_rejects_unknown_tz() {
        let now = Utc.with_ymd_and_hms(2026, 10, 1, 3, 0, 0).unwrap();
        assert!(report_date_in_tz(now, "Mars/Olympus").is_err());
    }

    #[test]
    fn test_parse_provider_date_variants() {
        let expected = NaiveDate::from_ymd_opt(2026, 9, 24).unwrap();
        assert_eq!(parse_provider_date("2026-09-24"), Some(expected));
        assert_eq!(parse_provider_date(" 2026-09-24T10:00:00Z "), Some(expected));
        assert_eq!(parse_provider_date("09/24/2026"), None);
        assert_eq!(parse_provider_date(""), None);
        assert_eq!(parse_provider_date("2026-02-30"), None);
    }
}
