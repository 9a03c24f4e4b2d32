// ── Lenient payload decoding ──
//
// The remote emits naive ISO-8601 timestamps (no offset) alongside RFC 3339
// ones, and list endpoints may carry rows that do not match the contract.
// Malformed rows are quarantined here instead of failing the whole list.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse an RFC 3339 timestamp, or a naive one interpreted as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Serde adapter for optional timestamps in either format.
pub(crate) fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(s) if s.is_empty() => Ok(None),
        Some(s) => parse_timestamp(&s)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {s:?}"))),
    }
}

/// Decode each element independently, dropping the ones that fail.
///
/// Returns the decoded elements and the number of rejected ones.
pub(crate) fn decode_each<T: DeserializeOwned>(values: Vec<Value>, kind: &str) -> (Vec<T>, usize) {
    let mut accepted = Vec::with_capacity(values.len());
    let mut rejected = 0;

    for value in values {
        match serde_json::from_value::<T>(value) {
            Ok(item) => accepted.push(item),
            Err(e) => {
                rejected += 1;
                warn!(kind, error = %e, "quarantined malformed payload element");
            }
        }
    }

    (accepted, rejected)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use serde_json::json;

    #[test]
    fn parses_rfc3339_with_offset() {
        let ts = parse_timestamp("2024-06-15T12:30:00+02:00").unwrap();
        assert_eq!(ts.hour(), 10);
    }

    #[test]
    fn parses_naive_as_utc() {
        let ts = parse_timestamp("2024-06-15T10:30:00.123456").unwrap();
        assert_eq!(ts.day(), 15);
        assert_eq!(ts.hour(), 10);

        let spaced = parse_timestamp("2024-06-15 10:30:00").unwrap();
        assert_eq!(spaced.minute(), 30);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn decode_each_counts_rejections() {
        #[derive(Debug, serde::Deserialize)]
        struct Row {
            #[allow(dead_code)]
            id: i64,
        }

        let (rows, rejected) =
            decode_each::<Row>(vec![json!({"id": 1}), json!({"id": "x"}), json!({"id": 3})], "row");
        assert_eq!(rows.len(), 2);
        assert_eq!(rejected, 1);
    }
}
