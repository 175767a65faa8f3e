//! Serde helpers for note timestamps.
//!
//! Timestamps are written as RFC 3339 UTC strings with millisecond precision
//! (`2024-05-01T09:30:00.000Z`) and read back from any RFC 3339 offset.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serializer};

/// Formats a timestamp the way it is persisted.
pub fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Drops sub-millisecond precision so values survive a persistence round-trip.
pub fn truncate_to_millis(value: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(value.timestamp_millis()).unwrap_or(value)
}

pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format_timestamp(value))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|err| serde::de::Error::custom(format!("invalid timestamp `{raw}`: {err}")))
}

#[cfg(test)]
mod tests {
    use super::{format_timestamp, truncate_to_millis};
    use chrono::{DateTime, TimeZone, Utc};

    #[test]
    fn format_uses_millisecond_precision_and_z_suffix() {
        let value = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();
        assert_eq!(format_timestamp(&value), "2024-05-01T09:30:00.000Z");
    }

    #[test]
    fn truncate_drops_microseconds() {
        let value = DateTime::from_timestamp(1_700_000_000, 123_456_789).unwrap();
        let truncated = truncate_to_millis(value);
        assert_eq!(truncated.timestamp_subsec_nanos(), 123_000_000);
    }
}
