//! Serde helpers for UTC timestamps.
//!
//! Timestamps are stored as fixed-width RFC 3339 strings with millisecond
//! precision (`2024-05-01T09:30:00.000Z`), so lexicographic order in the
//! store matches chronological order and range filters can compare strings.

use chrono::{DateTime, NaiveDate, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Deserializer, Serializer};

/// Current time truncated to the persisted precision.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

pub fn format(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Accepts RFC 3339, or a bare `YYYY-MM-DD` read as midnight UTC.
pub fn parse(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    match DateTime::parse_from_rfc3339(value) {
        Ok(dt) => Ok(dt.with_timezone(&Utc)),
        Err(e) => NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc())
            .ok_or(e),
    }
}

pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format(value))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse(&raw).map_err(serde::de::Error::custom)
}

pub mod option {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(dt) => serializer.serialize_some(&super::format(dt)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        raw.map(|s| super::parse(&s).map_err(serde::de::Error::custom))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_is_fixed_width() {
        let a = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let b = a + chrono::Duration::milliseconds(500);
        assert_eq!(format(&a), "2024-01-01T00:00:00.000Z");
        assert_eq!(format(&b), "2024-01-01T00:00:00.500Z");
        assert!(format(&a) < format(&b));
    }

    #[test]
    fn test_parse_accepts_offsets() {
        let parsed = parse("2024-03-10T12:00:00+05:30").unwrap();
        assert_eq!(format(&parsed), "2024-03-10T06:30:00.000Z");
    }

    #[test]
    fn test_parse_bare_date_is_midnight_utc() {
        assert_eq!(format(&parse("2024-03-10").unwrap()), "2024-03-10T00:00:00.000Z");
        assert!(parse("10/03/2024").is_err());
    }
}
