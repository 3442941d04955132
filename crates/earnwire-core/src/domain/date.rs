//! Plain calendar-date helpers.
//!
//! Upstream payloads and CLI flags carry dates as `YYYY-MM-DD` strings;
//! these helpers convert to and from `time::Date` without pulling in a
//! format-description dependency on the serialization path.

use time::{Date, Month};

use crate::ValidationError;

/// Parse a `YYYY-MM-DD` string into a calendar date.
pub fn parse_iso_date(input: &str) -> Result<Date, ValidationError> {
    let invalid = || ValidationError::InvalidDate {
        value: input.to_owned(),
    };

    let trimmed = input.trim();
    let mut parts = trimmed.splitn(3, '-');
    let year = parts
        .next()
        .and_then(|part| part.parse::<i32>().ok())
        .ok_or_else(invalid)?;
    let month = parts
        .next()
        .and_then(|part| part.parse::<u8>().ok())
        .ok_or_else(invalid)?;
    let day = parts
        .next()
        .and_then(|part| part.parse::<u8>().ok())
        .ok_or_else(invalid)?;

    let month = Month::try_from(month).map_err(|_| invalid())?;
    Date::from_calendar_date(year, month, day).map_err(|_| invalid())
}

/// Render a calendar date as `YYYY-MM-DD`.
pub fn format_iso_date(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

/// Serde adapter serializing `time::Date` as a `YYYY-MM-DD` string.
pub(crate) mod iso {
    use serde::de::Error as DeError;
    use serde::{Deserialize, Deserializer, Serializer};
    use time::Date;

    pub fn serialize<S>(date: &Date, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_iso_date(*date))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Date, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        super::parse_iso_date(&value).map_err(D::Error::custom)
    }
}
