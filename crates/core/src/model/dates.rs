//! Calendar date parsing for activity date fields.
//!
//! Accepted forms:
//! - `YYYY-MM-DD`, taken as UTC midnight (the form date pickers produce),
//! - `YYYY-MM-DDTHH:MM[:SS]` without an offset, taken as UTC,
//! - RFC 3339 date-times with an offset (`2024-01-05T10:00:00.000Z`).
//!
//! Anything else is rejected rather than guessed at.

use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime, UtcOffset};

const MILLIS_PER_SECOND: f64 = 1_000.0;
const NANOS_PER_MILLI: i128 = 1_000_000;

/// Parse a date field into milliseconds since the Unix epoch (UTC).
pub fn parse_timestamp(value: &str) -> Option<f64> {
    let dt = parse_datetime(value.trim())?;
    Some((dt.unix_timestamp_nanos() / NANOS_PER_MILLI) as f64)
}

/// Parse a date field into its UTC calendar date.
pub fn parse_date(value: &str) -> Option<Date> {
    parse_datetime(value.trim()).map(|dt| dt.date())
}

/// Milliseconds since the Unix epoch for UTC midnight of `date`.
pub fn date_to_timestamp(date: Date) -> f64 {
    date.midnight().assume_utc().unix_timestamp() as f64 * MILLIS_PER_SECOND
}

fn parse_datetime(value: &str) -> Option<OffsetDateTime> {
    if value.is_empty() {
        return None;
    }
    if let Ok(date) = Date::parse(value, format_description!("[year]-[month]-[day]")) {
        return Some(date.midnight().assume_utc());
    }
    if let Ok(dt) = OffsetDateTime::parse(value, &Rfc3339) {
        return Some(dt.to_offset(UtcOffset::UTC));
    }
    PrimitiveDateTime::parse(
        value,
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
    )
    .or_else(|_| {
        PrimitiveDateTime::parse(value, format_description!("[year]-[month]-[day]T[hour]:[minute]"))
    })
    .ok()
    .map(PrimitiveDateTime::assume_utc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Month;

    #[test]
    fn date_only_is_utc_midnight() {
        // 2024-01-01T00:00:00Z
        assert_eq!(parse_timestamp("2024-01-01"), Some(1_704_067_200_000.0));
    }

    #[test]
    fn rfc3339_with_offset_is_normalized_to_utc() {
        let utc = parse_timestamp("2024-01-01T12:00:00Z").unwrap();
        let shifted = parse_timestamp("2024-01-01T14:00:00+02:00").unwrap();
        assert_eq!(utc, shifted);
        assert_eq!(utc - parse_timestamp("2024-01-01").unwrap(), 12.0 * 3_600_000.0);
    }

    #[test]
    fn fractional_seconds_keep_millisecond_precision() {
        let ts = parse_timestamp("2024-01-01T00:00:00.250Z").unwrap();
        assert_eq!(ts, 1_704_067_200_250.0);
    }

    #[test]
    fn naive_datetime_with_and_without_seconds() {
        assert_eq!(
            parse_timestamp("2024-01-01T06:30"),
            parse_timestamp("2024-01-01T06:30:00")
        );
        assert!(parse_timestamp("2024-01-01T06:30").is_some());
    }

    #[test]
    fn rejects_garbage_and_impossible_dates() {
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("   "), None);
        assert_eq!(parse_timestamp("not a date"), None);
        assert_eq!(parse_timestamp("2024-02-30"), None);
        assert_eq!(parse_timestamp("2024-13-01"), None);
    }

    #[test]
    fn parse_date_takes_utc_calendar_day() {
        let date = parse_date("2024-03-31T23:30:00-02:00").unwrap();
        assert_eq!(date.month(), Month::April);
        assert_eq!(date.day(), 1);
    }

    #[test]
    fn date_to_timestamp_matches_parse() {
        let date = parse_date("2023-07-15").unwrap();
        assert_eq!(Some(date_to_timestamp(date)), parse_timestamp("2023-07-15"));
    }
}
