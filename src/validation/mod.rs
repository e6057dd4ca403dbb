//! Input validators for the collection states
//!
//! Pure functions over untrusted user text. Both validators are total over
//! their listed error cases and have no side effects; the conversation engine
//! maps their errors to fixed user-facing messages without touching session
//! state.

use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

use crate::domain::{BirthDate, BirthTime};

/// Validation failures surfaced verbatim to the retry prompt
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("date must be in DD.MM.YYYY format")]
    InvalidDateFormat,

    #[error("year is beyond the supported range (after {cutoff})")]
    FutureYear { cutoff: i32 },

    #[error("time must be in HH:MM format")]
    InvalidTimeFormat,
}

/// Strict two-digit day, two-digit month, four-digit year
static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{2})\.(\d{2})\.(\d{4})$").expect("date regex"));

/// Hour prefix 0–2 and minute prefix 0–5; the full hour range is re-checked
/// numerically afterwards, so 24:00 through 29:59 still fail
static TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-2][0-9]):([0-5][0-9])$").expect("time regex"));

/// Parse and constrain a birth date in strict `DD.MM.YYYY` form
///
/// Any parse failure (including calendar-impossible dates like 31.02) is
/// `InvalidDateFormat`; a year greater than `cutoff_year` is `FutureYear`.
/// The cutoff is a configured constant rather than the real current year,
/// matching the reference behavior.
pub fn validate_date(text: &str, cutoff_year: i32) -> Result<BirthDate, ValidationError> {
    let captures = DATE_RE.captures(text.trim()).ok_or(ValidationError::InvalidDateFormat)?;

    // The regex guarantees digit groups, so these parses cannot fail
    let day: u32 = captures[1].parse().map_err(|_| ValidationError::InvalidDateFormat)?;
    let month: u32 = captures[2].parse().map_err(|_| ValidationError::InvalidDateFormat)?;
    let year: i32 = captures[3].parse().map_err(|_| ValidationError::InvalidDateFormat)?;

    let date = NaiveDate::from_ymd_opt(year, month, day).ok_or(ValidationError::InvalidDateFormat)?;

    if year > cutoff_year {
        return Err(ValidationError::FutureYear { cutoff: cutoff_year });
    }

    Ok(BirthDate::new(date))
}

/// Parse and constrain a birth time in strict `HH:MM` form
pub fn validate_time(text: &str) -> Result<BirthTime, ValidationError> {
    let captures = TIME_RE.captures(text.trim()).ok_or(ValidationError::InvalidTimeFormat)?;

    let hour: u32 = captures[1].parse().map_err(|_| ValidationError::InvalidTimeFormat)?;
    let minute: u32 = captures[2].parse().map_err(|_| ValidationError::InvalidTimeFormat)?;

    if hour > 23 {
        return Err(ValidationError::InvalidTimeFormat);
    }

    Ok(BirthTime::new(hour, minute))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CUTOFF: i32 = 2024;

    #[test]
    fn test_leap_year_date_accepted() {
        let date = validate_date("29.02.2024", CUTOFF).unwrap();
        assert_eq!((date.day(), date.month(), date.year()), (29, 2, 2024));
    }

    #[test]
    fn test_impossible_calendar_date_rejected() {
        assert_eq!(
            validate_date("31.02.2024", CUTOFF),
            Err(ValidationError::InvalidDateFormat)
        );
        assert_eq!(
            validate_date("29.02.2023", CUTOFF),
            Err(ValidationError::InvalidDateFormat)
        );
    }

    #[test]
    fn test_year_beyond_cutoff_rejected() {
        assert_eq!(
            validate_date("01.01.2025", CUTOFF),
            Err(ValidationError::FutureYear { cutoff: CUTOFF })
        );
        assert!(validate_date("31.12.2024", CUTOFF).is_ok());
    }

    #[test]
    fn test_cutoff_is_configurable() {
        assert!(validate_date("01.01.2025", 2030).is_ok());
        assert_eq!(
            validate_date("01.01.2025", 2020),
            Err(ValidationError::FutureYear { cutoff: 2020 })
        );
    }

    #[test]
    fn test_strict_two_digit_format_required() {
        assert_eq!(validate_date("1.1.2020", CUTOFF), Err(ValidationError::InvalidDateFormat));
        assert_eq!(validate_date("01/01/2020", CUTOFF), Err(ValidationError::InvalidDateFormat));
        assert_eq!(validate_date("01.01.20", CUTOFF), Err(ValidationError::InvalidDateFormat));
        assert_eq!(validate_date("", CUTOFF), Err(ValidationError::InvalidDateFormat));
        assert_eq!(validate_date("yesterday", CUTOFF), Err(ValidationError::InvalidDateFormat));
    }

    #[test]
    fn test_valid_time_parsed() {
        let time = validate_time("14:30").unwrap();
        assert_eq!((time.hour(), time.minute()), (14, 30));
        let midnight = validate_time("00:00").unwrap();
        assert_eq!((midnight.hour(), midnight.minute()), (0, 0));
        let last = validate_time("23:59").unwrap();
        assert_eq!((last.hour(), last.minute()), (23, 59));
    }

    #[test]
    fn test_hour_out_of_range_rejected() {
        // 24–29 pass the prefix pattern but fail the numeric re-check
        assert_eq!(validate_time("24:00"), Err(ValidationError::InvalidTimeFormat));
        assert_eq!(validate_time("29:59"), Err(ValidationError::InvalidTimeFormat));
        assert_eq!(validate_time("30:00"), Err(ValidationError::InvalidTimeFormat));
    }

    #[test]
    fn test_time_format_requires_leading_zero() {
        assert_eq!(validate_time("9:30"), Err(ValidationError::InvalidTimeFormat));
        assert_eq!(validate_time("09:5"), Err(ValidationError::InvalidTimeFormat));
        assert_eq!(validate_time("0930"), Err(ValidationError::InvalidTimeFormat));
        assert_eq!(validate_time("12:60"), Err(ValidationError::InvalidTimeFormat));
    }
}
