//! Civil date/time to julian day conversion

use chrono::{DateTime, Datelike, Timelike, Utc};

/// Julian day for a Gregorian calendar date and decimal hour (UT)
///
/// Standard Fliegel/Meeus arithmetic; valid for all dates after the Gregorian
/// reform, which covers every birth date the validators accept.
pub fn julian_day(year: i32, month: u32, day: u32, decimal_hour: f64) -> f64 {
    let (y, m) = if month <= 2 {
        (year - 1, month + 12)
    } else {
        (year, month)
    };

    let a = (y as f64 / 100.0).floor();
    let b = 2.0 - a + (a / 4.0).floor();

    (365.25 * (y as f64 + 4716.0)).floor() + (30.6001 * (m as f64 + 1.0)).floor() + day as f64 + b - 1524.5
        + decimal_hour / 24.0
}

/// Julian day for a UTC instant
pub fn julian_day_utc(instant: DateTime<Utc>) -> f64 {
    let decimal_hour =
        instant.hour() as f64 + instant.minute() as f64 / 60.0 + instant.second() as f64 / 3600.0;
    julian_day(instant.year(), instant.month(), instant.day(), decimal_hour)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_j2000_epoch() {
        // 2000-01-01 12:00 UT is the J2000.0 epoch by definition
        assert!((julian_day(2000, 1, 1, 12.0) - 2_451_545.0).abs() < 1e-9);
    }

    #[test]
    fn test_known_dates() {
        // Sputnik launch, Meeus example 7.a
        assert!((julian_day(1957, 10, 4, 19.44) - 2_436_116.31).abs() < 0.01);
        // Unix epoch midnight
        assert!((julian_day(1970, 1, 1, 0.0) - 2_440_587.5).abs() < 1e-9);
    }

    #[test]
    fn test_fractional_hours_advance_the_day() {
        let midnight = julian_day(1990, 6, 15, 0.0);
        let morning = julian_day(1990, 6, 15, 8.75);
        assert!((morning - midnight - 8.75 / 24.0).abs() < 1e-9);
    }

    #[test]
    fn test_utc_wrapper_matches_components() {
        let instant = Utc.with_ymd_and_hms(1990, 6, 15, 8, 45, 0).unwrap();
        let expected = julian_day(1990, 6, 15, 8.75);
        assert!((julian_day_utc(instant) - expected).abs() < 1e-9);
    }
}
