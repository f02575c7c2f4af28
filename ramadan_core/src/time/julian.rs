//! Julian Day arithmetic, time rounding and conversion of fractional hours
//! into civil instants.

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

use crate::core::error::{PrayerError, PrayerResult};

/// Julian Day of the J2000.0 epoch (2000-01-01 12:00 TT).
pub const J2000: f64 = 2_451_545.0;

/// Offset between Julian Day and Modified Julian Date.
pub const MJD_OFFSET: f64 = 2_400_000.5;

/// Julian Day at 00:00 UT of a Gregorian calendar date.
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use ramadan_core::time::julian_day;
///
/// let jd = julian_day(NaiveDate::from_ymd_opt(2000, 1, 1).unwrap());
/// assert_eq!(jd, 2_451_544.5);
/// ```
pub fn julian_day(date: NaiveDate) -> f64 {
    let (mut year, mut month) = (date.year() as f64, date.month() as f64);
    let day = date.day() as f64;
    if month <= 2.0 {
        year -= 1.0;
        month += 12.0;
    }
    let a = (year / 100.0).floor();
    let b = 2.0 - a + (a / 4.0).floor();

    (365.25 * (year + 4716.0)).floor() + (30.6001 * (month + 1.0)).floor() + day + b - 1524.5
}

/// Modified Julian Date at 00:00 UT of a Gregorian calendar date.
pub fn modified_julian_day(date: NaiveDate) -> f64 {
    julian_day(date) - MJD_OFFSET
}

/// Days elapsed since J2000.0 for a Julian Day value.
pub fn days_since_j2000(jd: f64) -> f64 {
    jd - J2000
}

/// Rounding applied to computed instants before they are returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeRounding {
    /// Round to the nearest minute (30 s rounds up).
    #[default]
    NearestMinute,
    /// Round up to the next whole minute.
    UpMinute,
    /// Keep whole seconds.
    None,
}

impl TimeRounding {
    fn apply(self, seconds: f64) -> i64 {
        match self {
            TimeRounding::NearestMinute => ((seconds / 60.0).round() * 60.0) as i64,
            TimeRounding::UpMinute => ((seconds / 60.0).ceil() * 60.0) as i64,
            TimeRounding::None => seconds.round() as i64,
        }
    }
}

/// Converts fractional hours after local midnight of `date` into an instant.
///
/// Hours may be negative or exceed 24 (events spilling into the previous or
/// next civil day at high latitudes).
pub fn local_instant(
    date: NaiveDate,
    hours: f64,
    offset: FixedOffset,
    rounding: TimeRounding,
) -> PrayerResult<DateTime<FixedOffset>> {
    if !hours.is_finite() {
        return Err(PrayerError::UnresolvableSolarAngle(format!(
            "non-finite time of day on {}",
            date
        )));
    }
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .and_then(|naive| offset.from_local_datetime(&naive).single())
        .ok_or_else(|| PrayerError::DateOutOfSupportedRange {
            date: date.to_string(),
            calendar: "gregorian".to_string(),
        })?;

    Ok(midnight + Duration::seconds(rounding.apply(hours * 3600.0)))
}

/// Normalizes an hour value into `[0, 24)`.
pub fn fix_hour(hours: f64) -> f64 {
    hours.rem_euclid(24.0)
}
