//! Arithmetic Hijri calendar.
//!
//! Years follow a 30-year cycle of 354- and 355-day years, with the leap
//! years being those where `(14 + 11 * year) mod 30 < 11`. Odd months have
//! 30 days, even months 29, and Dhu al-Hijjah gains a day in leap years.
//! Dates are converted through Rata Die day numbers (1 = 0001-01-01
//! proleptic Gregorian), which `chrono` exposes as `num_days_from_ce`.

use chrono::{Datelike, NaiveDate};

use super::{HijriCalendar, HijriDate};
use crate::core::error::{PrayerError, PrayerResult};

/// Rata Die of 1 Muharram 1 AH, civil reckoning (Friday 16 July 622 Julian).
pub const CIVIL_EPOCH: i64 = 227_015;

/// Rata Die of 1 Muharram 1 AH, astronomical reckoning.
pub const ASTRONOMICAL_EPOCH: i64 = 227_014;

/// Gregorian year span accepted by the tabular calendars.
const FIRST_YEAR: i32 = 1900;
const LAST_YEAR: i32 = 2200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabularCalendar {
    epoch: i64,
    name: &'static str,
}

impl TabularCalendar {
    pub const fn civil() -> Self {
        Self {
            epoch: CIVIL_EPOCH,
            name: "tabular-civil",
        }
    }

    pub const fn astronomical() -> Self {
        Self {
            epoch: ASTRONOMICAL_EPOCH,
            name: "tabular-astronomical",
        }
    }

    pub fn is_leap_year(year: i64) -> bool {
        (14 + 11 * year).rem_euclid(30) < 11
    }

    /// Number of days in a Hijri month.
    pub fn days_in_month(year: i64, month: u32) -> u32 {
        if month % 2 == 1 || (month == 12 && Self::is_leap_year(year)) {
            30
        } else {
            29
        }
    }

    fn fixed_from_hijri(&self, year: i64, month: i64, day: i64) -> i64 {
        self.epoch - 1
            + (year - 1) * 354
            + (3 + 11 * year).div_euclid(30)
            + 29 * (month - 1)
            + month.div_euclid(2)
            + day
    }

    fn hijri_from_fixed(&self, fixed: i64) -> (i64, i64, i64) {
        let year = (30 * (fixed - self.epoch) + 10_646).div_euclid(10_631);
        let prior_days = fixed - self.fixed_from_hijri(year, 1, 1);
        let month = (11 * prior_days + 330).div_euclid(325);
        let day = fixed - self.fixed_from_hijri(year, month, 1) + 1;
        (year, month, day)
    }

    /// Gregorian date of a Hijri date.
    ///
    /// # Errors
    /// `DateOutOfSupportedRange` when the month or day is out of bounds, or
    /// when the result falls outside the supported Gregorian range.
    pub fn to_gregorian(&self, hijri: &HijriDate) -> PrayerResult<NaiveDate> {
        let year = hijri.year as i64;
        let out_of_range = || PrayerError::DateOutOfSupportedRange {
            date: hijri.to_string(),
            calendar: self.name.to_string(),
        };
        if !(1..=12).contains(&hijri.month)
            || hijri.day < 1
            || hijri.day > Self::days_in_month(year, hijri.month)
        {
            return Err(out_of_range());
        }
        let fixed = self.fixed_from_hijri(year, hijri.month as i64, hijri.day as i64);
        let date = i32::try_from(fixed)
            .ok()
            .and_then(NaiveDate::from_num_days_from_ce_opt)
            .ok_or_else(out_of_range)?;
        self.check_range(date).map_err(|_| out_of_range())?;
        Ok(date)
    }
}

impl Default for TabularCalendar {
    fn default() -> Self {
        Self::civil()
    }
}

impl HijriCalendar for TabularCalendar {
    fn name(&self) -> &'static str {
        self.name
    }

    fn supported_range(&self) -> (NaiveDate, NaiveDate) {
        (
            NaiveDate::from_ymd_opt(FIRST_YEAR, 1, 1).unwrap_or(NaiveDate::MIN),
            NaiveDate::from_ymd_opt(LAST_YEAR, 12, 31).unwrap_or(NaiveDate::MAX),
        )
    }

    fn to_hijri(&self, date: NaiveDate) -> PrayerResult<HijriDate> {
        self.check_range(date)?;
        let (year, month, day) = self.hijri_from_fixed(date.num_days_from_ce() as i64);
        Ok(HijriDate::new(year as i32, month as u32, day as u32))
    }
}
