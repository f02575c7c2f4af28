//! Umm al-Qura calendar, backed by the `hijri_date` tables.

use chrono::{Datelike, NaiveDate};

use super::{HijriCalendar, HijriDate};
use crate::core::error::{PrayerError, PrayerResult};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UmmAlQuraCalendar;

impl HijriCalendar for UmmAlQuraCalendar {
    fn name(&self) -> &'static str {
        "umm-al-qura"
    }

    fn supported_range(&self) -> (NaiveDate, NaiveDate) {
        (
            NaiveDate::from_ymd_opt(1940, 1, 1).unwrap_or(NaiveDate::MIN),
            NaiveDate::from_ymd_opt(2075, 12, 31).unwrap_or(NaiveDate::MAX),
        )
    }

    fn to_hijri(&self, date: NaiveDate) -> PrayerResult<HijriDate> {
        self.check_range(date)?;
        let converted = hijri_date::HijriDate::from_gr(
            date.year() as usize,
            date.month() as usize,
            date.day() as usize,
        )
        .map_err(|e| {
            log::warn!("Umm al-Qura conversion failed for {}: {}", date, e);
            PrayerError::DateOutOfSupportedRange {
                date: date.to_string(),
                calendar: self.name().to_string(),
            }
        })?;

        Ok(HijriDate::new(
            converted.year() as i32,
            converted.month() as u32,
            converted.day() as u32,
        ))
    }
}
