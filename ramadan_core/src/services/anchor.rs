//! Choice of the first day of a schedule window.

use chrono::{Datelike, Duration, NaiveDate};
use log::debug;
use serde::Serialize;

use crate::calendar::HijriMapper;
use crate::core::error::{PrayerError, PrayerResult};

/// Days after the start of Ramadan beyond which the current year switches to
/// a rolling schedule starting today.
const RAMADAN_GRACE_DAYS: i64 = 30;

/// How the anchor was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorMode {
    /// The window starts on 1 Ramadan.
    Ramadan,
    /// The window starts on the reference date.
    Rolling,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScheduleAnchor {
    pub date: NaiveDate,
    pub mode: AnchorMode,
    /// 1 Ramadan in the requested year, if the calendar has one.
    pub ramadan_start: Option<NaiveDate>,
}

/// Finds the first Gregorian date in `year` that maps to 1 Ramadan.
///
/// Returns `Ok(None)` when no day of the year maps to 1 Ramadan, and an
/// error if the calendar cannot convert some day of the year.
pub fn find_ramadan_start(year: i32, mapper: &HijriMapper) -> PrayerResult<Option<NaiveDate>> {
    let first = NaiveDate::from_ymd_opt(year, 1, 1).ok_or_else(|| {
        PrayerError::DateOutOfSupportedRange {
            date: format!("{}-01-01", year),
            calendar: "gregorian".to_string(),
        }
    })?;

    for date in first.iter_days().take_while(|d| d.year() == year) {
        let hijri = mapper.to_hijri(date)?;
        if mapper.is_ramadan(&hijri) && hijri.day == 1 {
            return Ok(Some(date));
        }
    }
    Ok(None)
}

/// Picks the first day of the schedule for `year`.
///
/// In the current year (`year == today.year()`), once `today` is more than
/// thirty days past 1 Ramadan the schedule rolls forward from `today`;
/// otherwise it starts on 1 Ramadan. When the year has no 1 Ramadan or the
/// calendar cannot cover it, the schedule starts on `today`.
pub fn select_anchor(year: i32, today: NaiveDate, mapper: &HijriMapper) -> ScheduleAnchor {
    let ramadan_start = match find_ramadan_start(year, mapper) {
        Ok(start) => start,
        Err(e) => {
            debug!("No Ramadan start for {}: {}", year, e);
            None
        }
    };

    let rolling = ScheduleAnchor {
        date: today,
        mode: AnchorMode::Rolling,
        ramadan_start,
    };

    match ramadan_start {
        Some(start) if year == today.year() && today > start + Duration::days(RAMADAN_GRACE_DAYS) => {
            rolling
        }
        Some(start) => ScheduleAnchor {
            date: start,
            mode: AnchorMode::Ramadan,
            ramadan_start,
        },
        None => rolling,
    }
}
