//! Multi-day schedules combining solar times with the Hijri calendar.

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, Weekday};
use log::info;
use serde::{Serialize, Serializer};

use super::solar_times::SolarTimeEngine;
use crate::calendar::{HijriDate, HijriMapper};
use crate::core::domain::{GeoCoordinate, SolarDayTimes};
use crate::core::error::{PrayerError, PrayerResult};
use crate::models::CalculationConvention;

/// Days in a schedule when the caller does not choose.
pub const DEFAULT_WINDOW_DAYS: u32 = 30;

/// Minutes between Sehri cutoff and Fajr when the caller does not choose.
pub const DEFAULT_SEHRI_OFFSET_MINUTES: i64 = 10;

/// Position of a schedule day relative to the reference date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DayStatus {
    Past,
    Today,
    Future,
}

impl DayStatus {
    fn relative_to(date: NaiveDate, today: NaiveDate) -> Self {
        match date.cmp(&today) {
            std::cmp::Ordering::Less => DayStatus::Past,
            std::cmp::Ordering::Equal => DayStatus::Today,
            std::cmp::Ordering::Greater => DayStatus::Future,
        }
    }
}

fn serialize_weekday<S: Serializer>(weekday: &Weekday, serializer: S) -> Result<S::Ok, S::Error> {
    let name = match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    };
    serializer.serialize_str(name)
}

/// One day of a schedule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleEntry {
    /// 1-based position in the window.
    pub day_index: u32,
    pub gregorian_date: NaiveDate,
    #[serde(serialize_with = "serialize_weekday")]
    pub weekday: Weekday,
    pub hijri_date: HijriDate,
    pub is_ramadan: bool,
    pub solar_times: SolarDayTimes,
    /// End of the pre-dawn meal: Fajr minus the Sehri offset.
    pub sehri: DateTime<FixedOffset>,
    pub is_today: bool,
    pub status: DayStatus,
}

impl ScheduleEntry {
    /// Iftar coincides with Maghrib.
    pub fn iftar(&self) -> DateTime<FixedOffset> {
        self.solar_times.maghrib
    }

    /// Duration of the fast, from Sehri cutoff to Iftar.
    pub fn fasting_duration(&self) -> Duration {
        self.iftar() - self.sehri
    }
}

/// Builds day-by-day schedules for one convention and calendar.
///
/// The builder never reads the system clock: the reference date used for
/// `is_today` and `status` is always passed in.
#[derive(Debug, Clone)]
pub struct ScheduleBuilder {
    engine: SolarTimeEngine,
    mapper: HijriMapper,
    sehri_offset: Duration,
    utc_offset: Option<FixedOffset>,
}

impl ScheduleBuilder {
    /// Builder with the default calendar and Sehri offset.
    pub fn new(convention: CalculationConvention) -> PrayerResult<Self> {
        Ok(Self {
            engine: SolarTimeEngine::new(convention)?,
            mapper: HijriMapper::default(),
            sehri_offset: Duration::minutes(DEFAULT_SEHRI_OFFSET_MINUTES),
            utc_offset: None,
        })
    }

    pub fn with_mapper(mut self, mapper: HijriMapper) -> Self {
        self.mapper = mapper;
        self
    }

    /// Sets the gap between Sehri and Fajr.
    ///
    /// # Errors
    /// `InvalidConvention` unless `minutes` is positive.
    pub fn with_sehri_offset(mut self, minutes: i64) -> PrayerResult<Self> {
        if minutes <= 0 {
            return Err(PrayerError::InvalidConvention(format!(
                "sehri offset must be a positive number of minutes, got {}",
                minutes
            )));
        }
        self.sehri_offset = Duration::minutes(minutes);
        Ok(self)
    }

    /// Uses a fixed civil offset instead of the longitude-derived one.
    pub fn with_utc_offset(mut self, offset: FixedOffset) -> Self {
        self.utc_offset = Some(offset);
        self
    }

    pub fn engine(&self) -> &SolarTimeEngine {
        &self.engine
    }

    pub fn mapper(&self) -> &HijriMapper {
        &self.mapper
    }

    /// Builds one entry.
    pub fn entry(
        &self,
        coord: &GeoCoordinate,
        date: NaiveDate,
        day_index: u32,
        today: NaiveDate,
    ) -> PrayerResult<ScheduleEntry> {
        let offset = self.utc_offset.unwrap_or_else(|| coord.utc_offset());
        let solar_times = self.engine.compute_with_offset(coord, date, offset)?;
        let hijri_date = self.mapper.to_hijri(date)?;
        let status = DayStatus::relative_to(date, today);

        Ok(ScheduleEntry {
            day_index,
            gregorian_date: date,
            weekday: date.weekday(),
            is_ramadan: self.mapper.is_ramadan(&hijri_date),
            hijri_date,
            sehri: solar_times.fajr - self.sehri_offset,
            solar_times,
            is_today: status == DayStatus::Today,
            status,
        })
    }

    /// Builds `window` consecutive days starting at `anchor`.
    ///
    /// # Arguments
    /// * `coord` - Observer location
    /// * `anchor` - First civil date of the window
    /// * `window` - Number of days, at least one
    /// * `today` - Reference date for `is_today` and `status`
    ///
    /// # Errors
    /// * `InvalidWindow` when `window` is zero
    /// * any error from the solar engine or the Hijri mapper, for the first
    ///   failing day; no partial schedule is returned
    pub fn build(
        &self,
        coord: &GeoCoordinate,
        anchor: NaiveDate,
        window: u32,
        today: NaiveDate,
    ) -> PrayerResult<Vec<ScheduleEntry>> {
        if window == 0 {
            return Err(PrayerError::InvalidWindow(
                "schedule window must contain at least one day".to_string(),
            ));
        }

        let entries = (0..window)
            .map(|i| {
                let date = anchor
                    .checked_add_signed(Duration::days(i as i64))
                    .ok_or_else(|| PrayerError::DateOutOfSupportedRange {
                        date: format!("{} + {} days", anchor, i),
                        calendar: "gregorian".to_string(),
                    })?;
                self.entry(coord, date, i + 1, today)
            })
            .collect::<PrayerResult<Vec<_>>>()?;

        info!(
            "Built {}-day schedule for {} from {} ({} days in Ramadan)",
            entries.len(),
            coord,
            anchor,
            entries.iter().filter(|e| e.is_ramadan).count()
        );

        Ok(entries)
    }
}

/// Builds a schedule with the default calendar and a 10 minute Sehri offset.
pub fn build_schedule(
    coord: &GeoCoordinate,
    convention: &CalculationConvention,
    anchor: NaiveDate,
    window: u32,
    today: NaiveDate,
) -> PrayerResult<Vec<ScheduleEntry>> {
    ScheduleBuilder::new(convention.clone())?.build(coord, anchor, window, today)
}
