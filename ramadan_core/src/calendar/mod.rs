//! Gregorian to Hijri date mapping.
//!
//! Two families of calendars are available: the arithmetic (tabular)
//! calendar, which is exact within its own rules for any date, and the
//! Umm al-Qura table published for Saudi Arabia. Neither predicts the local
//! sighting of the crescent; results can differ from an observed calendar
//! by a day, which [`HijriMapper::with_day_offset`] can compensate for.

pub mod tabular;
pub mod umm_al_qura;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::core::error::{PrayerError, PrayerResult};

pub use tabular::TabularCalendar;
pub use umm_al_qura::UmmAlQuraCalendar;

/// Month number of Ramadan.
pub const RAMADAN: u32 = 9;

const MONTH_NAMES: [&str; 12] = [
    "Muharram",
    "Safar",
    "Rabi' al-Awwal",
    "Rabi' al-Thani",
    "Jumada al-Awwal",
    "Jumada al-Thani",
    "Rajab",
    "Sha'ban",
    "Ramadan",
    "Shawwal",
    "Dhu al-Qi'dah",
    "Dhu al-Hijjah",
];

/// A date in the Hijri calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct HijriDate {
    pub year: i32,
    /// 1 (Muharram) to 12 (Dhu al-Hijjah).
    pub month: u32,
    /// 1 to 30.
    pub day: u32,
}

impl HijriDate {
    pub fn new(year: i32, month: u32, day: u32) -> Self {
        Self { year, month, day }
    }

    /// English transliteration of the month, for display only.
    pub fn month_name(&self) -> &'static str {
        self.month
            .checked_sub(1)
            .and_then(|index| MONTH_NAMES.get(index as usize))
            .copied()
            .unwrap_or("Unknown")
    }

    pub fn is_ramadan(&self) -> bool {
        self.month == RAMADAN
    }
}

impl fmt::Display for HijriDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.day, self.month_name(), self.year)
    }
}

/// A Gregorian to Hijri conversion.
///
/// Implementations are pure: the same date always maps to the same Hijri
/// date.
pub trait HijriCalendar: fmt::Debug + Send + Sync {
    fn name(&self) -> &'static str;

    /// First and last Gregorian dates the calendar accepts, inclusive.
    fn supported_range(&self) -> (NaiveDate, NaiveDate);

    /// Converts a Gregorian date.
    ///
    /// # Errors
    /// `DateOutOfSupportedRange` outside [`HijriCalendar::supported_range`].
    fn to_hijri(&self, date: NaiveDate) -> PrayerResult<HijriDate>;

    fn is_ramadan(&self, hijri: &HijriDate) -> bool {
        hijri.is_ramadan()
    }

    fn check_range(&self, date: NaiveDate) -> PrayerResult<()> {
        let (first, last) = self.supported_range();
        if date < first || date > last {
            return Err(PrayerError::DateOutOfSupportedRange {
                date: date.to_string(),
                calendar: self.name().to_string(),
            });
        }
        Ok(())
    }
}

/// Calendar selection for configuration.
///
/// The default is the civil tabular calendar because it covers every date
/// from 1900 to 2200 without tables. Observance in Saudi Arabia and the Gulf
/// follows [`CalendarVariant::UmmAlQura`], which can start or end Ramadan a
/// day apart from the tabular calendar; select it (or a mapper day offset)
/// when the flags must match that observance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalendarVariant {
    /// Arithmetic calendar, civil epoch (Friday 16 July 622 Julian).
    #[default]
    TabularCivil,
    /// Arithmetic calendar, astronomical epoch (one day earlier).
    TabularAstronomical,
    /// Umm al-Qura table.
    UmmAlQura,
}

impl CalendarVariant {
    pub fn calendar(&self) -> Arc<dyn HijriCalendar> {
        match self {
            CalendarVariant::TabularCivil => Arc::new(TabularCalendar::civil()),
            CalendarVariant::TabularAstronomical => Arc::new(TabularCalendar::astronomical()),
            CalendarVariant::UmmAlQura => Arc::new(UmmAlQuraCalendar),
        }
    }
}

impl FromStr for CalendarVariant {
    type Err = PrayerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match key.as_str() {
            "tabular" | "tabularcivil" | "civil" => Ok(CalendarVariant::TabularCivil),
            "tabularastronomical" | "astronomical" => Ok(CalendarVariant::TabularAstronomical),
            "ummalqura" | "umalqura" => Ok(CalendarVariant::UmmAlQura),
            _ => Err(PrayerError::Configuration(format!(
                "unknown calendar variant '{}'",
                s
            ))),
        }
    }
}

/// Maps Gregorian dates to Hijri dates and flags Ramadan.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use ramadan_core::calendar::HijriMapper;
///
/// let mapper = HijriMapper::default();
/// let hijri = mapper.to_hijri(NaiveDate::from_ymd_opt(2025, 3, 5).unwrap()).unwrap();
/// assert_eq!(hijri.to_string(), "5 Ramadan 1446");
/// assert!(mapper.is_ramadan(&hijri));
/// ```
#[derive(Debug, Clone)]
pub struct HijriMapper {
    calendar: Arc<dyn HijriCalendar>,
    day_offset: i64,
}

impl HijriMapper {
    pub fn new(variant: CalendarVariant) -> Self {
        Self::from_calendar(variant.calendar())
    }

    /// Wraps a custom calendar implementation.
    pub fn from_calendar(calendar: Arc<dyn HijriCalendar>) -> Self {
        Self {
            calendar,
            day_offset: 0,
        }
    }

    /// Shifts every lookup by `days` (e.g. `-1` where the month starts a
    /// day later than the calendar predicts).
    pub fn with_day_offset(mut self, days: i64) -> Self {
        self.day_offset = days;
        self
    }

    pub fn day_offset(&self) -> i64 {
        self.day_offset
    }

    pub fn calendar(&self) -> &dyn HijriCalendar {
        self.calendar.as_ref()
    }

    /// Converts a Gregorian date, after applying the day offset.
    pub fn to_hijri(&self, date: NaiveDate) -> PrayerResult<HijriDate> {
        let shifted = date
            .checked_add_signed(Duration::days(self.day_offset))
            .ok_or_else(|| PrayerError::DateOutOfSupportedRange {
                date: date.to_string(),
                calendar: self.calendar.name().to_string(),
            })?;
        self.calendar.to_hijri(shifted)
    }

    pub fn is_ramadan(&self, hijri: &HijriDate) -> bool {
        self.calendar.is_ramadan(hijri)
    }

    /// Convenience for `is_ramadan(&to_hijri(date)?)`.
    pub fn is_ramadan_date(&self, date: NaiveDate) -> PrayerResult<bool> {
        Ok(self.is_ramadan(&self.to_hijri(date)?))
    }
}

impl Default for HijriMapper {
    fn default() -> Self {
        Self::new(CalendarVariant::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_month_names() {
        assert_eq!(HijriDate::new(1446, 1, 1).month_name(), "Muharram");
        assert_eq!(HijriDate::new(1446, 9, 1).month_name(), "Ramadan");
        assert_eq!(HijriDate::new(1446, 12, 1).month_name(), "Dhu al-Hijjah");
        assert_eq!(HijriDate::new(1446, 0, 1).month_name(), "Unknown");
        assert_eq!(HijriDate::new(1446, 13, 1).month_name(), "Unknown");
    }

    #[test]
    fn test_display() {
        assert_eq!(HijriDate::new(1446, 9, 5).to_string(), "5 Ramadan 1446");
    }

    #[test]
    fn test_variant_from_str() {
        assert_eq!("umm-al-qura".parse::<CalendarVariant>().unwrap(), CalendarVariant::UmmAlQura);
        assert_eq!("Tabular".parse::<CalendarVariant>().unwrap(), CalendarVariant::TabularCivil);
        assert_eq!(
            "tabular_astronomical".parse::<CalendarVariant>().unwrap(),
            CalendarVariant::TabularAstronomical
        );
        assert!("lunar".parse::<CalendarVariant>().is_err());
    }

    #[test]
    fn test_default_variant_and_umm_al_qura_divergence() {
        assert_eq!(CalendarVariant::default(), CalendarVariant::TabularCivil);
        assert_eq!(HijriMapper::default().calendar().name(), "tabular-civil");

        // 30 March 2025 is 30 Ramadan in the tabular calendar but 1 Shawwal
        // in Umm al-Qura
        let day = date(2025, 3, 30);
        let tabular = HijriMapper::default().to_hijri(day).unwrap();
        let uaq = HijriMapper::new(CalendarVariant::UmmAlQura).to_hijri(day).unwrap();
        assert_eq!((tabular.month, tabular.day), (9, 30));
        assert_eq!((uaq.month, uaq.day), (10, 1));
    }

    #[test]
    fn test_day_offset_shifts_lookup() {
        let plain = HijriMapper::default();
        let behind = HijriMapper::default().with_day_offset(-1);
        // 1 Ramadan 1446 under the civil epoch
        let start = date(2025, 3, 1);
        assert_eq!(plain.to_hijri(start).unwrap(), HijriDate::new(1446, 9, 1));
        assert_eq!(behind.to_hijri(start).unwrap(), HijriDate::new(1446, 8, 29));
        assert_eq!(behind.to_hijri(date(2025, 3, 2)).unwrap(), HijriDate::new(1446, 9, 1));
    }

    #[test]
    fn test_astronomical_epoch_is_one_day_ahead() {
        let civil = HijriMapper::new(CalendarVariant::TabularCivil);
        let astronomical = HijriMapper::new(CalendarVariant::TabularAstronomical);
        let d = date(2025, 2, 28);
        assert_eq!(civil.to_hijri(d).unwrap(), HijriDate::new(1446, 8, 29));
        assert_eq!(astronomical.to_hijri(d).unwrap(), HijriDate::new(1446, 9, 1));
    }

    #[test]
    fn test_out_of_range_names_calendar() {
        let err = HijriMapper::default().to_hijri(date(1899, 12, 31)).unwrap_err();
        match err {
            PrayerError::DateOutOfSupportedRange { date, calendar } => {
                assert_eq!(date, "1899-12-31");
                assert_eq!(calendar, "tabular-civil");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }
}
