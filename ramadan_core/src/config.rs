//! Schedule configuration file support.
//!
//! This module reads the location, calculation convention, calendar and
//! window settings from a TOML file and turns them into validated library
//! types.

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::calendar::{CalendarVariant, HijriMapper};
use crate::core::domain::GeoCoordinate;
use crate::core::error::{PrayerError, PrayerResult};
use crate::models::{
    find_location, AsrJuristic, CalculationConvention, ConventionPreset, HighLatitudeRule,
    IshaRule, MaghribRule, PrayerAdjustments,
};
use crate::services::{ScheduleBuilder, DEFAULT_SEHRI_OFFSET_MINUTES, DEFAULT_WINDOW_DAYS};
use crate::time::TimeRounding;

/// Schedule configuration from file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    pub location: LocationSettings,
    #[serde(default)]
    pub calculation: CalculationSettings,
    #[serde(default)]
    pub adjustments: PrayerAdjustments,
    #[serde(default)]
    pub calendar: CalendarSettings,
    #[serde(default)]
    pub schedule: WindowSettings,
}

/// Observer location: a known city or explicit coordinates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocationSettings {
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    /// Civil offset in minutes; derived from the longitude when absent.
    #[serde(default)]
    pub utc_offset_minutes: Option<i32>,
}

/// Calculation convention settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationSettings {
    #[serde(default = "default_method")]
    pub method: String,
    #[serde(default = "default_asr")]
    pub asr: String,
    #[serde(default = "default_high_latitude_rule")]
    pub high_latitude_rule: String,
    #[serde(default)]
    pub fajr_angle: Option<f64>,
    #[serde(default)]
    pub isha_angle: Option<f64>,
    #[serde(default)]
    pub isha_minutes: Option<f64>,
    #[serde(default)]
    pub maghrib_angle: Option<f64>,
    #[serde(default = "default_sehri_offset_minutes")]
    pub sehri_offset_minutes: i64,
    #[serde(default)]
    pub rounding: TimeRounding,
}

/// Hijri calendar settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarSettings {
    #[serde(default = "default_calendar_variant")]
    pub variant: String,
    #[serde(default)]
    pub day_offset: i64,
}

/// Schedule window settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowSettings {
    #[serde(default = "default_window_days")]
    pub window_days: u32,
    #[serde(default)]
    pub year: Option<i32>,
}

fn default_method() -> String {
    "mwl".to_string()
}

fn default_asr() -> String {
    "standard".to_string()
}

fn default_high_latitude_rule() -> String {
    "middle_of_night".to_string()
}

fn default_sehri_offset_minutes() -> i64 {
    DEFAULT_SEHRI_OFFSET_MINUTES
}

fn default_calendar_variant() -> String {
    "tabular_civil".to_string()
}

fn default_window_days() -> u32 {
    DEFAULT_WINDOW_DAYS
}

impl Default for CalculationSettings {
    fn default() -> Self {
        Self {
            method: default_method(),
            asr: default_asr(),
            high_latitude_rule: default_high_latitude_rule(),
            fajr_angle: None,
            isha_angle: None,
            isha_minutes: None,
            maghrib_angle: None,
            sehri_offset_minutes: default_sehri_offset_minutes(),
            rounding: TimeRounding::default(),
        }
    }
}

impl Default for CalendarSettings {
    fn default() -> Self {
        Self {
            variant: default_calendar_variant(),
            day_offset: 0,
        }
    }
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            window_days: default_window_days(),
            year: None,
        }
    }
}

impl ScheduleConfig {
    /// Load schedule configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(ScheduleConfig)` if successful
    /// * `Err(PrayerError::Configuration)` if the file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> PrayerResult<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            PrayerError::Configuration(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> PrayerResult<Self> {
        toml::from_str(content)
            .map_err(|e| PrayerError::Configuration(format!("Failed to parse config file: {}", e)))
    }

    /// Load schedule configuration from the default location.
    ///
    /// Searches for `ramadan.toml` in:
    /// 1. Current directory
    /// 2. `ramadan_core/` directory
    /// 3. Parent directory
    pub fn from_default_location() -> PrayerResult<Self> {
        let search_paths = [
            PathBuf::from("ramadan.toml"),
            PathBuf::from("ramadan_core/ramadan.toml"),
            PathBuf::from("../ramadan.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Err(PrayerError::Configuration(
            "No ramadan.toml found in standard locations".to_string(),
        ))
    }

    /// Resolves the observer coordinate.
    ///
    /// Explicit `latitude`/`longitude` win over `city`; a lone latitude or
    /// longitude is an error.
    pub fn coordinate(&self) -> PrayerResult<GeoCoordinate> {
        let location = &self.location;
        match (location.latitude, location.longitude) {
            (Some(lat), Some(lng)) => GeoCoordinate::new(lat, lng),
            (None, None) if !location.city.trim().is_empty() => {
                find_location(&location.city)?.coordinate()
            }
            (None, None) => Err(PrayerError::Configuration(
                "location requires 'city' or both 'latitude' and 'longitude'".to_string(),
            )),
            _ => Err(PrayerError::Configuration(
                "location requires both 'latitude' and 'longitude'".to_string(),
            )),
        }
    }

    /// Explicit civil offset, if one is configured.
    pub fn utc_offset(&self) -> PrayerResult<Option<FixedOffset>> {
        self.location
            .utc_offset_minutes
            .map(|minutes| {
                minutes
                    .checked_mul(60)
                    .and_then(FixedOffset::east_opt)
                    .ok_or_else(|| {
                        PrayerError::Configuration(format!(
                            "utc_offset_minutes {} is out of range",
                            minutes
                        ))
                    })
            })
            .transpose()
    }

    /// Builds and validates the calculation convention.
    pub fn convention(&self) -> PrayerResult<CalculationConvention> {
        let calc = &self.calculation;
        let preset: ConventionPreset = calc.method.parse()?;
        let asr: AsrJuristic = calc.asr.parse()?;
        let rule: HighLatitudeRule = calc.high_latitude_rule.parse()?;

        let mut convention = CalculationConvention::from_preset(preset)
            .with_asr(asr)
            .with_high_latitude_rule(rule)
            .with_adjustments(self.adjustments)
            .with_rounding(calc.rounding);

        if let Some(angle) = calc.fajr_angle {
            convention.fajr_angle = qtty::Degrees::new(angle);
        }
        match (calc.isha_angle, calc.isha_minutes) {
            (Some(_), Some(_)) => {
                return Err(PrayerError::Configuration(
                    "set at most one of 'isha_angle' and 'isha_minutes'".to_string(),
                ))
            }
            (Some(angle), None) => convention.isha = IshaRule::Angle(qtty::Degrees::new(angle)),
            (None, Some(minutes)) => convention.isha = IshaRule::MinutesAfterMaghrib(minutes),
            (None, None) => {}
        }
        if let Some(angle) = calc.maghrib_angle {
            convention.maghrib = MaghribRule::Angle(qtty::Degrees::new(angle));
        }
        if calc.fajr_angle.is_some() || calc.isha_angle.is_some() || calc.isha_minutes.is_some() {
            convention.name = format!("{} (custom)", convention.name);
        }

        convention.validate()?;
        Ok(convention)
    }

    pub fn mapper(&self) -> PrayerResult<HijriMapper> {
        let variant: CalendarVariant = self.calendar.variant.parse()?;
        Ok(HijriMapper::new(variant).with_day_offset(self.calendar.day_offset))
    }

    /// Builds a [`ScheduleBuilder`] from every section of the file.
    pub fn schedule_builder(&self) -> PrayerResult<ScheduleBuilder> {
        let mut builder = ScheduleBuilder::new(self.convention()?)?
            .with_mapper(self.mapper()?)
            .with_sehri_offset(self.calculation.sehri_offset_minutes)?;
        if let Some(offset) = self.utc_offset()? {
            builder = builder.with_utc_offset(offset);
        }
        Ok(builder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_city_config() {
        let toml = r#"
[location]
city = "Dubai, UAE"
"#;

        let config = ScheduleConfig::from_toml_str(toml).unwrap();
        let coord = config.coordinate().unwrap();
        assert_eq!(coord.latitude(), 25.2048);
        assert_eq!(config.schedule.window_days, 30);
        assert_eq!(config.calculation.sehri_offset_minutes, 10);
        assert!(config.utc_offset().unwrap().is_none());

        let convention = config.convention().unwrap();
        assert_eq!(convention.fajr_angle.value(), 18.0);
        assert_eq!(convention.asr, AsrJuristic::Standard);
        assert_eq!(config.mapper().unwrap().day_offset(), 0);
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[location]
latitude = 51.5074
longitude = -0.1278
utc_offset_minutes = 60

[calculation]
method = "isna"
asr = "hanafi"
high_latitude_rule = "seventh_of_night"
isha_minutes = 90.0
sehri_offset_minutes = 15
rounding = "up_minute"

[adjustments]
dhuhr = 2.0

[calendar]
variant = "umm_al_qura"
day_offset = -1

[schedule]
window_days = 10
year = 2026
"#;

        let config = ScheduleConfig::from_toml_str(toml).unwrap();
        assert_eq!(
            config.utc_offset().unwrap(),
            FixedOffset::east_opt(3600)
        );

        let convention = config.convention().unwrap();
        assert_eq!(convention.fajr_angle.value(), 15.0);
        assert_eq!(convention.isha, IshaRule::MinutesAfterMaghrib(90.0));
        assert_eq!(convention.asr, AsrJuristic::Hanafi);
        assert_eq!(convention.high_latitude_rule, HighLatitudeRule::SeventhOfNight);
        assert_eq!(convention.rounding, TimeRounding::UpMinute);
        assert_eq!(convention.adjustments.dhuhr, 2.0);
        assert!(convention.name.ends_with("(custom)"));

        assert_eq!(config.mapper().unwrap().day_offset(), -1);
        assert_eq!(config.mapper().unwrap().calendar().name(), "umm-al-qura");
        assert_eq!(config.schedule.year, Some(2026));
        assert!(config.schedule_builder().is_ok());
    }

    #[test]
    fn test_location_requires_both_coordinates() {
        let config = ScheduleConfig::from_toml_str("[location]\nlatitude = 10.0\n").unwrap();
        assert!(matches!(
            config.coordinate(),
            Err(PrayerError::Configuration(_))
        ));

        let empty = ScheduleConfig::from_toml_str("[location]\n").unwrap();
        assert!(empty.coordinate().is_err());
    }

    #[test]
    fn test_invalid_values_are_reported() {
        let bad_coord =
            ScheduleConfig::from_toml_str("[location]\nlatitude = 95.0\nlongitude = 0.0\n").unwrap();
        assert!(matches!(
            bad_coord.coordinate(),
            Err(PrayerError::InvalidCoordinate(_))
        ));

        let bad_method = ScheduleConfig::from_toml_str(
            "[location]\ncity = \"Cairo\"\n[calculation]\nmethod = \"unknown\"\n",
        )
        .unwrap();
        assert!(matches!(
            bad_method.convention(),
            Err(PrayerError::InvalidConvention(_))
        ));

        let both_isha = ScheduleConfig::from_toml_str(
            "[location]\ncity = \"Cairo\"\n[calculation]\nisha_angle = 17.0\nisha_minutes = 90.0\n",
        )
        .unwrap();
        assert!(both_isha.convention().is_err());

        let bad_sehri = ScheduleConfig::from_toml_str(
            "[location]\ncity = \"Cairo\"\n[calculation]\nsehri_offset_minutes = 0\n",
        )
        .unwrap();
        assert!(bad_sehri.schedule_builder().is_err());
    }

    #[test]
    fn test_missing_location_section_fails_to_parse() {
        assert!(matches!(
            ScheduleConfig::from_toml_str("[schedule]\nwindow_days = 5\n"),
            Err(PrayerError::Configuration(_))
        ));
    }
}
