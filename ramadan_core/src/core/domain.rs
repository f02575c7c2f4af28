//! Domain models for observer locations and daily prayer instants.
//!
//! This module provides the validated geographic input and the per-day set of
//! solar-based prayer times produced by the solar time engine.

use std::fmt;

use chrono::{DateTime, FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};

use super::error::{PrayerError, PrayerResult};

/// A validated geographic coordinate in decimal degrees.
///
/// Latitude must lie in `[-90, 90]` and longitude in `[-180, 180]`. Values
/// outside these ranges (or NaN) are rejected; nothing is clamped.
///
/// # Examples
///
/// ```
/// use ramadan_core::core::domain::GeoCoordinate;
///
/// let dubai = GeoCoordinate::new(25.2048, 55.2708).unwrap();
/// assert_eq!(dubai.utc_offset().local_minus_utc(), 4 * 3600);
///
/// assert!(GeoCoordinate::new(91.0, 0.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoCoordinate {
    latitude: f64,
    longitude: f64,
}

impl GeoCoordinate {
    /// Creates a coordinate, validating both components.
    pub fn new(latitude: f64, longitude: f64) -> PrayerResult<Self> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(PrayerError::InvalidCoordinate(format!(
                "latitude {} is outside [-90, 90]",
                latitude
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(PrayerError::InvalidCoordinate(format!(
                "longitude {} is outside [-180, 180]",
                longitude
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Civil UTC offset derived from the longitude: one hour per 15°,
    /// rounded to the nearest whole hour.
    ///
    /// This never consults the host time zone.
    pub fn utc_offset(&self) -> FixedOffset {
        let hours = (self.longitude / 15.0).round() as i32;
        // |hours| <= 12, always inside FixedOffset's range
        FixedOffset::east_opt(hours * 3600).unwrap_or_else(|| Utc.fix())
    }
}

impl<'de> Deserialize<'de> for GeoCoordinate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            latitude: f64,
            longitude: f64,
        }

        let raw = Raw::deserialize(deserializer)?;
        GeoCoordinate::new(raw.latitude, raw.longitude).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for GeoCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.4}, {:.4})", self.latitude, self.longitude)
    }
}

/// The six solar-based daily events, in their natural order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Prayer {
    Fajr,
    Sunrise,
    Dhuhr,
    Asr,
    Maghrib,
    Isha,
}

impl Prayer {
    pub const ALL: [Prayer; 6] = [
        Prayer::Fajr,
        Prayer::Sunrise,
        Prayer::Dhuhr,
        Prayer::Asr,
        Prayer::Maghrib,
        Prayer::Isha,
    ];

    /// The five obligatory prayers (sunrise excluded).
    pub const OBLIGATORY: [Prayer; 5] = [
        Prayer::Fajr,
        Prayer::Dhuhr,
        Prayer::Asr,
        Prayer::Maghrib,
        Prayer::Isha,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Prayer::Fajr => "Fajr",
            Prayer::Sunrise => "Sunrise",
            Prayer::Dhuhr => "Dhuhr",
            Prayer::Asr => "Asr",
            Prayer::Maghrib => "Maghrib",
            Prayer::Isha => "Isha",
        }
    }
}

impl fmt::Display for Prayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Prayer instants for one calendar date at one location.
///
/// All instants carry the civil offset they were computed for. Within a
/// single value `fajr < sunrise < dhuhr < asr < maghrib < isha` holds for
/// non-polar inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolarDayTimes {
    pub fajr: DateTime<FixedOffset>,
    pub sunrise: DateTime<FixedOffset>,
    pub dhuhr: DateTime<FixedOffset>,
    pub asr: DateTime<FixedOffset>,
    pub maghrib: DateTime<FixedOffset>,
    pub isha: DateTime<FixedOffset>,
    /// Latitude the times were computed at. Differs from the input latitude
    /// only when the nearest-latitude fallback was applied.
    pub effective_latitude: f64,
}

impl SolarDayTimes {
    pub fn get(&self, prayer: Prayer) -> DateTime<FixedOffset> {
        match prayer {
            Prayer::Fajr => self.fajr,
            Prayer::Sunrise => self.sunrise,
            Prayer::Dhuhr => self.dhuhr,
            Prayer::Asr => self.asr,
            Prayer::Maghrib => self.maghrib,
            Prayer::Isha => self.isha,
        }
    }

    /// Iterates the six events in order.
    pub fn iter(&self) -> impl Iterator<Item = (Prayer, DateTime<FixedOffset>)> + '_ {
        Prayer::ALL.iter().map(move |p| (*p, self.get(*p)))
    }

    /// Whether the nearest-latitude fallback replaced the input latitude.
    pub fn used_latitude_fallback(&self, coord: &GeoCoordinate) -> bool {
        (self.effective_latitude - coord.latitude()).abs() > f64::EPSILON
    }

    /// Checks the strict ordering invariant.
    pub fn is_strictly_ordered(&self) -> bool {
        let times: Vec<_> = self.iter().map(|(_, t)| t).collect();
        times.windows(2).all(|w| w[0] < w[1])
    }
}
