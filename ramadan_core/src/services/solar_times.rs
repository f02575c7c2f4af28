//! Daily prayer instants from the Sun's position.
//!
//! Times are first computed in local mean solar hours at the observer's
//! meridian, then shifted into the requested civil offset, adjusted and
//! rounded.

use chrono::{DateTime, FixedOffset, NaiveDate};
use log::debug;
use qtty::Degrees;

use crate::algorithms::{asr_altitude, hour_angle, solar_position, SUNRISE_ALTITUDE};
use crate::core::domain::{GeoCoordinate, SolarDayTimes};
use crate::core::error::{PrayerError, PrayerResult};
use crate::models::{CalculationConvention, HighLatitudeRule, IshaRule, MaghribRule};
use crate::time::{fix_hour, julian_day, local_instant};

/// Latitude step, in degrees, of the nearest-latitude search.
const LATITUDE_STEP: f64 = 0.5;

/// Minimum spacing between consecutive horizon events, in hours.
const MIN_EVENT_GAP: f64 = 1.0 / 60.0;

/// Minimum night length, in hours, for a latitude to be usable.
const MIN_NIGHT: f64 = 1.0;

// First-guess times of day at which each event's solar position is evaluated
const FAJR_GUESS: f64 = 5.0;
const SUNRISE_GUESS: f64 = 6.0;
const DHUHR_GUESS: f64 = 12.0;
const ASR_GUESS: f64 = 13.0;
const SUNSET_GUESS: f64 = 18.0;

/// Which side of solar noon an event falls on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Morning,
    Evening,
}

/// Sunrise, Dhuhr, Asr and sunset in local mean solar hours.
#[derive(Debug, Clone, Copy)]
struct HorizonTimes {
    sunrise: f64,
    dhuhr: f64,
    asr: f64,
    sunset: f64,
}

impl HorizonTimes {
    fn is_usable(&self) -> bool {
        self.sunrise + MIN_EVENT_GAP <= self.dhuhr
            && self.dhuhr + MIN_EVENT_GAP <= self.asr
            && self.asr + MIN_EVENT_GAP <= self.sunset
            && 24.0 - (self.sunset - self.sunrise) >= MIN_NIGHT
    }

    /// Hours from sunset to the next sunrise.
    fn night(&self) -> f64 {
        fix_hour(self.sunrise - self.sunset)
    }
}

/// Solar state for one civil date at one meridian.
struct SolarDay {
    /// Julian Day of local midnight at the observer's meridian.
    jd: f64,
    shadow_factor: f64,
}

impl SolarDay {
    fn new(date: NaiveDate, longitude: f64, shadow_factor: f64) -> Self {
        Self {
            jd: julian_day(date) - longitude / (15.0 * 24.0),
            shadow_factor,
        }
    }

    fn noon(&self, guess: f64) -> f64 {
        12.0 - solar_position(self.jd + guess / 24.0).equation_of_time
    }

    fn time_at(&self, latitude: f64, altitude: Degrees, guess: f64, side: Side) -> Option<f64> {
        let position = solar_position(self.jd + guess / 24.0);
        let noon = 12.0 - position.equation_of_time;
        let offset = hour_angle(Degrees::new(latitude), position.declination, altitude)?;
        Some(match side {
            Side::Morning => noon - offset,
            Side::Evening => noon + offset,
        })
    }

    fn asr(&self, latitude: f64) -> Option<f64> {
        let declination = solar_position(self.jd + ASR_GUESS / 24.0).declination;
        let altitude = asr_altitude(Degrees::new(latitude), declination, self.shadow_factor);
        self.time_at(latitude, altitude, ASR_GUESS, Side::Evening)
    }

    fn horizon_times(&self, latitude: f64) -> Option<HorizonTimes> {
        let sunrise_altitude = Degrees::new(SUNRISE_ALTITUDE);
        let times = HorizonTimes {
            sunrise: self.time_at(latitude, sunrise_altitude, SUNRISE_GUESS, Side::Morning)?,
            dhuhr: self.noon(DHUHR_GUESS),
            asr: self.asr(latitude)?,
            sunset: self.time_at(latitude, sunrise_altitude, SUNSET_GUESS, Side::Evening)?,
        };
        times.is_usable().then_some(times)
    }
}

fn step_toward_equator(latitude: f64) -> f64 {
    if latitude.abs() <= LATITUDE_STEP {
        0.0
    } else {
        latitude - LATITUDE_STEP * latitude.signum()
    }
}

/// Computes prayer instants under a fixed, validated convention.
///
/// The engine is immutable once built and can be shared across threads.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use ramadan_core::core::GeoCoordinate;
/// use ramadan_core::models::CalculationConvention;
/// use ramadan_core::services::SolarTimeEngine;
///
/// let engine = SolarTimeEngine::new(CalculationConvention::default()).unwrap();
/// let dubai = GeoCoordinate::new(25.2048, 55.2708).unwrap();
/// let times = engine
///     .compute(&dubai, NaiveDate::from_ymd_opt(2025, 3, 5).unwrap())
///     .unwrap();
/// assert!(times.is_strictly_ordered());
/// ```
#[derive(Debug, Clone)]
pub struct SolarTimeEngine {
    convention: CalculationConvention,
}

impl SolarTimeEngine {
    /// Validates the convention and builds the engine.
    pub fn new(convention: CalculationConvention) -> PrayerResult<Self> {
        convention.validate()?;
        Ok(Self { convention })
    }

    pub fn convention(&self) -> &CalculationConvention {
        &self.convention
    }

    /// Computes the six instants in the longitude-derived civil offset.
    pub fn compute(&self, coord: &GeoCoordinate, date: NaiveDate) -> PrayerResult<SolarDayTimes> {
        self.compute_with_offset(coord, date, coord.utc_offset())
    }

    /// Computes the six instants in an explicit civil offset.
    ///
    /// # Errors
    /// * `UnresolvableSolarAngle` under [`HighLatitudeRule::Strict`] when an
    ///   angle is never reached, or when no latitude resolves the day
    /// * `DateOutOfSupportedRange` when the date cannot be represented
    pub fn compute_with_offset(
        &self,
        coord: &GeoCoordinate,
        date: NaiveDate,
        offset: FixedOffset,
    ) -> PrayerResult<SolarDayTimes> {
        let convention = &self.convention;
        let day = SolarDay::new(date, coord.longitude(), convention.asr.shadow_factor());

        let (latitude, horizon) = self.resolve_latitude(&day, coord.latitude(), date)?;
        if latitude != coord.latitude() {
            debug!(
                "Horizon events unresolved at latitude {:.2} on {}, using {:.2}",
                coord.latitude(),
                date,
                latitude
            );
        }

        let night = horizon.night();
        let fajr_angle = convention.fajr_angle;
        let fajr = self.twilight(
            day.time_at(latitude, -fajr_angle, FAJR_GUESS, Side::Morning),
            horizon.sunrise,
            fajr_angle,
            convention.high_latitude_rule.night_fraction(fajr_angle),
            night,
            Side::Morning,
            "fajr",
            date,
        )?;

        let maghrib = match convention.maghrib {
            MaghribRule::Sunset => horizon.sunset,
            MaghribRule::Angle(angle) => self.twilight(
                day.time_at(latitude, -angle, SUNSET_GUESS, Side::Evening),
                horizon.sunset,
                angle,
                self.maghrib_fraction(angle),
                night,
                Side::Evening,
                "maghrib",
                date,
            )?,
        };

        let isha = match convention.isha {
            IshaRule::MinutesAfterMaghrib(minutes) => maghrib + minutes / 60.0,
            IshaRule::Angle(angle) => self.twilight(
                day.time_at(latitude, -angle, SUNSET_GUESS, Side::Evening),
                horizon.sunset,
                angle,
                convention.high_latitude_rule.night_fraction(angle),
                night,
                Side::Evening,
                "isha",
                date,
            )?,
        };

        // mean solar time at the meridian -> civil time in `offset`
        let shift = offset.local_minus_utc() as f64 / 3600.0 - coord.longitude() / 15.0;
        let adjustments = &convention.adjustments;
        let instant = |hours: f64, minutes: f64| -> PrayerResult<DateTime<FixedOffset>> {
            local_instant(date, hours + shift + minutes / 60.0, offset, convention.rounding)
        };

        Ok(SolarDayTimes {
            fajr: instant(fajr, adjustments.fajr)?,
            sunrise: instant(horizon.sunrise, adjustments.sunrise)?,
            dhuhr: instant(horizon.dhuhr, adjustments.dhuhr)?,
            asr: instant(horizon.asr, adjustments.asr)?,
            maghrib: instant(maghrib, adjustments.maghrib)?,
            isha: instant(isha, adjustments.isha)?,
            effective_latitude: latitude,
        })
    }

    /// Finds the latitude nearest to `latitude` at which sunrise, Asr and
    /// sunset all resolve in order with a usable night.
    fn resolve_latitude(
        &self,
        day: &SolarDay,
        latitude: f64,
        date: NaiveDate,
    ) -> PrayerResult<(f64, HorizonTimes)> {
        let strict = self.convention.high_latitude_rule == HighLatitudeRule::Strict;
        let mut effective = latitude;
        loop {
            if let Some(times) = day.horizon_times(effective) {
                return Ok((effective, times));
            }
            if strict || effective == 0.0 {
                return Err(PrayerError::UnresolvableSolarAngle(format!(
                    "sunrise, asr or sunset cannot be resolved at latitude {:.4} on {}",
                    effective, date
                )));
            }
            effective = step_toward_equator(effective);
        }
    }

    /// Night fraction for an angle-based Maghrib.
    ///
    /// With an angle-based Isha the fraction is Isha's scaled by the ratio
    /// of the two angles, so a clamped Maghrib always lands before a
    /// clamped Isha.
    fn maghrib_fraction(&self, angle: Degrees) -> Option<f64> {
        let rule = self.convention.high_latitude_rule;
        match self.convention.isha {
            IshaRule::Angle(isha) => rule
                .night_fraction(isha)
                .map(|fraction| fraction * angle.value() / isha.value()),
            IshaRule::MinutesAfterMaghrib(_) => rule.night_fraction(angle),
        }
    }

    /// Applies the high-latitude rule to a twilight event.
    ///
    /// `base` is sunrise for morning events and sunset for evening ones. The
    /// event is kept when it lies within `fraction` of the night from
    /// `base`, and replaced by `base ∓ portion` otherwise. A `None` fraction
    /// means the strict rule.
    #[allow(clippy::too_many_arguments)]
    fn twilight(
        &self,
        computed: Option<f64>,
        base: f64,
        angle: Degrees,
        fraction: Option<f64>,
        night: f64,
        side: Side,
        event: &str,
        date: NaiveDate,
    ) -> PrayerResult<f64> {
        let Some(fraction) = fraction else {
            return computed.ok_or_else(|| {
                PrayerError::UnresolvableSolarAngle(format!(
                    "the sun does not reach {}° below the horizon for {} on {}",
                    angle.value(),
                    event,
                    date
                ))
            });
        };

        let portion = fraction * night;
        let distance = computed.map(|time| match side {
            Side::Morning => fix_hour(base - time),
            Side::Evening => fix_hour(time - base),
        });
        match (computed, distance) {
            (Some(time), Some(distance)) if distance <= portion => Ok(time),
            _ => {
                debug!(
                    "{} on {} clamped to {:.1}% of the night",
                    event,
                    date,
                    fraction * 100.0
                );
                Ok(match side {
                    Side::Morning => base - portion,
                    Side::Evening => base + portion,
                })
            }
        }
    }
}

/// Computes the six instants for one date in the longitude-derived offset.
pub fn compute_solar_times(
    coord: &GeoCoordinate,
    date: NaiveDate,
    convention: &CalculationConvention,
) -> PrayerResult<SolarDayTimes> {
    SolarTimeEngine::new(convention.clone())?.compute(coord, date)
}

/// Computes the six instants for one date in an explicit civil offset.
pub fn compute_solar_times_with_offset(
    coord: &GeoCoordinate,
    date: NaiveDate,
    convention: &CalculationConvention,
    offset: FixedOffset,
) -> PrayerResult<SolarDayTimes> {
    SolarTimeEngine::new(convention.clone())?.compute_with_offset(coord, date, offset)
}
