//! Low-precision solar position.
//!
//! Implements the standard almanac approximation of the Sun's apparent
//! position (accurate to about 0.01° between 1950 and 2050, and usable for
//! prayer times over several centuries either side) together with the
//! hour-angle relations used to turn a target altitude into a time offset
//! from solar noon.

use qtty::Degrees;

use crate::time::{days_since_j2000, fix_hour};

/// Apparent altitude of the Sun's upper limb at sunrise/sunset: refraction
/// (34') plus the solar semi-diameter (16').
pub const SUNRISE_ALTITUDE: f64 = -0.833;

/// Sun declination and equation of time for an instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolarPosition {
    pub declination: Degrees,
    /// Equation of time in hours (apparent minus mean solar time).
    pub equation_of_time: f64,
}

fn fix_angle(degrees: f64) -> f64 {
    degrees.rem_euclid(360.0)
}

/// Computes the solar position for a Julian Day.
pub fn solar_position(jd: f64) -> SolarPosition {
    let d = days_since_j2000(jd);

    let mean_anomaly = Degrees::new(fix_angle(357.529 + 0.985_600_28 * d));
    let mean_longitude = fix_angle(280.459 + 0.985_647_36 * d);
    let ecliptic_longitude = Degrees::new(fix_angle(
        mean_longitude + 1.915 * mean_anomaly.sin() + 0.020 * (2.0 * mean_anomaly.value()).to_radians().sin(),
    ));
    let obliquity = Degrees::new(23.439 - 0.000_000_36 * d);

    let right_ascension = obliquity.cos() * ecliptic_longitude.sin();
    let right_ascension = fix_hour(
        right_ascension
            .atan2(ecliptic_longitude.cos())
            .to_degrees()
            / 15.0,
    );

    let declination = (obliquity.sin() * ecliptic_longitude.sin()).asin().to_degrees();

    SolarPosition {
        declination: Degrees::new(declination),
        // wrapped into [-12, 12) across the 0h right-ascension seam
        equation_of_time: (mean_longitude / 15.0 - right_ascension + 12.0).rem_euclid(24.0) - 12.0,
    }
}

/// Hour angle, in hours, at which the Sun reaches `altitude`.
///
/// Returns `None` when the Sun never reaches that altitude on the day, i.e.
/// when the cosine of the hour angle falls outside `[-1, 1]`.
pub fn hour_angle(latitude: Degrees, declination: Degrees, altitude: Degrees) -> Option<f64> {
    let denominator = latitude.cos() * declination.cos();
    if denominator.abs() < 1e-12 {
        return None;
    }
    let cos_h = (altitude.sin() - latitude.sin() * declination.sin()) / denominator;
    if !(-1.0..=1.0).contains(&cos_h) {
        return None;
    }
    Some(cos_h.acos().to_degrees() / 15.0)
}

/// Altitude of the Sun when a vertical object's shadow equals
/// `shadow_factor` times its height plus its own noon shadow.
pub fn asr_altitude(latitude: Degrees, declination: Degrees, shadow_factor: f64) -> Degrees {
    let noon_zenith = (latitude.value() - declination.value()).abs();
    let cot = shadow_factor + noon_zenith.to_radians().tan();
    Degrees::new((1.0 / cot).atan().to_degrees())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::julian_day;
    use chrono::NaiveDate;

    fn jd(y: i32, m: u32, d: u32) -> f64 {
        julian_day(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    #[test]
    fn test_declination_at_solstices_and_equinox() {
        let june = solar_position(jd(2025, 6, 21) + 0.5);
        assert!((june.declination.value() - 23.44).abs() < 0.1);

        let december = solar_position(jd(2025, 12, 21) + 0.5);
        assert!((december.declination.value() + 23.44).abs() < 0.1);

        let march = solar_position(jd(2025, 3, 20) + 0.5);
        assert!(march.declination.value().abs() < 0.5);
    }

    #[test]
    fn test_equation_of_time_extremes() {
        // Early November: sundial fast by about 16.4 minutes
        let nov = solar_position(jd(2025, 11, 3) + 0.5);
        assert!((nov.equation_of_time * 60.0 - 16.4).abs() < 0.5);

        // Mid February: sundial slow by about 14.2 minutes
        let feb = solar_position(jd(2025, 2, 11) + 0.5);
        assert!((feb.equation_of_time * 60.0 + 14.2).abs() < 0.5);
    }

    #[test]
    fn test_equation_of_time_stays_small_across_the_aries_seam() {
        let mut day = jd(2025, 1, 1);
        for _ in 0..366 {
            let eot = solar_position(day + 0.5).equation_of_time;
            assert!(eot.abs() < 0.3, "equation of time {} h at jd {}", eot, day);
            day += 1.0;
        }
    }

    #[test]
    fn test_hour_angle_equator_equinox() {
        // Horizon crossing at the equator on an equinox is six hours from noon
        let h = hour_angle(Degrees::new(0.0), Degrees::new(0.0), Degrees::new(0.0)).unwrap();
        assert!((h - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_hour_angle_unreachable() {
        // Polar night: the Sun never rises at 80°N near the December solstice
        assert!(hour_angle(
            Degrees::new(80.0),
            Degrees::new(-23.4),
            Degrees::new(SUNRISE_ALTITUDE)
        )
        .is_none());
        // Midnight sun: the Sun never sets
        assert!(hour_angle(
            Degrees::new(80.0),
            Degrees::new(23.4),
            Degrees::new(SUNRISE_ALTITUDE)
        )
        .is_none());
        // At the pole itself the formula degenerates
        assert!(hour_angle(Degrees::new(90.0), Degrees::new(0.0), Degrees::new(0.0)).is_none());
    }

    #[test]
    fn test_asr_altitude() {
        // Sun overhead at noon: standard Asr at 45°, Hanafi at atan(1/2)
        let standard = asr_altitude(Degrees::new(10.0), Degrees::new(10.0), 1.0);
        assert!((standard.value() - 45.0).abs() < 1e-9);
        let hanafi = asr_altitude(Degrees::new(10.0), Degrees::new(10.0), 2.0);
        assert!((hanafi.value() - 26.565_05).abs() < 1e-4);
        assert!(hanafi < standard);
    }
}
