//! Integration tests for the solar time engine.

use chrono::{Duration, NaiveDate, Timelike};
use proptest::prelude::*;

use ramadan_core::core::{GeoCoordinate, Prayer, PrayerError};
use ramadan_core::models::{
    AsrJuristic, CalculationConvention, ConventionPreset, HighLatitudeRule,
};
use ramadan_core::services::{compute_solar_times, SolarTimeEngine};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn minutes_of_day(hour: u32, minute: u32) -> i64 {
    (hour * 60 + minute) as i64
}

/// Dubai, 5 March 2025, Muslim World League, standard Asr, UTC+4
#[test]
fn test_dubai_reference_day() {
    let dubai = GeoCoordinate::new(25.2048, 55.2708).unwrap();
    let times =
        compute_solar_times(&dubai, date(2025, 3, 5), &CalculationConvention::default()).unwrap();

    let expected = [
        (Prayer::Fajr, 5, 22),
        (Prayer::Sunrise, 6, 38),
        (Prayer::Dhuhr, 12, 30),
        (Prayer::Asr, 15, 52),
        (Prayer::Maghrib, 18, 23),
        (Prayer::Isha, 19, 35),
    ];
    for (prayer, hour, minute) in expected {
        let t = times.get(prayer);
        assert_eq!(t.offset().local_minus_utc(), 4 * 3600);
        assert_eq!(t.date_naive(), date(2025, 3, 5));
        let got = minutes_of_day(t.hour(), t.minute());
        let want = minutes_of_day(hour, minute);
        assert!(
            (got - want).abs() <= 2,
            "{} at {:02}:{:02}, expected about {:02}:{:02}",
            prayer,
            t.hour(),
            t.minute(),
            hour,
            minute
        );
    }
    assert!(times.is_strictly_ordered());
}

#[test]
fn test_every_preset_orders_cairo() {
    let cairo = GeoCoordinate::new(30.0444, 31.2357).unwrap();
    for preset in ConventionPreset::ALL {
        let convention = CalculationConvention::from_preset(preset);
        let times = compute_solar_times(&cairo, date(2025, 3, 15), &convention).unwrap();
        assert!(times.is_strictly_ordered(), "{} out of order: {:?}", preset, times);
    }
}

#[test]
fn test_seventy_north_summer_never_fails() {
    let coord = GeoCoordinate::new(70.0, 25.0).unwrap();
    for rule in NON_STRICT_RULES {
        let engine = SolarTimeEngine::new(
            CalculationConvention::default().with_high_latitude_rule(rule),
        )
        .unwrap();
        let mut day = date(2025, 5, 1);
        while day <= date(2025, 8, 31) {
            let times = engine
                .compute(&coord, day)
                .unwrap_or_else(|e| panic!("{:?} failed on {}: {}", rule, day, e));
            assert!(times.sunrise < times.dhuhr);
            assert!(times.dhuhr < times.asr);
            assert!(times.asr < times.maghrib);
            assert!(times.fajr < times.sunrise);
            assert!(times.maghrib < times.isha);
            day += Duration::days(1);
        }
    }
}

const NON_STRICT_RULES: [HighLatitudeRule; 3] = [
    HighLatitudeRule::MiddleOfNight,
    HighLatitudeRule::SeventhOfNight,
    HighLatitudeRule::TwilightAngle,
];

#[test]
fn test_every_preset_and_rule_orders_high_latitudes() {
    let latitudes = [55.0, 60.1699, 62.5, 65.0, 67.5, 70.0, -60.0, -65.0];
    let dates = [date(2025, 3, 20), date(2025, 6, 21), date(2025, 12, 21)];
    for preset in ConventionPreset::ALL {
        for rule in NON_STRICT_RULES {
            let engine = SolarTimeEngine::new(
                CalculationConvention::from_preset(preset).with_high_latitude_rule(rule),
            )
            .unwrap();
            for lat in latitudes {
                let coord = GeoCoordinate::new(lat, 24.9).unwrap();
                for day in dates {
                    let times = engine.compute(&coord, day).unwrap();
                    assert!(
                        times.is_strictly_ordered(),
                        "{} {:?} at {} on {}: {:?}",
                        preset,
                        rule,
                        lat,
                        day,
                        times
                    );
                }
            }
        }
    }
}

#[test]
fn test_polar_winter_falls_back_to_nearest_latitude() {
    let coord = GeoCoordinate::new(80.0, 15.0).unwrap();
    let times = compute_solar_times(&coord, date(2025, 12, 21), &CalculationConvention::default())
        .unwrap();
    assert!(times.used_latitude_fallback(&coord));
    assert!(times.effective_latitude > 0.0 && times.effective_latitude < 80.0);
    assert!(times.is_strictly_ordered());
}

#[test]
fn test_strict_rule_reports_unresolvable_angle() {
    let convention =
        CalculationConvention::default().with_high_latitude_rule(HighLatitudeRule::Strict);
    let oslo = GeoCoordinate::new(59.9139, 10.7522).unwrap();

    // 18° below the horizon is never reached in Oslo at midsummer
    let err = compute_solar_times(&oslo, date(2025, 6, 21), &convention).unwrap_err();
    assert!(matches!(err, PrayerError::UnresolvableSolarAngle(_)));

    // but it is in winter
    assert!(compute_solar_times(&oslo, date(2025, 12, 21), &convention).is_ok());
}

#[test]
fn test_invalid_convention_is_rejected_before_computing() {
    let dubai = GeoCoordinate::new(25.2048, 55.2708).unwrap();
    let convention = CalculationConvention::custom(
        "broken",
        -3.0,
        ramadan_core::models::IshaRule::MinutesAfterMaghrib(90.0),
    );
    assert!(matches!(
        compute_solar_times(&dubai, date(2025, 3, 5), &convention),
        Err(PrayerError::InvalidConvention(_))
    ));
}

#[test]
fn test_southern_hemisphere_summer() {
    let sydney = GeoCoordinate::new(-33.8688, 151.2093).unwrap();
    let times = compute_solar_times(&sydney, date(2025, 12, 21), &CalculationConvention::default())
        .unwrap();
    assert!(times.is_strictly_ordered());
    assert_eq!(times.dhuhr.offset().local_minus_utc(), 10 * 3600);
    let day_length = times.maghrib - times.sunrise;
    assert!(day_length > Duration::hours(14));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_times_strictly_ordered_below_sixty_degrees(
        lat in -60.0..=60.0f64,
        lng in -180.0..=180.0f64,
        day_offset in 0i64..(301 * 365),
        preset_index in 0usize..ConventionPreset::ALL.len(),
        hanafi in any::<bool>(),
    ) {
        let coord = GeoCoordinate::new(lat, lng).unwrap();
        let day = date(1900, 1, 1) + Duration::days(day_offset);
        let asr = if hanafi { AsrJuristic::Hanafi } else { AsrJuristic::Standard };
        let convention =
            CalculationConvention::from_preset(ConventionPreset::ALL[preset_index]).with_asr(asr);

        let times = compute_solar_times(&coord, day, &convention).unwrap();
        prop_assert!(times.is_strictly_ordered(), "{:?} at {} on {}", times, coord, day);
    }

    #[test]
    fn prop_times_strictly_ordered_at_high_latitudes(
        lat in 55.0..=66.0f64,
        south in any::<bool>(),
        lng in -180.0..=180.0f64,
        day_offset in 0i64..(301 * 365),
        preset_index in 0usize..ConventionPreset::ALL.len(),
        rule_index in 0usize..NON_STRICT_RULES.len(),
    ) {
        let lat = if south { -lat } else { lat };
        let coord = GeoCoordinate::new(lat, lng).unwrap();
        let day = date(1900, 1, 1) + Duration::days(day_offset);
        let convention = CalculationConvention::from_preset(ConventionPreset::ALL[preset_index])
            .with_high_latitude_rule(NON_STRICT_RULES[rule_index]);

        let times = compute_solar_times(&coord, day, &convention).unwrap();
        prop_assert!(times.is_strictly_ordered(), "{:?} at {} on {}", times, coord, day);
    }

    #[test]
    fn prop_dhuhr_near_local_solar_noon(
        lat in -60.0..=60.0f64,
        lng in -180.0..=180.0f64,
        day_offset in 0i64..(301 * 365),
    ) {
        let coord = GeoCoordinate::new(lat, lng).unwrap();
        let day = date(1900, 1, 1) + Duration::days(day_offset);
        let times = compute_solar_times(&coord, day, &CalculationConvention::default()).unwrap();

        let tz_hours = coord.utc_offset().local_minus_utc() as f64 / 3600.0;
        let mean_noon = 12.0 + tz_hours - lng / 15.0;
        let local = times.dhuhr.naive_local();
        let dhuhr = local.time().num_seconds_from_midnight() as f64 / 3600.0
            + (local.date() - day).num_days() as f64 * 24.0;
        prop_assert!((dhuhr - mean_noon).abs() <= 20.0 / 60.0, "dhuhr {} vs mean noon {}", dhuhr, mean_noon);
    }

    #[test]
    fn prop_computation_is_deterministic(
        lat in -89.0..=89.0f64,
        lng in -180.0..=180.0f64,
        day_offset in 0i64..(301 * 365),
    ) {
        let coord = GeoCoordinate::new(lat, lng).unwrap();
        let day = date(1900, 1, 1) + Duration::days(day_offset);
        let convention = CalculationConvention::default();
        let first = compute_solar_times(&coord, day, &convention).unwrap();
        let second = compute_solar_times(&coord, day, &convention).unwrap();
        prop_assert_eq!(first, second);
    }
}
