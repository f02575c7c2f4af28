//! Built-in table of well-known cities.

use once_cell::sync::Lazy;
use serde::Serialize;

use crate::core::domain::GeoCoordinate;
use crate::core::error::{PrayerError, PrayerResult};

/// A named location with its coordinate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KnownLocation {
    pub name: &'static str,
    pub country: &'static str,
    pub latitude: f64,
    pub longitude: f64,
}

impl KnownLocation {
    pub fn coordinate(&self) -> PrayerResult<GeoCoordinate> {
        GeoCoordinate::new(self.latitude, self.longitude)
    }
}

const fn city(
    name: &'static str,
    country: &'static str,
    latitude: f64,
    longitude: f64,
) -> KnownLocation {
    KnownLocation {
        name,
        country,
        latitude,
        longitude,
    }
}

static KNOWN_LOCATIONS: Lazy<Vec<KnownLocation>> = Lazy::new(|| {
    let mut cities = vec![
        // Middle East
        city("Mecca, Saudi Arabia", "Saudi Arabia", 21.3891, 39.8579),
        city("Medina, Saudi Arabia", "Saudi Arabia", 24.5247, 39.5692),
        city("Riyadh, Saudi Arabia", "Saudi Arabia", 24.7136, 46.6753),
        city("Dubai, UAE", "UAE", 25.2048, 55.2708),
        city("Abu Dhabi, UAE", "UAE", 24.4539, 54.3773),
        city("Doha, Qatar", "Qatar", 25.276987, 51.520008),
        city("Cairo, Egypt", "Egypt", 30.0444, 31.2357),
        city("Istanbul, Turkey", "Turkey", 41.0082, 28.9784),
        city("Tehran, Iran", "Iran", 35.6892, 51.3890),
        city("Baghdad, Iraq", "Iraq", 33.3152, 44.3661),
        // South Asia
        city("Karachi, Pakistan", "Pakistan", 24.8607, 67.0011),
        city("Lahore, Pakistan", "Pakistan", 31.5204, 74.3587),
        city("Islamabad, Pakistan", "Pakistan", 33.6844, 73.0479),
        city("Mumbai, India", "India", 19.0760, 72.8777),
        city("Delhi, India", "India", 28.6139, 77.2090),
        city("Dhaka, Bangladesh", "Bangladesh", 23.8103, 90.4125),
        // Southeast Asia
        city("Jakarta, Indonesia", "Indonesia", -6.2088, 106.8456),
        city("Kuala Lumpur, Malaysia", "Malaysia", 3.1390, 101.6869),
        city("Singapore", "Singapore", 1.3521, 103.8198),
        // Europe
        city("London, UK", "UK", 51.5074, -0.1278),
        city("Manchester, UK", "UK", 53.4808, -2.2426),
        city("Paris, France", "France", 48.8566, 2.3522),
        city("Berlin, Germany", "Germany", 52.5200, 13.4050),
        city("Rome, Italy", "Italy", 41.9028, 12.4964),
        city("Madrid, Spain", "Spain", 40.4168, -3.7038),
        city("Moscow, Russia", "Russia", 55.7558, 37.6173),
        // North America
        city("New York, USA", "USA", 40.7128, -74.0060),
        city("Los Angeles, USA", "USA", 34.0522, -118.2437),
        city("Chicago, USA", "USA", 41.8781, -87.6298),
        city("Houston, USA", "USA", 29.7604, -95.3698),
        city("Toronto, Canada", "Canada", 43.6532, -79.3832),
        city("Vancouver, Canada", "Canada", 49.2827, -123.1207),
        // Oceania
        city("Sydney, Australia", "Australia", -33.8688, 151.2093),
        city("Melbourne, Australia", "Australia", -37.8136, 144.9631),
        city("Auckland, New Zealand", "New Zealand", -36.8485, 174.7633),
        // Africa
        city("Lagos, Nigeria", "Nigeria", 6.5244, 3.3792),
        city("Cape Town, South Africa", "South Africa", -33.9249, 18.4241),
    ];
    cities.sort_by(|a, b| a.name.cmp(b.name));
    cities
});

/// All known locations, sorted by name.
pub fn known_locations() -> &'static [KnownLocation] {
    &KNOWN_LOCATIONS
}

/// Looks up a known location.
///
/// Matches the full name (`"Dubai, UAE"`) or just the city part (`"dubai"`),
/// ignoring case and surrounding whitespace.
pub fn find_location(name: &str) -> PrayerResult<&'static KnownLocation> {
    let wanted = name.trim().to_lowercase();
    KNOWN_LOCATIONS
        .iter()
        .find(|loc| {
            let full = loc.name.to_lowercase();
            full == wanted || full.split(',').next().map(str::trim) == Some(wanted.as_str())
        })
        .ok_or_else(|| PrayerError::Configuration(format!("unknown city '{}'", name.trim())))
}
