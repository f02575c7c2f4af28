//! Calculation parameters and reference data.

pub mod convention;
pub mod locations;

pub use convention::{
    AsrJuristic, CalculationConvention, ConventionPreset, HighLatitudeRule, IshaRule,
    MaghribRule, PrayerAdjustments,
};
pub use locations::{find_location, known_locations, KnownLocation};
