//! Core domain models for prayer-time computation.
//!
//! This module defines the validated inputs and the derived outputs shared by
//! the solar engine, the Hijri mapper and the schedule builder.

pub mod domain;
pub mod error;

pub use domain::{GeoCoordinate, Prayer, SolarDayTimes};
pub use error::{PrayerError, PrayerResult};
