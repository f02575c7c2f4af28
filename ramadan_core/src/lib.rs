//! Ramadan prayer-time core.
//!
//! Computes the daily prayer instants (Fajr, Sunrise, Dhuhr, Asr, Maghrib and
//! Isha) and the Sehri cutoff for any coordinate and civil date, maps dates
//! onto the Hijri calendar and assembles multi-day schedules that flag the
//! days of Ramadan.
//!
//! Everything here is a pure function of its inputs. Nothing reads the
//! system clock: the reference date or instant is always passed in.
//!
//! ```
//! use chrono::NaiveDate;
//! use ramadan_core::core::GeoCoordinate;
//! use ramadan_core::models::CalculationConvention;
//! use ramadan_core::services::build_schedule;
//!
//! let dubai = GeoCoordinate::new(25.2048, 55.2708).unwrap();
//! let start = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
//! let schedule =
//!     build_schedule(&dubai, &CalculationConvention::default(), start, 30, start).unwrap();
//! assert_eq!(schedule.len(), 30);
//! assert!(schedule[0].is_ramadan);
//! ```

pub mod algorithms;
pub mod calendar;
pub mod config;
pub mod core;
pub mod models;
pub mod services;
pub mod time;

pub use crate::calendar::{CalendarVariant, HijriCalendar, HijriDate, HijriMapper};
pub use crate::core::{GeoCoordinate, Prayer, PrayerError, PrayerResult, SolarDayTimes};
pub use crate::models::{CalculationConvention, ConventionPreset};
pub use crate::services::{ScheduleBuilder, ScheduleEntry, SolarTimeEngine};
