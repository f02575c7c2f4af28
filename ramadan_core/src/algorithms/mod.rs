//! Astronomical algorithms.

pub mod solar_position;

pub use solar_position::{asr_altitude, hour_angle, solar_position, SolarPosition, SUNRISE_ALTITUDE};
