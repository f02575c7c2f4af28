//! Services composing the solar engine and the Hijri mapper.

pub mod anchor;
pub mod countdown;
pub mod schedule;
pub mod solar_times;

pub use anchor::{find_ramadan_start, select_anchor, AnchorMode, ScheduleAnchor};
pub use countdown::{next_event, prayer_statuses, EventKind, NextEvent, PrayerStatus};
pub use schedule::{
    build_schedule, DayStatus, ScheduleBuilder, ScheduleEntry, DEFAULT_SEHRI_OFFSET_MINUTES,
    DEFAULT_WINDOW_DAYS,
};
pub use solar_times::{compute_solar_times, compute_solar_times_with_offset, SolarTimeEngine};
