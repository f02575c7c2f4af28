//! Next-event and per-prayer status for a schedule day.

use chrono::{DateTime, Duration, FixedOffset};
use serde::{Serialize, Serializer};

use super::schedule::ScheduleEntry;
use crate::core::domain::Prayer;

/// Events a countdown can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    SehriEnds,
    IftarStarts,
    Prayer(Prayer),
}

impl EventKind {
    pub fn label(&self) -> String {
        match self {
            EventKind::SehriEnds => "Sehri Ends".to_string(),
            EventKind::IftarStarts => "Iftar Starts".to_string(),
            EventKind::Prayer(prayer) => format!("{} Prayer", prayer),
        }
    }
}

fn serialize_seconds<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_i64(duration.num_seconds())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NextEvent {
    pub kind: EventKind,
    pub at: DateTime<FixedOffset>,
    /// Time left until `at`, serialized in whole seconds.
    #[serde(serialize_with = "serialize_seconds")]
    pub remaining: Duration,
}

/// Finds the next event of the day after `now`.
///
/// Ramadan days count down to Sehri, then Iftar, then Isha. Other days count
/// down through Fajr, Dhuhr, Asr, Maghrib and Isha. Returns `None` once the
/// last event of the day has passed.
pub fn next_event(entry: &ScheduleEntry, now: DateTime<FixedOffset>) -> Option<NextEvent> {
    let times = &entry.solar_times;
    let candidates: Vec<(EventKind, DateTime<FixedOffset>)> = if entry.is_ramadan {
        vec![
            (EventKind::SehriEnds, entry.sehri),
            (EventKind::IftarStarts, times.maghrib),
            (EventKind::Prayer(Prayer::Isha), times.isha),
        ]
    } else {
        Prayer::OBLIGATORY
            .iter()
            .map(|p| (EventKind::Prayer(*p), times.get(*p)))
            .collect()
    };

    candidates
        .into_iter()
        .find(|(_, at)| now < *at)
        .map(|(kind, at)| NextEvent {
            kind,
            at,
            remaining: at - now,
        })
}

/// State of a single prayer relative to `now`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PrayerStatus {
    Completed,
    Current,
    Upcoming,
}

/// Status of each of the six events of the entry's day.
///
/// Only the reference day has a current prayer: the latest event that has
/// started and whose successor has not. Days before `now`'s date are all
/// completed and later days all upcoming.
pub fn prayer_statuses(
    entry: &ScheduleEntry,
    now: DateTime<FixedOffset>,
) -> Vec<(Prayer, PrayerStatus)> {
    let times = &entry.solar_times;
    let offset = *times.fajr.offset();
    let today = now.with_timezone(&offset).date_naive();

    Prayer::ALL
        .iter()
        .enumerate()
        .map(|(i, prayer)| {
            let status = if entry.gregorian_date < today {
                PrayerStatus::Completed
            } else if entry.gregorian_date > today {
                PrayerStatus::Upcoming
            } else {
                let start = times.get(*prayer);
                let next = Prayer::ALL.get(i + 1).map(|p| times.get(*p));
                match next {
                    _ if now < start => PrayerStatus::Upcoming,
                    Some(next) if now >= next => PrayerStatus::Completed,
                    _ => PrayerStatus::Current,
                }
            };
            (*prayer, status)
        })
        .collect()
}
