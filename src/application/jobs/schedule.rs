//! Local-midnight boundaries for the daily reset.

use std::fmt;

use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use tracing::warn;

/// Latest local hour tried when a day's midnight falls into a DST gap.
const MAX_GAP_HOURS: u32 = 3;

#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    #[error("No representable start of day for {0}")]
    NoBoundary(NaiveDate),
}

/// Timezone whose midnight marks the end of a daily counting window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetZone {
    /// An IANA zone such as `Asia/Kolkata`.
    Named(Tz),
    /// The host's local timezone.
    Local,
}

impl ResetZone {
    /// Resolves an IANA timezone name.
    ///
    /// Unknown names fall back to the host's local timezone with a warning,
    /// so a typo never prevents the service from starting.
    pub fn resolve(name: &str) -> Self {
        match name.trim().parse::<Tz>() {
            Ok(tz) => Self::Named(tz),
            Err(_) => {
                warn!(
                    timezone = name,
                    "Unknown reset timezone, falling back to system local time"
                );
                Self::Local
            }
        }
    }

    /// Returns the first local start of day strictly after `after`.
    ///
    /// Derived from the calendar every time, never by adding 24 hours, so
    /// days of 23 or 25 hours are handled. When midnight does not exist
    /// (DST gap) the first existing hour of the day is used; when it is
    /// ambiguous, the earlier instant.
    pub fn next_midnight_after(&self, after: DateTime<Utc>) -> Result<DateTime<Utc>, ScheduleError> {
        match self {
            Self::Named(tz) => next_day_start(tz, after),
            Self::Local => next_day_start(&Local, after),
        }
    }
}

impl fmt::Display for ResetZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(tz) => write!(f, "{}", tz.name()),
            Self::Local => f.write_str("local"),
        }
    }
}

fn next_day_start<Z: TimeZone>(zone: &Z, after: DateTime<Utc>) -> Result<DateTime<Utc>, ScheduleError> {
    let today = after.with_timezone(zone).date_naive();
    let tomorrow = today.succ_opt().ok_or(ScheduleError::NoBoundary(today))?;

    day_start(zone, tomorrow)
}

fn day_start<Z: TimeZone>(zone: &Z, date: NaiveDate) -> Result<DateTime<Utc>, ScheduleError> {
    (0..=MAX_GAP_HOURS)
        .filter_map(|hour| date.and_hms_opt(hour, 0, 0))
        .find_map(|local| zone.from_local_datetime(&local).earliest())
        .map(|start| start.with_timezone(&Utc))
        .ok_or(ScheduleError::NoBoundary(date))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    fn zone(name: &str) -> ResetZone {
        ResetZone::Named(name.parse().unwrap())
    }

    #[test]
    fn test_resolve_known_zone() {
        assert_eq!(
            ResetZone::resolve("Asia/Kolkata"),
            ResetZone::Named(chrono_tz::Asia::Kolkata)
        );
        assert_eq!(ResetZone::resolve("Asia/Kolkata").to_string(), "Asia/Kolkata");
    }

    #[test]
    fn test_resolve_unknown_zone_falls_back_to_local() {
        assert_eq!(ResetZone::resolve("Mars/Olympus_Mons"), ResetZone::Local);
        assert_eq!(ResetZone::Local.to_string(), "local");
    }

    #[test]
    fn test_next_midnight_kolkata() {
        // 15:30 IST on 10 March
        let next = zone("Asia/Kolkata")
            .next_midnight_after(utc("2025-03-10T10:00:00Z"))
            .unwrap();

        assert_eq!(next, utc("2025-03-10T18:30:00Z"));
    }

    #[test]
    fn test_boundary_never_repeats() {
        let kolkata = zone("Asia/Kolkata");
        let boundary = utc("2025-03-10T18:30:00Z");

        let next = kolkata.next_midnight_after(boundary).unwrap();

        assert_eq!(next, utc("2025-03-11T18:30:00Z"));
    }

    #[test]
    fn test_next_midnight_across_spring_forward() {
        // New York springs forward at 02:00, so 9 March 2025 is 23 hours long.
        let ny = zone("America/New_York");
        let first = ny.next_midnight_after(utc("2025-03-08T12:00:00Z")).unwrap();
        let second = ny.next_midnight_after(first).unwrap();

        assert_eq!(first, utc("2025-03-09T05:00:00Z"));
        assert_eq!(second, utc("2025-03-10T04:00:00Z"));
        assert_eq!((second - first).num_hours(), 23);
    }

    #[test]
    fn test_missing_midnight_uses_first_existing_hour() {
        // São Paulo skipped 00:00-00:59 on 4 November 2018.
        let next = zone("America/Sao_Paulo")
            .next_midnight_after(utc("2018-11-03T15:00:00Z"))
            .unwrap();

        assert_eq!(next, utc("2018-11-04T03:00:00Z"));
    }

    #[test]
    fn test_ambiguous_midnight_uses_earliest_instant() {
        // Havana fell back from 01:00 to 00:00 on 5 November 2023.
        let next = zone("America/Havana")
            .next_midnight_after(utc("2023-11-04T16:00:00Z"))
            .unwrap();

        assert_eq!(next, utc("2023-11-05T04:00:00Z"));
    }
}
